//! An axis-aligned `[-1, 1]^2` quad lying in the object-space `z = 0` plane,
//! transformed into place like every other shape. Used for area lights and
//! simple planar occluders (walls, ceilings) where a full triangle mesh
//! would be overkill.

use crate::bsdf::BSDF;
use crate::geometry::bounds::Bounds3f;
use crate::geometry::transform::{Transform, Transformable};
use crate::geometry::{Normal3, Ray};
use crate::interaction::{DiffGeom, PositionSample, SurfaceInteraction};
use crate::math::Float;
use crate::shapes::Shape;
use crate::{Point2f, Point3f, Vec3f};
use cgmath::EuclideanSpace;
use std::sync::atomic::{AtomicIsize, Ordering};

pub struct Rectangle {
    object_to_world: Transform,
    world_to_object: Transform,
    bsdf: Box<dyn BSDF>,
    area_light: AtomicIsize,
}

impl Rectangle {
    pub fn new(object_to_world: Transform, bsdf: Box<dyn BSDF>) -> Self {
        Rectangle {
            world_to_object: object_to_world.inverse(),
            object_to_world,
            bsdf,
            area_light: AtomicIsize::new(-1),
        }
    }
}

impl Shape for Rectangle {
    fn object_bound(&self) -> Bounds3f {
        crate::bounds3f!((-1.0, -1.0, 0.0), (1.0, 1.0, 0.0))
    }

    fn object_to_world(&self) -> &Transform {
        &self.object_to_world
    }

    fn area(&self) -> Float {
        // The object-space quad has area 4; the world-space area scales by
        // the transform's local area distortion along its x/y axes.
        let dpdu = self.object_to_world.transform(Vec3f::new(1.0, 0.0, 0.0));
        let dpdv = self.object_to_world.transform(Vec3f::new(0.0, 1.0, 0.0));
        4.0 * cgmath::InnerSpace::magnitude(cgmath::Vector3::cross(dpdu, dpdv))
    }

    fn intersect(&self, ray: &Ray) -> Option<(Float, SurfaceInteraction)> {
        let oray = ray.transform(self.world_to_object);

        if oray.dir.z.abs() < 1e-9 {
            return None;
        }
        let t_hit = -oray.origin.z / oray.dir.z;
        if t_hit <= 0.0 || t_hit > oray.t_max {
            return None;
        }

        let p_hit = oray.at(t_hit);
        if p_hit.x < -1.0 || p_hit.x > 1.0 || p_hit.y < -1.0 || p_hit.y > 1.0 {
            return None;
        }

        let uv = Point2f::new(p_hit.x * 0.5 + 0.5, p_hit.y * 0.5 + 0.5);
        let dpdu = Vec3f::new(2.0, 0.0, 0.0);
        let dpdv = Vec3f::new(0.0, 2.0, 0.0);
        let n_object = Normal3::new(0.0, 0.0, 1.0);

        let p_err = Vec3f::new(0.0, 0.0, 0.0);
        let geom = DiffGeom { dpdu, dpdv, dndu: Normal3::new(0.0, 0.0, 0.0), dndv: Normal3::new(0.0, 0.0, 0.0) };

        let si_object =
            SurfaceInteraction::new(p_hit, p_err, ray.time, uv, -oray.dir, n_object, geom, self);

        Some((t_hit, si_object.transformed(self.object_to_world)))
    }

    fn sample_area(&self, u: Point2f) -> PositionSample {
        let p_obj = Point3f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0, 0.0);
        let n_obj = Normal3::new(0.0, 0.0, 1.0);
        let p_world = self.object_to_world.transform(p_obj);
        let n_world = cgmath::InnerSpace::normalize(self.object_to_world.transform(n_obj));
        PositionSample {
            p: p_world,
            n: n_world,
            uv: Point2f::new(u.x, u.y),
            pdf_area: 1.0 / self.area(),
            delta: false,
        }
    }

    fn bsdf(&self) -> &dyn BSDF {
        self.bsdf.as_ref()
    }

    fn area_light_index(&self) -> Option<usize> {
        let v = self.area_light.load(Ordering::Relaxed);
        if v < 0 {
            None
        } else {
            Some(v as usize)
        }
    }

    fn mark_area_light(&self, idx: usize) {
        self.area_light.store(idx as isize, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::diffuse::DiffuseBSDF;
    use crate::spectrum::Spectrum;

    fn unit_rect() -> Rectangle {
        Rectangle::new(Transform::IDENTITY, Box::new(DiffuseBSDF::new(Spectrum::new(0.5))))
    }

    #[test]
    fn ray_through_center_hits_the_plane() {
        let rect = unit_rect();
        let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        let (t, si) = rect.intersect(&ray).expect("should hit");
        assert!((t - 5.0).abs() < 1e-4);
        assert!(si.hit.p.x.abs() < 1e-4 && si.hit.p.y.abs() < 1e-4);
    }

    #[test]
    fn ray_outside_the_quad_misses() {
        let rect = unit_rect();
        let ray = Ray::new(Point3f::new(5.0, 5.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(rect.intersect(&ray).is_none());
    }

    #[test]
    fn ray_parallel_to_the_plane_misses() {
        let rect = unit_rect();
        let ray = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vec3f::new(1.0, 0.0, 0.0));
        assert!(rect.intersect(&ray).is_none());
    }

    #[test]
    fn area_matches_the_unit_quad() {
        let rect = unit_rect();
        assert!((rect.area() - 4.0).abs() < 1e-4);
    }
}
