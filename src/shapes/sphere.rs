//! A sphere centered at the origin of object space, with radius `radius`.

use crate::bsdf::BSDF;
use crate::frame::Frame;
use crate::geometry::bounds::Bounds3f;
use crate::geometry::transform::{Transform, Transformable};
use crate::geometry::{ComponentWiseExt, Normal3, Ray};
use crate::interaction::{DiffGeom, PositionSample, SurfaceInteraction};
use crate::math::{quadratic, Float, PI};
use crate::shapes::Shape;
use crate::warp::square_to_uniform_sphere;
use crate::{Point2f, Point3f, Vec3f};
use cgmath::{EuclideanSpace, InnerSpace};
use std::sync::atomic::{AtomicIsize, Ordering};

pub struct Sphere {
    object_to_world: Transform,
    world_to_object: Transform,
    radius: Float,
    bsdf: Box<dyn BSDF>,
    area_light: AtomicIsize,
}

impl Sphere {
    pub fn new(object_to_world: Transform, radius: Float, bsdf: Box<dyn BSDF>, _unused: Option<()>) -> Self {
        Sphere {
            world_to_object: object_to_world.inverse(),
            object_to_world,
            radius,
            bsdf,
            area_light: AtomicIsize::new(-1),
        }
    }

    pub fn center(&self) -> Point3f {
        self.object_to_world.transform(Point3f::new(0.0, 0.0, 0.0))
    }
}

impl Shape for Sphere {
    fn object_bound(&self) -> Bounds3f {
        crate::bounds3f!(
            (-self.radius, -self.radius, -self.radius),
            (self.radius, self.radius, self.radius)
        )
    }

    fn object_to_world(&self) -> &Transform {
        &self.object_to_world
    }

    fn area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn intersect(&self, ray: &Ray) -> Option<(Float, SurfaceInteraction)> {
        let oray = ray.transform(self.world_to_object);

        let o = oray.origin.to_vec();
        let d = oray.dir;
        let a = d.dot(d);
        let b = 2.0 * d.dot(o);
        let c = o.dot(o) - self.radius * self.radius;

        let (t0, t1) = quadratic(a, b, c)?;
        if t0 > oray.t_max || t1 <= 0.0 {
            return None;
        }
        let mut t_hit = t0;
        if t_hit <= 0.0 {
            t_hit = t1;
            if t_hit > oray.t_max {
                return None;
            }
        }

        let p_hit_object = oray.at(t_hit);
        // Refine the hit point onto the sphere exactly, rather than trust
        // the ray equation's floating point result.
        let p_hit_object = p_hit_object * (self.radius / p_hit_object.to_vec().magnitude());

        let phi = {
            let phi = p_hit_object.y.atan2(p_hit_object.x);
            if phi < 0.0 {
                phi + 2.0 * PI
            } else {
                phi
            }
        };
        let theta = (p_hit_object.z / self.radius).max(-1.0).min(1.0).acos();

        let u = phi / (2.0 * PI);
        let v = theta / PI;

        let z_radius = Float::sqrt(p_hit_object.x * p_hit_object.x + p_hit_object.y * p_hit_object.y);
        let cos_phi = p_hit_object.x / z_radius.max(1e-8);
        let sin_phi = p_hit_object.y / z_radius.max(1e-8);
        let dpdu = Vec3f::new(-2.0 * PI * p_hit_object.y, 2.0 * PI * p_hit_object.x, 0.0);
        let dpdv = PI
            * Vec3f::new(
                p_hit_object.z * cos_phi,
                p_hit_object.z * sin_phi,
                -self.radius * theta.sin(),
            );

        let p_err = p_hit_object.to_vec().abs() * crate::err_float::gamma(5);

        let n_object = Normal3(p_hit_object.to_vec().normalize());

        let geom = DiffGeom { dpdu, dpdv, dndu: Normal3::new(0.0, 0.0, 0.0), dndv: Normal3::new(0.0, 0.0, 0.0) };

        let si_object = SurfaceInteraction::new(
            p_hit_object,
            p_err,
            ray.time,
            Point2f::new(u, v),
            -oray.dir,
            n_object,
            geom,
            self,
        );

        Some((t_hit, si_object.transformed(self.object_to_world)))
    }

    fn intersect_test(&self, ray: &Ray) -> bool {
        let oray = ray.transform(self.world_to_object);
        let o = oray.origin.to_vec();
        let d = oray.dir;
        let a = d.dot(d);
        let b = 2.0 * d.dot(o);
        let c = o.dot(o) - self.radius * self.radius;

        match quadratic(a, b, c) {
            Some((t0, t1)) => {
                if t0 > oray.t_max || t1 <= 0.0 {
                    false
                } else {
                    t0 > 0.0 || t1 <= oray.t_max
                }
            }
            None => false,
        }
    }

    fn sample_area(&self, u: Point2f) -> PositionSample {
        let p_obj = Point3f::from_vec(square_to_uniform_sphere(u)) * self.radius;
        let n_obj = Normal3(p_obj.to_vec().normalize());
        let p_world = self.object_to_world.transform(p_obj);
        let n_world = self.object_to_world.transform(n_obj).normalize();
        PositionSample {
            p: p_world,
            n: n_world,
            uv: Point2f::new(0.0, 0.0),
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

impl Sphere {
    pub fn shading_frame_at(n: Normal3) -> Frame {
        Frame::from_normal(n.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::diffuse::DiffuseBSDF;
    use crate::spectrum::Spectrum;

    fn unit_sphere() -> Sphere {
        Sphere::new(Transform::IDENTITY, 1.0, Box::new(DiffuseBSDF::new(Spectrum::new(0.5))), None)
    }

    #[test]
    fn ray_through_center_hits_near_and_far_sides() {
        let sphere = unit_sphere();
        let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        let (t, si) = sphere.intersect(&ray).expect("should hit");
        assert!((t - 4.0).abs() < 1e-4);
        assert!((si.hit.p.z - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn ray_missing_the_sphere_does_not_hit() {
        let sphere = unit_sphere();
        let ray = Ray::new(Point3f::new(5.0, 5.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
        assert!(!sphere.intersect_test(&ray));
    }

    #[test]
    fn origin_inside_sphere_hits_only_the_far_side() {
        let sphere = unit_sphere();
        let ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vec3f::new(0.0, 0.0, 1.0));
        let (t, _si) = sphere.intersect(&ray).expect("should hit far side");
        assert!((t - 1.0).abs() < 1e-4);
    }

    #[test]
    fn surface_area_matches_closed_form() {
        let sphere = Sphere::new(Transform::IDENTITY, 2.0, Box::new(DiffuseBSDF::new(Spectrum::new(0.5))), None);
        assert!((sphere.area() - 4.0 * PI * 4.0).abs() < 1e-4);
    }
}
