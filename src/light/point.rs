//! An isotropic point light: a delta-position emitter with no surface.

use crate::geometry::Normal3;
use crate::interaction::DirectionSample;
use crate::light::{Light, LightFlags};
use crate::math::Float;
use crate::spectrum::Spectrum;
use crate::warp::square_to_uniform_sphere;
use crate::{Point2f, Point3f, Ray};
use cgmath::InnerSpace;

pub struct PointLight {
    pub p: Point3f,
    pub intensity: Spectrum,
}

impl PointLight {
    pub fn new(p: Point3f, intensity: Spectrum) -> Self {
        PointLight { p, intensity }
    }
}

impl Light for PointLight {
    fn flags(&self) -> LightFlags {
        LightFlags::DELTA_POSITION
    }

    fn sample_ray(&self, _u_pos: Point2f, u_dir: Point2f) -> (Ray, Spectrum) {
        let dir = square_to_uniform_sphere(u_dir);
        let ray = Ray::new(self.p, dir);
        (ray, self.intensity * (4.0 * crate::math::PI))
    }

    fn sample_direction(&self, it_p: Point3f, _u: Point2f) -> (DirectionSample, Spectrum) {
        let d = self.p - it_p;
        let distance = d.magnitude();
        let wi = d / distance;
        let ds = DirectionSample {
            p: self.p,
            n: Normal3(-wi),
            wi,
            pdf: 1.0,
            distance,
            delta: true,
        };
        (ds, self.intensity / (distance * distance))
    }

    fn pdf_direction(&self, _it_p: Point3f, _ds: &DirectionSample) -> Float {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiance_falls_off_with_inverse_square_distance() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 0.0), Spectrum::new(1.0));
        let (ds1, l1) = light.sample_direction(Point3f::new(1.0, 0.0, 0.0), Point2f::new(0.0, 0.0));
        let (ds2, l2) = light.sample_direction(Point3f::new(2.0, 0.0, 0.0), Point2f::new(0.0, 0.0));
        assert!(ds1.delta && ds2.delta);
        assert!((l1.c[0] / l2.c[0] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn pdf_direction_is_always_zero() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 0.0), Spectrum::new(1.0));
        let (ds, _) = light.sample_direction(Point3f::new(1.0, 0.0, 0.0), Point2f::new(0.0, 0.0));
        assert_eq!(light.pdf_direction(Point3f::new(1.0, 0.0, 0.0), &ds), 0.0);
    }
}
