//! Lambertian reflection: constant or texture-varying albedo, cosine-weighted
//! importance sampling.

use crate::bsdf::{BSDFFlags, TransportMode, BSDF};
use crate::frame::Frame;
use crate::interaction::BSDFSample;
use crate::math::Float;
use crate::spectrum::Spectrum;
use crate::texture::{ConstantTexture, Texture};
use crate::warp::{square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf};
use crate::{Point2f, Vec3f};

pub struct DiffuseBSDF {
    pub reflectance: Box<dyn Texture<Spectrum>>,
}

impl DiffuseBSDF {
    /// A spatially constant reflectance, the common case.
    pub fn new(reflectance: Spectrum) -> Self {
        DiffuseBSDF { reflectance: Box::new(ConstantTexture(reflectance)) }
    }

    /// A reflectance that varies over the surface's `(u, v)` parametrization.
    pub fn textured(reflectance: Box<dyn Texture<Spectrum>>) -> Self {
        DiffuseBSDF { reflectance }
    }
}

impl BSDF for DiffuseBSDF {
    fn flags(&self) -> BSDFFlags {
        BSDFFlags::REFLECTION | BSDFFlags::DIFFUSE
    }

    fn f(&self, uv: Point2f, wo: Vec3f, wi: Vec3f) -> Spectrum {
        if !Frame::same_hemisphere(wo, wi) {
            return Spectrum::BLACK;
        }
        self.reflectance.evaluate(uv) * std::f32::consts::FRAC_1_PI
    }

    fn pdf(&self, wo: Vec3f, wi: Vec3f) -> Float {
        if Frame::same_hemisphere(wo, wi) {
            square_to_cosine_hemisphere_pdf(Frame::abs_cos_theta(wi))
        } else {
            0.0
        }
    }

    fn sample(&self, uv: Point2f, wo: Vec3f, u: Point2f, _mode: TransportMode) -> Option<BSDFSample> {
        let mut wi = square_to_cosine_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = square_to_cosine_hemisphere_pdf(Frame::abs_cos_theta(wi));
        if pdf == 0.0 {
            return None;
        }
        Some(BSDFSample { wi, f: self.f(uv, wo, wi), pdf, specular: false, eta: 1.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv() -> Point2f {
        Point2f::new(0.0, 0.0)
    }

    #[test]
    fn reciprocal_and_energy_conserving() {
        let bsdf = DiffuseBSDF::new(Spectrum::new(0.5));
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        let wi = Vec3f::new(0.3, 0.4, Float::sqrt(1.0 - 0.09 - 0.16));
        assert_eq!(bsdf.f(uv(), wo, wi).c, bsdf.f(uv(), wi, wo).c);
        // f * cos(theta) / pdf == reflectance for any direction sampled
        // from the matched cosine-hemisphere density.
        let pdf = bsdf.pdf(wo, wi);
        let estimate = bsdf.f(uv(), wo, wi) * (Frame::abs_cos_theta(wi) / pdf);
        assert!((estimate.c[0] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sampled_direction_stays_on_the_same_side() {
        let bsdf = DiffuseBSDF::new(Spectrum::new(0.8));
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        for i in 0..16 {
            let u = Point2f::new((i as Float + 0.5) / 16.0, 0.37);
            let sample = bsdf.sample(uv(), wo, u, TransportMode::Radiance).unwrap();
            assert!(sample.wi.z >= 0.0);
            assert!(!sample.specular);
        }
    }
}
