//! Smooth dielectric interface (glass): a specular mixture of reflection
//! and transmission, chosen stochastically in proportion to the Fresnel
//! reflectance.

use crate::bsdf::{BSDFFlags, TransportMode, BSDF};
use crate::frame::Frame;
use crate::fresnel::fresnel_dielectric;
use crate::interaction::BSDFSample;
use crate::math::Float;
use crate::spectrum::Spectrum;
use crate::{Point2f, Vec3f};

pub struct DielectricBSDF {
    /// Index of refraction of the medium inside the shape, relative to the
    /// medium outside (assumed vacuum/air, index 1).
    pub eta: Float,
}

impl DielectricBSDF {
    pub fn new(eta: Float) -> Self {
        DielectricBSDF { eta }
    }
}

impl BSDF for DielectricBSDF {
    fn flags(&self) -> BSDFFlags {
        BSDFFlags::REFLECTION | BSDFFlags::TRANSMISSION | BSDFFlags::SPECULAR | BSDFFlags::NON_SYMMETRIC
    }

    /// Zero everywhere: a delta-distribution BSDF has no density with
    /// respect to solid angle, so it can only be evaluated through `sample`.
    fn f(&self, _uv: Point2f, _wo: Vec3f, _wi: Vec3f) -> Spectrum {
        Spectrum::BLACK
    }

    fn pdf(&self, _wo: Vec3f, _wi: Vec3f) -> Float {
        0.0
    }

    fn sample(&self, _uv: Point2f, wo: Vec3f, u: Point2f, mode: TransportMode) -> Option<BSDFSample> {
        let fr = fresnel_dielectric(Frame::cos_theta(wo), self.eta);

        if u.x < fr.f {
            // Specular reflection.
            let wi = Vec3f::new(-wo.x, -wo.y, wo.z);
            let pdf = fr.f;
            let f = Spectrum::new(fr.f / Frame::abs_cos_theta(wi));
            Some(BSDFSample { wi, f, pdf, specular: true, eta: 1.0 })
        } else {
            // Specular transmission. `fr.cos_theta_t` already carries the
            // sign of the transmitted direction's hemisphere.
            let eta = fr.eta_it;
            let wi = Vec3f::new(-wo.x * eta, -wo.y * eta, fr.cos_theta_t);
            let pdf = 1.0 - fr.f;
            if pdf <= 0.0 {
                return None;
            }
            // Radiance scales by 1/eta^2 crossing a boundary (the factor
            // that keeps radiance non-symmetric under transport mode
            // reversal); see BSDFFlags::NON_SYMMETRIC. Importance transport
            // carries no such factor, since it traces the reciprocal
            // quantity backwards from the camera.
            let ft = match mode {
                TransportMode::Radiance => (1.0 - fr.f) / (eta * eta),
                TransportMode::Importance => 1.0 - fr.f,
            };
            let f = Spectrum::new(ft / Frame::abs_cos_theta(wi));
            Some(BSDFSample { wi, f, pdf, specular: true, eta })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_direction_is_reflection_or_transmission() {
        let bsdf = DielectricBSDF::new(1.5);
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        let uv = Point2f::new(0.0, 0.0);
        let reflect = bsdf.sample(uv, wo, Point2f::new(0.0, 0.5), TransportMode::Radiance).unwrap();
        assert!(reflect.wi.z > 0.0);
        let transmit = bsdf.sample(uv, wo, Point2f::new(0.999, 0.5), TransportMode::Radiance).unwrap();
        assert!(transmit.wi.z < 0.0);
    }

    #[test]
    fn evaluating_f_directly_is_always_black() {
        let bsdf = DielectricBSDF::new(1.5);
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        let wi = Vec3f::new(0.0, 0.0, -1.0);
        let uv = Point2f::new(0.0, 0.0);
        assert!(bsdf.f(uv, wo, wi).is_black());
        assert_eq!(bsdf.pdf(wo, wi), 0.0);
    }
}
