//! Fresnel reflectance for dielectric (non-conducting) interfaces.
//!
//! [`fresnel_dielectric`] follows pbrt's formulation but returns the full
//! four-tuple the dielectric BSDF needs: the reflectance, the cosine of the
//! transmitted angle, and the two relative indices of refraction
//! (incident-over-transmitted and its reciprocal) needed to scale the
//! transmitted radiance for the change of solid angle.

use crate::math::{safe_sqrt, Float};

pub struct FresnelDielectric {
    pub f: Float,
    pub cos_theta_t: Float,
    pub eta_it: Float,
    pub eta_ti: Float,
}

/// Evaluates the Fresnel reflectance of an unpolarized wave incident on a
/// dielectric boundary with relative index of refraction `eta` (the IOR of
/// the medium on the far side of the normal over the IOR of the medium the
/// ray currently travels through).
///
/// `cos_theta_i` is the cosine of the angle between the incident direction
/// and the macroscopic normal. Its sign selects which side of the boundary
/// the ray originates on: a positive `cos_theta_i` means the ray is
/// entering from the side the normal points toward (`eta_i = 1`, `eta_t =
/// eta`); a negative one means it is leaving, and the indices of refraction
/// are swapped before evaluating.
pub fn fresnel_dielectric(cos_theta_i: Float, eta: Float) -> FresnelDielectric {
    let cos_theta_i = cos_theta_i.max(-1.0).min(1.0);
    let entering = cos_theta_i >= 0.0;
    let (eta_i, eta_t, cos_theta_i) = if entering {
        (1.0, eta, cos_theta_i)
    } else {
        (eta, 1.0, -cos_theta_i)
    };

    let sin2_theta_i = Float::max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin2_theta_t = sin2_theta_i * (eta_i / eta_t) * (eta_i / eta_t);

    let eta_it = if entering { eta_i / eta_t } else { eta_t / eta_i };

    if sin2_theta_t >= 1.0 {
        return FresnelDielectric {
            f: 1.0,
            cos_theta_t: 0.0,
            eta_it,
            eta_ti: 1.0 / eta_it,
        };
    }

    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);

    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    let f = (r_parl * r_parl + r_perp * r_perp) / 2.0;

    let cos_theta_t_signed = if entering { -cos_theta_t } else { cos_theta_t };

    FresnelDielectric {
        f,
        cos_theta_t: cos_theta_t_signed,
        eta_it,
        eta_ti: 1.0 / eta_it,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normal_incidence_matches_closed_form() {
        let r = fresnel_dielectric(1.0, 1.5);
        // At normal incidence F = ((eta-1)/(eta+1))^2 = (0.5/2.5)^2 = 0.04.
        assert_abs_diff_eq!(r.f, 0.04, epsilon = 1e-6);
    }

    #[test]
    fn grazing_incidence_approaches_total_reflectance() {
        let r = fresnel_dielectric(1e-4, 1.5);
        assert!(r.f > 0.9);
    }

    #[test]
    fn total_internal_reflection_beyond_critical_angle() {
        // Leaving glass (eta_i = 1.5) into air, the critical angle is
        // arcsin(1/1.5) ~= 41.8 degrees; cos(60 degrees) = 0.5 is beyond it.
        let r = fresnel_dielectric(-0.5, 1.5);
        assert_abs_diff_eq!(r.f, 1.0, epsilon = 1e-7);
    }

    #[test]
    fn reciprocal_etas_are_consistent() {
        let r = fresnel_dielectric(0.7, 1.5);
        assert_abs_diff_eq!(r.eta_it * r.eta_ti, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn entering_and_exiting_are_symmetric() {
        let entering = fresnel_dielectric(0.6, 1.5);
        let exiting = fresnel_dielectric(-entering.cos_theta_t.abs(), 1.5);
        assert_abs_diff_eq!(entering.f, exiting.f, epsilon = 1e-5);
    }

    #[test]
    fn grazing_incidence_from_inside_refracts_toward_the_normal() {
        // cos_theta_i == 0 still counts as entering (>= 0), so a glass-to-air
        // eta of 1.5 bends the grazing ray to cos_theta_t = -sqrt(1 - 1/eta^2).
        let r = fresnel_dielectric(0.0, 1.5);
        assert_abs_diff_eq!(r.f, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.cos_theta_t, -(1.0 - 1.0 / 2.25 as Float).sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn grazing_incidence_with_reciprocal_eta_has_zero_cos_theta_t() {
        let r = fresnel_dielectric(0.0, 1.0 / 1.5);
        assert_abs_diff_eq!(r.f, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.cos_theta_t, 0.0, epsilon = 1e-6);
    }
}
