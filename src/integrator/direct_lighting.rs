//! Direct lighting only: outgoing radiance is emission plus one bounce of
//! direct illumination, combining a configurable number of light samples
//! and BSDF samples with multiple importance sampling (spec.md §4.10). No
//! indirect bounces — see `path` for the full-length integrator.

use crate::bsdf::{TransportMode, BSDF};
use crate::error::RenderError;
use crate::frame::Frame;
use crate::integrator::{mis_weight_counted, sample_direct_lighting, RadianceIntegrator};
use crate::interaction::SurfaceInteraction;
use crate::math::Float;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{RayDifferential, Vec3f};

pub struct DirectRadianceIntegrator {
    /// Light-sampling-strategy samples taken per pixel, combined with
    /// `bsdf_samples` through the sample-count-aware power heuristic
    /// (spec.md §4.10) rather than a plain average of the two strategies.
    pub light_samples: usize,
    /// BSDF-sampling-strategy samples taken per pixel, same treatment.
    pub bsdf_samples: usize,
}

impl DirectRadianceIntegrator {
    pub fn new(light_samples: usize, bsdf_samples: usize) -> Result<Self, RenderError> {
        if light_samples == 0 && bsdf_samples == 0 {
            return Err(RenderError::NoSamplingStrategy);
        }
        Ok(DirectRadianceIntegrator { light_samples, bsdf_samples })
    }
}

impl Default for DirectRadianceIntegrator {
    fn default() -> Self {
        DirectRadianceIntegrator { light_samples: 1, bsdf_samples: 1 }
    }
}

impl RadianceIntegrator for DirectRadianceIntegrator {
    fn li(&self, ray: &RayDifferential, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum {
        let si = match scene.intersect(&ray.ray) {
            Some(si) => si,
            None => return Spectrum::BLACK,
        };

        let mut l = Spectrum::BLACK;
        if let Some(idx) = si.shape.area_light_index() {
            l += scene.lights[idx].evaluate(&si);
        }

        let frame = Frame::from_normal(si.shading_n.0);
        let wo = frame.to_local(si.wo);
        let bsdf = si.shape.bsdf();

        // Each call below already carries its own `1/N` share of the
        // estimate (spec.md §4.10's `w_l = 1/N_l`, `w_b = 1/N_b`), folded
        // in alongside the sample-count-aware MIS weight, so the N calls
        // per strategy are summed directly rather than averaged afterward.
        if self.light_samples > 0 {
            for _ in 0..self.light_samples {
                l += sample_direct_lighting(
                    &si,
                    wo,
                    bsdf,
                    scene,
                    sampler,
                    &frame,
                    self.light_samples,
                    self.bsdf_samples,
                );
            }
        }

        if self.bsdf_samples > 0 {
            for _ in 0..self.bsdf_samples {
                l += sample_direct_bsdf(
                    &si,
                    wo,
                    bsdf,
                    scene,
                    sampler,
                    &frame,
                    self.light_samples,
                    self.bsdf_samples,
                );
            }
        }

        l
    }
}

/// One BSDF-sampling-strategy sample of direct illumination: samples a
/// scattered direction, traces it, and adds the light it happened to land
/// on, MIS-weighted against that light's own sampling density for the same
/// direction (spec.md §4.8 `estimateDirect`, BSDF-sampling half; §4.10's
/// sample-count-aware combination). The returned value already carries the
/// `1/bsdf_samples` share of the estimate; the caller sums rather than
/// averages the per-sample results.
fn sample_direct_bsdf(
    si: &SurfaceInteraction,
    wo: Vec3f,
    bsdf: &dyn BSDF,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    frame: &Frame,
    light_samples: usize,
    bsdf_samples: usize,
) -> Spectrum {
    let bs = match bsdf.sample(si.uv, wo, sampler.next_2d(), TransportMode::Radiance) {
        Some(bs) if bs.pdf > 0.0 && !bs.f.is_black() => bs,
        _ => return Spectrum::BLACK,
    };

    let throughput = bs.f * (bs.wi.z.abs() / bs.pdf);
    if throughput.is_black() {
        return Spectrum::BLACK;
    }

    let wi_world = frame.to_world(bs.wi);
    let hit = match scene.intersect(&si.spawn_ray(wi_world)) {
        Some(hit) => hit,
        None => return Spectrum::BLACK,
    };

    let idx = match hit.shape.area_light_index() {
        Some(idx) => idx,
        None => return Spectrum::BLACK,
    };

    let radiance = scene.lights[idx].evaluate(&hit);
    if radiance.is_black() {
        return Spectrum::BLACK;
    }

    let weight = if bs.specular {
        1.0
    } else {
        let light_pdf = scene.pdf_light_direction(si.p(), &hit);
        mis_weight_counted(bs.pdf, bsdf_samples, light_pdf, light_samples)
    };

    throughput * radiance * weight / bsdf_samples as Float
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_samples_from_both_strategies() {
        assert!(DirectRadianceIntegrator::new(0, 0).is_err());
    }

    #[test]
    fn accepts_light_only_sampling() {
        assert!(DirectRadianceIntegrator::new(4, 0).is_ok());
    }
}
