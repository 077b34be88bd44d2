//! Monte Carlo radiance integration: the per-pixel parallel render loop
//! shared by every concrete integrator, the power-heuristic MIS weight, and
//! the single-sample light-sampling estimator both concrete integrators
//! build on (spec.md §4.9).
//!
//! Unlike the teacher's `SamplerIntegrator`/`IntegratorRadiance` (tile-based,
//! bump-arena-scoped, holding its own camera), a `RadianceIntegrator` here
//! is a pure function of `(ray, scene, sampler) -> Spectrum`: there is no
//! per-bounce BSDF arena to manage, since the BSDF lives directly on the
//! `Shape` rather than behind a `Material` indirection, and no tiling,
//! since rayon splits the render by pixel directly (spec.md §5).

pub mod direct_lighting;
pub mod path;

use crate::bsdf::BSDF;
use crate::error::RenderError;
use crate::film::Image;
use crate::frame::Frame;
use crate::interaction::SurfaceInteraction;
use crate::math::Float;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{Point2f, RayDifferential, Vec3f};
use anyhow::{ensure, Result};
use rayon::prelude::*;

pub use direct_lighting::DirectRadianceIntegrator;
pub use path::PathRadianceIntegrator;

/// Computes incident radiance along a camera ray. The per-pixel averaging
/// loop, sampler seeding, and tone mapping live in `render`; a concrete
/// integrator only needs to implement this one method.
pub trait RadianceIntegrator: Send + Sync {
    fn li(&self, ray: &RayDifferential, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum;
}

/// Renders `scene` through `integrator` into `image`, one independent
/// Monte Carlo estimate per pixel averaged over
/// `sampler_prototype.samples_per_pixel()` samples (spec.md §4.9). Pixels
/// are independent: each rayon work item gets its own sampler stream,
/// seeded from the pixel index, and writes exactly one cell of `image`, so
/// no locking is needed (spec.md §5).
///
/// Returns an error (surfaced by the caller via `tracing::error!`, spec.md
/// §7) if the camera's resolution or the sampler's spp are non-positive —
/// configuration mistakes caught once, before any work starts, rather than
/// silently producing an empty image.
pub fn render(
    integrator: &dyn RadianceIntegrator,
    scene: &Scene,
    sampler_prototype: &dyn Sampler,
    image: &mut Image,
) -> Result<()> {
    let resolution = scene.camera.resolution();
    ensure!(
        resolution.x > 0 && resolution.y > 0,
        RenderError::NonPositiveResolution { width: resolution.x, height: resolution.y }
    );

    let spp = sampler_prototype.samples_per_pixel();
    ensure!(spp > 0, RenderError::NonPositiveSampleCount(spp));

    let width = resolution.x as usize;
    let height = resolution.y as usize;
    let n = width * height;

    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_draw_delta((n as u64 / 100).max(1));

    // Sampler streams are constructed up front on this thread (cheap: just
    // PRNG state) because `Sampler` is `Send` but not `Sync`, so the boxed
    // trait object can be moved into a rayon work item but not shared by
    // reference across them.
    let samplers: Vec<Box<dyn Sampler>> = (0..n as u64)
        .map(|i| sampler_prototype.clone_with_seed(i.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(1)))
        .collect();

    let pixels: Vec<Spectrum> = samplers
        .into_par_iter()
        .enumerate()
        .map(|(i, mut sampler)| {
            let x = (i % width) as Float;
            let y = (i / width) as Float;

            let mut sum = Spectrum::BLACK;
            for _ in 0..spp {
                let jitter = sampler.next_2d();
                let s = Point2f::new((x + jitter.x) / width as Float, (y + jitter.y) / height as Float);
                let (weight, mut ray) =
                    scene.camera.sample_ray_differential(s, sampler.next_1d(), sampler.next_2d());
                if weight <= 0.0 {
                    continue;
                }
                ray.scale_differentials(1.0 / (spp as Float).sqrt());

                let l = integrator.li(&ray, scene, sampler.as_mut());
                if l.has_nans() {
                    tracing::warn!(pixel = i, "discarding NaN radiance sample");
                } else {
                    sum += l * weight;
                }
            }

            progress.inc(1);
            sum / spp as Float
        })
        .collect();

    for (i, p) in pixels.into_iter().enumerate() {
        image.set_value(i, p);
    }
    progress.finish();
    Ok(())
}

/// The power heuristic (beta = 2, Veach & Guibas) combining two sampling
/// strategies' densities for the same quantity (spec.md §4.8). `0/0`
/// (both densities zero) is defined as zero rather than propagated as NaN.
pub fn mis_weight(pdf_a: Float, pdf_b: Float) -> Float {
    let a2 = pdf_a * pdf_a;
    let b2 = pdf_b * pdf_b;
    let w = a2 / (a2 + b2);
    if w == w {
        w
    } else {
        0.0
    }
}

/// The power heuristic generalized to strategies that take a different
/// number of samples (spec.md §4.10): each density is first scaled by its
/// strategy's share of the total sample budget (`f_a = n_a/(n_a+n_b)`)
/// before combining, so a strategy isn't over- or under-weighted purely
/// because it happened to run more or fewer times than the other.
pub fn mis_weight_counted(pdf_a: Float, n_a: usize, pdf_b: Float, n_b: usize) -> Float {
    let n_a = n_a as Float;
    let n_b = n_b as Float;
    let total = n_a + n_b;
    mis_weight(pdf_a * (n_a / total), pdf_b * (n_b / total))
}

/// One light-sampling-strategy sample of direct illumination at a surface
/// hit, MIS-weighted against the BSDF's density for the same direction
/// (spec.md §4.8 `estimateDirect`, light-sampling half; §4.10's
/// sample-count-aware combination when the two strategies take a different
/// number of samples). Shared by `direct_lighting` (which takes
/// `light_samples` of these against `bsdf_samples` BSDF samples) and `path`
/// (which always passes `1, 1` — exactly one light sample per bounce,
/// combined with the single implicit BSDF sample that continues the path,
/// folding the BSDF-sampling half of MIS into the next bounce's emission
/// term instead). The returned value already carries the `1/light_samples`
/// share of the estimate; callers sum rather than average the per-sample
/// results.
pub fn sample_direct_lighting(
    si: &SurfaceInteraction,
    wo: Vec3f,
    bsdf: &dyn BSDF,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    frame: &Frame,
    light_samples: usize,
    bsdf_samples: usize,
) -> Spectrum {
    if scene.lights.is_empty() || light_samples == 0 {
        return Spectrum::BLACK;
    }

    let (ds, li) = scene.sample_light_direction(si.p(), sampler.next_2d(), true);
    if ds.pdf <= 0.0 || li.is_black() {
        return Spectrum::BLACK;
    }

    let wi = frame.to_local(ds.wi);
    let f = bsdf.f(si.uv, wo, wi) * wi.z.abs();
    if f.is_black() {
        return Spectrum::BLACK;
    }

    let weight = if ds.delta {
        1.0
    } else {
        mis_weight_counted(ds.pdf, light_samples, bsdf.pdf(wo, wi), bsdf_samples)
    };
    f * li * weight / light_samples as Float
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mis_weight_of_equal_pdfs_is_one_half() {
        assert!((mis_weight(2.0, 2.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mis_weight_favors_the_larger_pdf() {
        assert!(mis_weight(4.0, 1.0) > mis_weight(1.0, 4.0));
    }

    #[test]
    fn mis_weight_of_two_zero_pdfs_is_zero() {
        assert_eq!(mis_weight(0.0, 0.0), 0.0);
    }

    #[test]
    fn mis_weight_counted_matches_plain_mis_weight_at_equal_counts() {
        assert!((mis_weight_counted(3.0, 2, 1.0, 2) - mis_weight(3.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn mis_weight_counted_penalizes_the_strategy_that_ran_more_often() {
        // Same raw pdfs, but strategy `a` took 3 samples against `b`'s 1: its
        // per-sample share of the weight should shrink relative to the
        // equal-count case, since the majority strategy is already
        // contributing more samples to the combined estimate.
        let equal = mis_weight_counted(2.0, 1, 2.0, 1);
        let unequal = mis_weight_counted(2.0, 3, 2.0, 1);
        assert!(unequal < equal);
    }
}
