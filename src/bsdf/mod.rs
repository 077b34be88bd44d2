//! Bidirectional scattering distribution functions.
//!
//! Every `Shape` owns exactly one `BSDF` (no multi-lobe mixture container,
//! unlike a general-purpose renderer's `Bsdf` aggregate): the spec's
//! surface model is either purely diffuse or purely dielectric. BSDFs
//! evaluate and sample in the local shading frame established by
//! `crate::frame::Frame`, where the shading normal is `(0, 0, 1)`.

pub mod dielectric;
pub mod diffuse;

use crate::frame::Frame;
use crate::interaction::BSDFSample;
use crate::math::Float;
use crate::spectrum::Spectrum;
use crate::{Point2f, Vec3f};
use bitflags::bitflags;

bitflags! {
    pub struct BSDFFlags: u32 {
        const REFLECTION   = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE      = 1 << 2;
        const SPECULAR     = 1 << 3;
        /// Marks a lobe whose `f(wo, wi) != f(wi, wo)` (e.g. a dielectric
        /// transmission lobe under radiance transport), which matters only
        /// to a bidirectional integrator. No integrator in this crate uses
        /// it, but it's part of the BSDF contract so adding one later
        /// doesn't require touching every existing BSDF.
        const NON_SYMMETRIC = 1 << 4;

        const ALL = Self::REFLECTION.bits | Self::TRANSMISSION.bits
            | Self::DIFFUSE.bits | Self::SPECULAR.bits;
    }
}

/// Which side of the light transport equation a BSDF is being sampled for.
/// Only affects `DielectricBSDF`'s transmission lobe: radiance scales by
/// `1/eta^2` crossing a refractive boundary (`BSDFFlags::NON_SYMMETRIC`),
/// importance does not. No integrator in this crate samples under
/// `Importance` — it exists so a future bidirectional integrator can ask
/// for the right lobe without every `BSDF` impl changing shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

pub trait BSDF: Send + Sync {
    fn flags(&self) -> BSDFFlags;

    fn is_specular(&self) -> bool {
        self.flags().contains(BSDFFlags::SPECULAR)
    }

    /// Evaluates the BSDF for a pair of directions in the local shading
    /// frame. Must return black for a purely specular BSDF: a delta
    /// distribution has zero value almost everywhere, so specular BSDFs
    /// only contribute through `sample`. `uv` is the hit's parametric
    /// coordinate, for BSDFs whose reflectance is texture-varying.
    fn f(&self, uv: Point2f, wo: Vec3f, wi: Vec3f) -> Spectrum;

    /// The probability density (solid angle measure) of `sample` having
    /// produced `wi` given `wo`. Zero for a specular BSDF. Every BSDF in
    /// this crate samples direction independently of any texture lookup,
    /// so this has no `uv` parameter.
    fn pdf(&self, wo: Vec3f, wi: Vec3f) -> Float;

    /// Samples an incident direction given the outgoing direction `wo` and
    /// a pair of uniform random numbers `u`, under the given transport
    /// mode (see `TransportMode`).
    fn sample(&self, uv: Point2f, wo: Vec3f, u: Point2f, mode: TransportMode) -> Option<BSDFSample>;

    /// Convenience combining `f` and `pdf`, as most integrator call sites
    /// need both.
    fn evaluate_pdf(&self, uv: Point2f, wo: Vec3f, wi: Vec3f) -> (Spectrum, Float) {
        (self.f(uv, wo, wi), self.pdf(wo, wi))
    }
}

/// Converts a BSDF-local direction into world space and back using the
/// shading frame at a surface hit.
pub struct ShadingContext {
    pub frame: Frame,
}

impl ShadingContext {
    pub fn new(frame: Frame) -> Self {
        ShadingContext { frame }
    }

    pub fn to_local(&self, w: Vec3f) -> Vec3f {
        self.frame.to_local(w)
    }

    pub fn to_world(&self, w: Vec3f) -> Vec3f {
        self.frame.to_world(w)
    }
}
