//! Light sources. A `Light` samples either an emitted ray (for light-tracing
//! style integrators, unused by the two integrators in this crate but part
//! of the contract) or a direction toward itself from a reference point
//! (the method both radiance integrators actually call).

pub mod diffuse;
pub mod point;

use crate::interaction::{DirectionSample, SurfaceInteraction};
use crate::math::Float;
use crate::spectrum::Spectrum;
use crate::{Point2f, Point3f, Ray};
use bitflags::bitflags;

bitflags! {
    pub struct LightFlags: u32 {
        /// Emits from a single point (no surface area to sample).
        const DELTA_POSITION  = 1 << 0;
        /// Emits along a single direction (no solid angle to sample).
        const DELTA_DIRECTION = 1 << 1;
        /// Backed by a `Shape`'s surface.
        const SURFACE         = 1 << 2;
        /// Emits from outside the scene in every direction a ray escapes to.
        const INFINITE        = 1 << 3;
    }
}

impl LightFlags {
    pub fn is_delta(&self) -> bool {
        self.intersects(LightFlags::DELTA_POSITION | LightFlags::DELTA_DIRECTION)
    }
}

pub trait Light: Send + Sync {
    fn flags(&self) -> LightFlags;

    /// Samples an emitted ray and the radiant power it carries, for
    /// light-tracing strategies. `u_pos` selects a position (on the
    /// light's surface, or is unused for a delta-position light);
    /// `u_dir` selects an emission direction from it.
    fn sample_ray(&self, u_pos: Point2f, u_dir: Point2f) -> (Ray, Spectrum);

    /// Samples a direction from the reference point `it_p` toward this
    /// light, returning the sample (position, normal, direction, distance,
    /// and solid-angle pdf) and the incident radiance divided by that pdf.
    fn sample_direction(&self, it_p: Point3f, u: Point2f) -> (DirectionSample, Spectrum);

    /// The probability density (solid angle measure, at `it_p`) that
    /// `sample_direction` would have produced `ds`. Zero for delta lights,
    /// which can never be hit by a separately-traced ray.
    fn pdf_direction(&self, it_p: Point3f, ds: &DirectionSample) -> Float;

    /// The radiance this light emits toward `si.wo` at the surface point
    /// `si`, for a ray that happened to land on the light's own geometry.
    /// Zero for lights with no surface (point, distant).
    fn evaluate(&self, si: &SurfaceInteraction) -> Spectrum {
        let _ = si;
        Spectrum::BLACK
    }
}
