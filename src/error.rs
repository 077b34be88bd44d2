//! Configuration-error taxonomy (spec.md §7).
//!
//! Every failure an integrator can hit while actually sampling radiance is
//! handled locally (a zero-contributing sample, a zero pdf, a NaN-guarded
//! MIS weight) rather than propagated — see `integrator::mis_weight` and
//! the light-sampling pdf conversions in `scene`. The only error kind that
//! crosses a function boundary is a scene/integrator *configuration*
//! mistake, caught once before the per-pixel loop starts and surfaced
//! through `anyhow`, matching the teacher's established idiom.

use std::fmt;

#[derive(Debug)]
pub enum RenderError {
    NoCamera,
    NonPositiveResolution { width: i32, height: i32 },
    NonPositiveSampleCount(usize),
    DanglingAreaLightShape(usize),
    NoSamplingStrategy,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoCamera => write!(f, "scene has no camera"),
            RenderError::NonPositiveResolution { width, height } => {
                write!(f, "image resolution must be positive, got {}x{}", width, height)
            }
            RenderError::NonPositiveSampleCount(n) => {
                write!(f, "samples per pixel must be positive, got {}", n)
            }
            RenderError::DanglingAreaLightShape(idx) => write!(
                f,
                "area light references shape index {}, which is not in the scene's shape list",
                idx
            ),
            RenderError::NoSamplingStrategy => write!(
                f,
                "direct lighting integrator configured with zero light and zero bsdf samples"
            ),
        }
    }
}

impl std::error::Error for RenderError {}
