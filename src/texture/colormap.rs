//! A procedural 2D field texture: samples a scalar field at `(u, v)` and
//! maps the result through a color ramp, generalizing the old
//! checkerboard-predicate idea (pick one of two fixed colors) to any
//! scalar-valued pattern shaded by any color function.

use crate::math::Float;
use crate::texture::Texture;
use crate::Point2f;
use crate::Spectrum;

/// `field` produces a scalar at `(u, v)`; `ramp` shades that scalar into a
/// `Spectrum`. Splitting the two lets the same ramp (e.g. a two-color
/// gradient) be reused over different fields (checkerboard, radial, noise)
/// without duplicating the color logic, and the same field be shaded
/// through different ramps.
pub struct Colormap2D<F, C>
where
    F: Fn(Point2f) -> Float + Send + Sync,
    C: Fn(Float) -> Spectrum + Send + Sync,
{
    field: F,
    ramp: C,
}

impl<F, C> Colormap2D<F, C>
where
    F: Fn(Point2f) -> Float + Send + Sync,
    C: Fn(Float) -> Spectrum + Send + Sync,
{
    pub fn new(field: F, ramp: C) -> Self {
        Colormap2D { field, ramp }
    }
}

impl<F, C> Texture<Spectrum> for Colormap2D<F, C>
where
    F: Fn(Point2f) -> Float + Send + Sync,
    C: Fn(Float) -> Spectrum + Send + Sync,
{
    fn evaluate(&self, uv: Point2f) -> Spectrum {
        (self.ramp)((self.field)(uv))
    }
}

/// A scalar field alternating between `0.0` and `1.0` on an axis-aligned
/// grid in `(u, v)` space, scaled by `u_scale`/`v_scale` cells per unit.
/// Paired with `lerp_ramp`, reproduces the old two-color checkerboard as
/// one instance of the general field-then-ramp texture.
pub fn checkerboard_field(u_scale: Float, v_scale: Float) -> impl Fn(Point2f) -> Float + Send + Sync {
    move |uv: Point2f| {
        let u = (uv.x * u_scale).floor() as i64;
        let v = (uv.y * v_scale).floor() as i64;
        if (u + v) % 2 == 0 {
            0.0
        } else {
            1.0
        }
    }
}

/// A color ramp that linearly interpolates between `low` (at `t = 0`) and
/// `high` (at `t = 1`), clamping `t` outside that range.
pub fn lerp_ramp(low: Spectrum, high: Spectrum) -> impl Fn(Float) -> Spectrum + Send + Sync {
    move |t: Float| Spectrum::lerp(t.max(0.0).min(1.0), low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_across_cells() {
        let tex = Colormap2D::new(checkerboard_field(1.0, 1.0), lerp_ramp(Spectrum::BLACK, Spectrum::new(1.0)));
        assert_ne!(tex.evaluate(Point2f::new(0.2, 0.2)), tex.evaluate(Point2f::new(1.2, 0.2)));
    }

    #[test]
    fn scale_subdivides_the_grid() {
        let tex = Colormap2D::new(checkerboard_field(4.0, 4.0), lerp_ramp(Spectrum::BLACK, Spectrum::new(1.0)));
        assert_ne!(tex.evaluate(Point2f::new(0.1, 0.1)), tex.evaluate(Point2f::new(0.3, 0.1)));
    }

    #[test]
    fn a_continuous_field_shades_smoothly_between_the_ramp_endpoints() {
        let radial = |uv: Point2f| (uv.x * uv.x + uv.y * uv.y).sqrt().min(1.0);
        let tex = Colormap2D::new(radial, lerp_ramp(Spectrum::BLACK, Spectrum::new(1.0)));
        let center = tex.evaluate(Point2f::new(0.0, 0.0));
        let edge = tex.evaluate(Point2f::new(1.0, 0.0));
        assert!(center.average() < edge.average());
    }
}
