//! Scalar math utilities shared across the crate: the `Float` type alias,
//! a numerically stable quadratic solver, and the branch-stable
//! orthonormal-basis construction used by [`crate::frame::Frame`].

use crate::{Vec2f, Vec3f};
use cgmath::Matrix2;

pub type Float = f32;

pub const INFINITY: Float = std::f32::INFINITY;
pub const PI: Float = std::f32::consts::PI;
pub const FRAC_1_PI: Float = std::f32::consts::FRAC_1_PI;

pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    (1.0 - t) * v1 + t * v2
}

pub fn clamp(x: Float, lo: Float, hi: Float) -> Float {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// `sqrt(max(0, x))`, guarding against tiny negative inputs produced by
/// floating point cancellation (e.g. `1.0 - cos_theta_i * cos_theta_i`).
pub fn safe_sqrt(x: Float) -> Float {
    Float::sqrt(Float::max(0.0, x))
}

/// Solves `a*t^2 + b*t + c = 0`, returning the two real roots in ascending
/// order. `None` if the discriminant is negative.
///
/// Uses the standard numerically stable form (see Press et al., *Numerical
/// Recipes*): computing `q = -0.5 * (b +/- sqrt(discriminant))` and dividing
/// rather than applying the textbook formula directly avoids catastrophic
/// cancellation when `b` and `sqrt(discriminant)` are close in magnitude.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discrim = (b as f64) * (b as f64) - 4.0 * (a as f64) * (c as f64);
    if discrim < 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    let q = if b < 0.0 {
        -0.5 * (b as f64 - root_discrim)
    } else {
        -0.5 * (b as f64 + root_discrim)
    };

    let t0 = (q / a as f64) as Float;
    let t1 = (c as f64 / q) as Float;

    if t0 > t1 {
        Some((t1, t0))
    } else {
        Some((t0, t1))
    }
}

/// Builds an orthonormal `(s, t)` basis given a unit vector `n`, using the
/// branch-stable construction of Duff, Burgess, Christensen, Hery, Kensler,
/// Liani, Villemin, *Building an Orthonormal Basis, Revisited*, JCGT 6(1),
/// 2017. Avoids the singularity at the poles that a naive
/// `cross(n, (0,0,1))` construction hits.
pub fn coordinate_system(n: Vec3f) -> (Vec3f, Vec3f) {
    let sign = (1.0 as Float).copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let s = Vec3f::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let t = Vec3f::new(b, sign + n.y * n.y * a, -n.y);
    (s, t)
}

/// Solves `A*x = b` for a 2x2 system via Cramer's rule. `None` if `A` is
/// (numerically) singular.
pub fn solve_linear_system_2x2(a: Matrix2<Float>, b: Vec2f) -> Option<(Float, Float)> {
    let det = a.x.x * a.y.y - a.x.y * a.y.x;
    if det.abs() < 1e-10 {
        return None;
    }
    let x = (a.y.y * b.x - a.y.x * b.y) / det;
    let y = (a.x.x * b.y - a.x.y * b.x) / det;
    Some((x, y))
}
