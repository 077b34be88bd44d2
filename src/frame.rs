//! Shading-space orthonormal basis.
//!
//! Every `SurfaceInteraction` carries a `Frame` built from the shading
//! normal; BSDFs evaluate and sample in this local space so their formulas
//! can assume `n = (0, 0, 1)` regardless of the surface's world orientation.

use crate::math::coordinate_system;
use crate::{Vec3f, Float};
use cgmath::InnerSpace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub s: Vec3f,
    pub t: Vec3f,
    pub n: Vec3f,
}

impl Frame {
    /// Builds a frame from an explicit orthonormal triple. Callers must
    /// ensure `s`, `t`, `n` are mutually orthogonal unit vectors.
    pub fn new(s: Vec3f, t: Vec3f, n: Vec3f) -> Self {
        Frame { s, t, n }
    }

    /// Builds a frame from a unit normal alone, filling in `s`/`t` with the
    /// branch-stable construction of Duff et al.
    pub fn from_normal(n: Vec3f) -> Self {
        let (s, t) = coordinate_system(n);
        Frame { s, t, n }
    }

    pub fn to_local(&self, v: Vec3f) -> Vec3f {
        Vec3f::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
    }

    pub fn to_world(&self, v: Vec3f) -> Vec3f {
        self.s * v.x + self.t * v.y + self.n * v.z
    }

    pub fn cos_theta(v: Vec3f) -> Float {
        v.z
    }

    pub fn cos2_theta(v: Vec3f) -> Float {
        v.z * v.z
    }

    pub fn abs_cos_theta(v: Vec3f) -> Float {
        v.z.abs()
    }

    pub fn sin2_theta(v: Vec3f) -> Float {
        Float::max(0.0, 1.0 - Self::cos2_theta(v))
    }

    pub fn sin_theta(v: Vec3f) -> Float {
        Self::sin2_theta(v).sqrt()
    }

    pub fn tan_theta(v: Vec3f) -> Float {
        Self::sin_theta(v) / Self::cos_theta(v)
    }

    pub fn same_hemisphere(a: Vec3f, b: Vec3f) -> bool {
        a.z * b.z > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn from_normal_is_orthonormal() {
        let normals = [
            Vec3f::new(0.0, 0.0, 1.0),
            Vec3f::new(0.0, 0.0, -1.0),
            Vec3f::new(1.0, 0.0, 0.0),
            Vec3f::new(0.577_35, 0.577_35, 0.577_35),
        ];
        for n in normals.iter().copied() {
            let frame = Frame::from_normal(n);
            assert_abs_diff_eq!(frame.s.dot(frame.t), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(frame.s.dot(frame.n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(frame.t.dot(frame.n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(frame.s.magnitude(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(frame.t.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn round_trips_through_local_space() {
        let frame = Frame::from_normal(Vec3f::new(0.0, 1.0, 0.0).normalize());
        let v = Vec3f::new(0.3, 0.4, 0.5);
        let local = frame.to_local(v);
        let world = frame.to_world(local);
        assert_abs_diff_eq!(world.x, v.x, epsilon = 1e-5);
        assert_abs_diff_eq!(world.y, v.y, epsilon = 1e-5);
        assert_abs_diff_eq!(world.z, v.z, epsilon = 1e-5);
    }
}
