//! Core geometric types: points, vectors, normals, rays, and their
//! ray-differential and error-bound variants. Built on `cgmath` rather than
//! a from-scratch vector library.

pub mod bounds;
pub mod transform;

use crate::math::Float;
use cgmath::{InnerSpace, Point2, Point3, Vector2, Vector3};
use std::ops::{Deref, Index, Mul, MulAssign, Neg};

pub type Point2f = Point2<Float>;
pub type Point2i = Point2<i32>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec2i = Vector2<i32>;
pub type Vec3f = Vector3<Float>;

/// A surface normal. Kept distinct from `Vec3f` because normals transform
/// by the inverse transpose of a transformation matrix rather than the
/// matrix itself (see `transform::Transform::transform_normal`).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Normal3(pub Vec3f);

impl Normal3 {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3(Vec3f::new(x, y, z))
    }

    pub fn normalize(self) -> Self {
        Normal3(self.0.normalize())
    }

    pub fn dot(self, other: Vec3f) -> Float {
        self.0.dot(other)
    }
}

impl Deref for Normal3 {
    type Target = Vec3f;
    fn deref(&self) -> &Vec3f {
        &self.0
    }
}

impl From<Vec3f> for Normal3 {
    fn from(v: Vec3f) -> Self {
        Normal3(v)
    }
}

impl Index<usize> for Normal3 {
    type Output = Float;
    fn index(&self, i: usize) -> &Float {
        &self.0[i]
    }
}

impl std::ops::Sub for Normal3 {
    type Output = Normal3;
    fn sub(self, rhs: Normal3) -> Normal3 {
        Normal3(self.0 - rhs.0)
    }
}

impl Mul<Float> for Normal3 {
    type Output = Normal3;
    fn mul(self, rhs: Float) -> Normal3 {
        Normal3(self.0 * rhs)
    }
}

impl MulAssign<Float> for Normal3 {
    fn mul_assign(&mut self, rhs: Float) {
        self.0 *= rhs;
    }
}

impl Neg for Normal3 {
    type Output = Normal3;
    fn neg(self) -> Normal3 {
        Normal3(-self.0)
    }
}

/// A ray `o + t*d` for `t` in `[0, t_max)`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    pub t_max: Float,
    pub time: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Ray { origin, dir, t_max: Float::INFINITY, time: 0.0 }
    }

    pub fn with_t_max(origin: Point3f, dir: Vec3f, t_max: Float) -> Self {
        Ray { origin, dir, t_max, time: 0.0 }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + self.dir * t
    }
}

/// The auxiliary rays offset by one pixel in x and y, used to estimate
/// texture-space footprint for filtering (see `interaction::TextureDifferentials`).
#[derive(Clone, Copy, Debug)]
pub struct Differential {
    pub rx_origin: Point3f,
    pub ry_origin: Point3f,
    pub rx_dir: Vec3f,
    pub ry_dir: Vec3f,
}

#[derive(Clone, Copy, Debug)]
pub struct RayDifferential {
    pub ray: Ray,
    pub diff: Option<Differential>,
}

impl RayDifferential {
    pub fn new(ray: Ray) -> Self {
        RayDifferential { ray, diff: None }
    }

    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(diff) = &mut self.diff {
            diff.rx_origin = self.ray.origin + (diff.rx_origin - self.ray.origin) * s;
            diff.ry_origin = self.ray.origin + (diff.ry_origin - self.ray.origin) * s;
            diff.rx_dir = self.ray.dir + (diff.rx_dir - self.ray.dir) * s;
            diff.ry_dir = self.ray.dir + (diff.ry_dir - self.ray.dir) * s;
        }
    }
}

impl Deref for RayDifferential {
    type Target = Ray;
    fn deref(&self) -> &Ray {
        &self.ray
    }
}

/// Component-wise helpers cgmath's generic vector types don't provide
/// directly; kept as a small extension trait rather than newtype-wrapping
/// `Vector3`/`Point3` everywhere.
pub trait ComponentWiseExt {
    fn abs(&self) -> Self;
}

impl ComponentWiseExt for Vec3f {
    fn abs(&self) -> Self {
        Vec3f::new(self.x.abs(), self.y.abs(), self.z.abs())
    }
}

impl ComponentWiseExt for Point3f {
    fn abs(&self) -> Self {
        Point3f::new(self.x.abs(), self.y.abs(), self.z.abs())
    }
}

/// Index of the largest-magnitude component, used by the triangle
/// intersection routine to choose which axis to shear rays onto.
pub fn max_dimension(v: Vec3f) -> usize {
    if v.x > v.y && v.x > v.z {
        0
    } else if v.y > v.z {
        1
    } else {
        2
    }
}

pub fn permute_vec(v: Vec3f, x: usize, y: usize, z: usize) -> Vec3f {
    Vec3f::new(v[x], v[y], v[z])
}

pub fn permute_point(p: Point3f, x: usize, y: usize, z: usize) -> Point3f {
    Point3f::new(p[x], p[y], p[z])
}

/// Flips `n` to lie in the same hemisphere as `v`.
pub fn faceforward(n: Vec3f, v: Vec3f) -> Vec3f {
    if n.dot(v) < 0.0 {
        -n
    } else {
        n
    }
}
