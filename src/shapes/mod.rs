//! Geometric primitives. A `Shape` owns its `BSDF` directly (no separate
//! `Material`/arena-allocated-BSDF indirection) and, optionally, a
//! back-reference flag marking it as an area light's geometry.

pub mod rectangle;
pub mod sphere;
pub mod triangle;

use crate::bsdf::BSDF;
use crate::geometry::bounds::Bounds3f;
use crate::geometry::Ray;
use crate::geometry::transform::Transform;
use crate::interaction::{PositionSample, SurfaceInteraction};
use crate::math::Float;
use crate::Point2f;

/// A ray-primitive intersection contract implementing both the any-hit and
/// closest-hit queries every acceleration structure (brute force or BVH)
/// is built on top of.
pub trait Shape: Send + Sync {
    fn object_bound(&self) -> Bounds3f;

    fn world_bound(&self) -> Bounds3f {
        self.object_to_world().transform(self.object_bound())
    }

    fn object_to_world(&self) -> &Transform;

    fn reverse_orientation(&self) -> bool {
        false
    }

    fn area(&self) -> Float;

    /// The closest intersection with `ray` closer than `ray.t_max`, if any.
    fn intersect(&self, ray: &Ray) -> Option<(Float, SurfaceInteraction)>;

    /// Whether `ray` intersects this shape at all, closer than `ray.t_max`.
    /// Has a default implementation in terms of `intersect`, but concrete
    /// shapes should override it with a cheaper any-hit test when one
    /// exists (shadow rays dominate a path tracer's ray count).
    fn intersect_test(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    /// Uniformly samples a point on the shape's surface with respect to
    /// surface area, used by area light sampling.
    fn sample_area(&self, u: Point2f) -> PositionSample;

    fn pdf_area(&self) -> Float {
        1.0 / self.area()
    }

    /// The BSDF attached to this shape.
    fn bsdf(&self) -> &dyn BSDF;

    /// The index into `Scene::lights` of the area light this shape is the
    /// geometry of, if any. A ray that terminates on this shape adds the
    /// light's emitted radiance directly, and a BSDF-sampled ray that lands
    /// here needs this index to weight that contribution against the
    /// light-sampling strategy's density for the same direction.
    ///
    /// Set once, at scene-build time, via `mark_area_light` (after the
    /// shape and the light wrapping it both exist, since the light owns an
    /// `Arc` clone of this same shape and the index depends on where that
    /// light ends up in the scene's light list).
    fn area_light_index(&self) -> Option<usize> {
        None
    }

    /// Records that this shape is the geometry of `Scene::lights[idx]`.
    /// Shapes that can be area lights store `idx` behind an atomic so it
    /// can be set through a shared `Arc<dyn Shape>` after construction;
    /// shapes that never back a light may leave this a no-op.
    fn mark_area_light(&self, idx: usize) {
        let _ = idx;
    }
}
