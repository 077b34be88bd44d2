//! Intersection records.
//!
//! `SurfaceInteraction` is the full hit record a `Shape::intersect` returns:
//! geometric and shading frames, parametric derivatives, and (when ray
//! differentials were traced) the texture-space footprint of the hit.
//! `PositionSample`, `DirectionSample`, and `BSDFSample` are the smaller,
//! purpose-specific records light and BSDF sampling return.

use crate::geometry::Normal3;
use crate::math::Float;
use crate::{Differential, Point2f, Point3f, Ray, RayDifferential, Vec2f, Vec3f};
use cgmath::{EuclideanSpace, InnerSpace, Matrix2, Vector2};

/// The geometric position, position error bound, time, and normal of a
/// surface hit, independent of parametrization. Transforms as a unit (see
/// `geometry::transform::Transformable for SurfaceHit`) since the position
/// error bound and normal both depend on the same underlying matrix.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub p: Point3f,
    pub p_err: Vec3f,
    pub time: Float,
    pub n: Normal3,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DiffGeom {
    pub dpdu: Vec3f,
    pub dpdv: Vec3f,
    pub dndu: Normal3,
    pub dndv: Normal3,
}

/// Partial derivatives of the hit point and parametric coordinates with
/// respect to screen-space pixel offset, used for texture antialiasing.
#[derive(Clone, Copy, Debug)]
pub struct TextureDifferentials {
    pub dpdx: Vec3f,
    pub dpdy: Vec3f,

    pub dudx: Float,
    pub dvdx: Float,

    pub dudy: Float,
    pub dvdy: Float,
}

pub struct SurfaceInteraction<'s> {
    pub hit: SurfaceHit,

    /// (u, v) coordinates from the parametrization of the surface.
    pub uv: Point2f,

    /// The outgoing direction, pointing back along the incident ray.
    pub wo: Vec3f,

    pub geom: DiffGeom,

    pub shading_n: Normal3,
    pub shading_geom: DiffGeom,

    pub tex_diffs: Option<TextureDifferentials>,

    /// The shape that was hit, so the integrator can fetch its BSDF and
    /// area light (if any) without a second dispatch through the scene.
    pub shape: &'s (dyn crate::shapes::Shape + Sync),
}

impl<'s> SurfaceInteraction<'s> {
    pub fn new(
        p: Point3f,
        p_err: Vec3f,
        time: Float,
        uv: Point2f,
        wo: Vec3f,
        n: Normal3,
        geom: DiffGeom,
        shape: &'s (dyn crate::shapes::Shape + Sync),
    ) -> Self {
        SurfaceInteraction {
            hit: SurfaceHit { p, p_err, time, n },
            uv,
            wo,
            geom,
            shading_n: n,
            shading_geom: geom,
            tex_diffs: None,
            shape,
        }
    }

    pub fn n(&self) -> Normal3 {
        self.hit.n
    }

    pub fn p(&self) -> Point3f {
        self.hit.p
    }

    /// Constructs a ray leaving this hit point in direction `dir`, nudged
    /// off the surface along the geometric normal by the accumulated
    /// position error to avoid immediate self-intersection.
    pub fn spawn_ray(&self, dir: Vec3f) -> Ray {
        let o = offset_ray_origin(self.hit.p, self.hit.p_err, self.hit.n, dir);
        Ray { origin: o, dir, t_max: Float::INFINITY, time: self.hit.time }
    }

    pub fn spawn_ray_to(&self, p: Point3f) -> Ray {
        let dir = p - self.hit.p;
        let o = offset_ray_origin(self.hit.p, self.hit.p_err, self.hit.n, dir);
        // Pull t_max back slightly so the shadow ray doesn't re-hit the
        // target surface at t = 1 due to floating point error.
        Ray { origin: o, dir, t_max: 1.0 - 1e-3, time: self.hit.time }
    }

    pub fn spawn_ray_with_differentials(&self, dir: Vec3f, diff: Option<Differential>) -> RayDifferential {
        RayDifferential { ray: self.spawn_ray(dir), diff }
    }

    pub fn compute_differentials(&mut self, ray: &RayDifferential) {
        self.tex_diffs = self.compute_tex_differentials(ray);
    }

    fn compute_tex_differentials(&self, ray: &RayDifferential) -> Option<TextureDifferentials> {
        let n = self.hit.n;
        let diff = ray.diff?;
        let d = n.dot(self.hit.p.to_vec());

        let px = {
            let tx = -(n.dot(diff.rx_origin.to_vec()) - d) / n.dot(diff.rx_dir);
            diff.rx_origin + diff.rx_dir * tx
        };
        let py = {
            let ty = -(n.dot(diff.ry_origin.to_vec()) - d) / n.dot(diff.ry_dir);
            diff.ry_origin + diff.ry_dir * ty
        };

        let dpdx = px - self.hit.p;
        let dpdy = py - self.hit.p;

        let dim = if n.x.abs() > n.y.abs() && n.x.abs() > n.z.abs() {
            (1, 2)
        } else if n.y.abs() > n.z.abs() {
            (0, 2)
        } else {
            (0, 1)
        };

        let dpdu = self.geom.dpdu;
        let dpdv = self.geom.dpdv;
        let a = Matrix2::from_cols(
            Vector2::new(dpdu[dim.0], dpdu[dim.1]),
            Vector2::new(dpdv[dim.0], dpdv[dim.1]),
        );
        let bx = Vec2f::new(dpdx[dim.0], dpdx[dim.1]);
        let by = Vec2f::new(dpdy[dim.0], dpdy[dim.1]);

        let (dudx, dvdx) = crate::math::solve_linear_system_2x2(a, bx)?;
        let (dudy, dvdy) = crate::math::solve_linear_system_2x2(a, by)?;

        Some(TextureDifferentials { dpdx, dpdy, dudx, dvdx, dudy, dvdy })
    }
}

/// A sampled position on a light's surface, together with the probability
/// density (per unit area) of having sampled it there.
#[derive(Clone, Copy, Debug)]
pub struct PositionSample {
    pub p: Point3f,
    pub n: Normal3,
    pub uv: Point2f,
    /// Probability density with respect to surface area.
    pub pdf_area: Float,
    /// Marks a sample drawn from a Dirac measure (a point light's position)
    /// rather than a continuous area distribution.
    pub delta: bool,
}

/// A sampled direction from a reference point toward a light, together with
/// its probability density (per unit solid angle at the reference point),
/// the sampled point and normal on the light, and the distance to it. The
/// radiance carried along `wi` is returned alongside this record by
/// `Light::sample_direction` rather than stored in it, matching the
/// `(DirectionSample, Spectrum)` pair the spec's light sampling contract
/// returns.
#[derive(Clone, Copy, Debug)]
pub struct DirectionSample {
    pub p: Point3f,
    pub n: Normal3,
    pub wi: Vec3f,
    pub pdf: Float,
    pub distance: Float,
    pub delta: bool,
}

impl DirectionSample {
    pub fn invalid() -> Self {
        DirectionSample {
            p: Point3f::new(0.0, 0.0, 0.0),
            n: Normal3::new(0.0, 0.0, 0.0),
            wi: Vec3f::new(0.0, 0.0, 1.0),
            pdf: 0.0,
            distance: 0.0,
            delta: false,
        }
    }
}

/// The outcome of sampling a BSDF: the sampled direction, the BSDF value
/// for that direction, its density, and whether the sampled lobe was
/// (effectively) a delta distribution.
#[derive(Clone, Copy, Debug)]
pub struct BSDFSample {
    pub wi: Vec3f,
    pub f: crate::spectrum::Spectrum,
    pub pdf: Float,
    pub specular: bool,
    /// The relative index of refraction of the sampled lobe (incident side
    /// over transmitted side). `1.0` for every reflection lobe; a
    /// dielectric's transmission lobe sets this so the path integrator can
    /// update its running IOR product.
    pub eta: Float,
}

/// Nudges `p` off the surface along `n` by the accumulated floating point
/// error `p_err`, rounding outward (away from zero) component-wise so the
/// offset point cannot round back onto the surface.
pub fn offset_ray_origin(p: Point3f, p_err: Vec3f, n: Normal3, w: Vec3f) -> Point3f {
    let d = n.0.map(Float::abs).dot(p_err);
    let mut offset = n.0 * d;
    if w.dot(n.0) < 0.0 {
        offset = -offset;
    }
    let mut po = p + offset;
    for i in 0..3 {
        if offset[i] > 0.0 {
            po[i] = crate::err_float::next_float_up(po[i]);
        } else if offset[i] < 0.0 {
            po[i] = crate::err_float::next_float_down(po[i]);
        }
    }
    po
}
