//! The scene: an immutable collection of shapes, lights, and a camera,
//! queried by the integrators but never mutated during rendering (spec.md
//! §3 "Lifecycle").
//!
//! Acceleration is a linear scan over `shapes`, which satisfies spec.md
//! §4.4's `intersect`/`anyHit` contract exactly ("a BVH is optional and its
//! internal structure is unspecified here — it must only satisfy the
//! any-hit/closest-hit ray query contract"); a tree-structured accelerator
//! can be dropped in behind the same two methods without any caller change.

use std::sync::Arc;

use crate::camera::Camera;
use crate::err_float::gamma;
use crate::error::RenderError;
use crate::geometry::bounds::Bounds3f;
use crate::interaction::{DirectionSample, SurfaceInteraction};
use crate::light::Light;
use crate::math::Float;
use crate::shapes::Shape;
use crate::spectrum::Spectrum;
use crate::{Point2f, Point3f, Ray};
use cgmath::EuclideanSpace;

pub struct Scene {
    pub shapes: Vec<Arc<dyn Shape>>,
    pub lights: Vec<Arc<dyn Light>>,
    pub camera: Arc<dyn Camera>,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// The closest intersection with `ray`, if any. Shrinks `ray.t_max` as
    /// closer hits are found so later shapes in the list can reject
    /// themselves cheaply against it.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let mut ray = *ray;
        let mut closest = None;
        for shape in &self.shapes {
            if let Some((t, si)) = shape.intersect(&ray) {
                ray.t_max = t;
                closest = Some(si);
            }
        }
        closest
    }

    /// An early-out shadow query: true as soon as any shape reports a hit,
    /// without computing a full `SurfaceInteraction` for it.
    pub fn intersect_test(&self, ray: &Ray) -> bool {
        self.shapes.iter().any(|shape| shape.intersect_test(ray))
    }

    pub fn world_bound(&self) -> Bounds3f {
        self.shapes
            .iter()
            .fold(Bounds3f::empty(), |b, shape| b.join(&shape.world_bound()))
    }

    /// Picks one of `self.lights` uniformly, rescales `u.x` to recover a
    /// fresh `[0,1)` sample for it, and samples a direction toward it from
    /// `it_p` (spec.md §4.8). The returned pdf is already in the combined
    /// "uniformly pick one of N lights" measure, and the radiance is
    /// scaled by `N` to keep the Monte Carlo estimator unbiased.
    ///
    /// When `test_visibility` is set, a shadow ray is traced and the
    /// radiance zeroed on any hit before `shadowEpsilon` of the light.
    pub fn sample_light_direction(
        &self,
        it_p: Point3f,
        u: Point2f,
        test_visibility: bool,
    ) -> (DirectionSample, Spectrum) {
        let n = self.lights.len();
        if n == 0 {
            return (DirectionSample::invalid(), Spectrum::BLACK);
        }
        let n_f = n as Float;
        let i = ((u.x * n_f) as usize).min(n - 1);
        let u_rescaled = Point2f::new((u.x - i as Float / n_f) * n_f, u.y);

        let (mut ds, mut radiance) = self.lights[i].sample_direction(it_p, u_rescaled);
        ds.pdf *= 1.0 / n_f;
        radiance *= n_f;

        if test_visibility && ds.pdf > 0.0 && !radiance.is_black() {
            if self.occluded(it_p, &ds) {
                radiance = Spectrum::BLACK;
            }
        }

        (ds, radiance)
    }

    /// The solid-angle pdf `sample_light_direction` would assign to a
    /// direction that happened to land on `si`'s shape, for the BSDF
    /// sampling strategy's side of MIS (spec.md §4.8 `pdfLightDirection`).
    /// `DirectionSample` carries no back-pointer to the light it came from
    /// (spec.md §9's cyclic shape/light relation is resolved the other
    /// way here): the light is recovered from `si.shape.area_light_index`,
    /// the same back-pointer `AreaLight::evaluate` needs.
    pub fn pdf_light_direction(&self, it_p: Point3f, si: &SurfaceInteraction) -> Float {
        let n = self.lights.len();
        if n == 0 {
            return 0.0;
        }
        let idx = match si.shape.area_light_index() {
            Some(idx) => idx,
            None => return 0.0,
        };

        let d = si.p() - it_p;
        let distance2 = cgmath::InnerSpace::magnitude2(d);
        if distance2 <= 0.0 {
            return 0.0;
        }
        let distance = distance2.sqrt();
        let wi = d / distance;
        let ds = DirectionSample { p: si.p(), n: si.n(), wi, pdf: 0.0, distance, delta: false };

        self.lights[idx].pdf_direction(it_p, &ds) / n as Float
    }

    fn occluded(&self, it_p: Point3f, ds: &DirectionSample) -> bool {
        let max_abs = it_p.x.abs().max(it_p.y.abs()).max(it_p.z.abs());
        let ray_epsilon = gamma(1500) * (1.0 + max_abs);
        let shadow_epsilon = 10.0 * ray_epsilon;

        let origin = it_p + ds.wi * ray_epsilon;
        let t_max = ds.distance * (1.0 - shadow_epsilon);
        let shadow_ray = Ray::with_t_max(origin, ds.wi, t_max.max(0.0));
        self.intersect_test(&shadow_ray)
    }
}

/// Assembles a `Scene` from a scene-building collaborator (spec.md §6):
/// shapes and lights are added one at a time and the area-light back
/// pointer (`Shape::mark_area_light`) is wired up as each area light is
/// added, so by the time `build()` runs every `Shape::area_light_index()`
/// already agrees with the final `lights` ordering.
#[derive(Default)]
pub struct SceneBuilder {
    shapes: Vec<Arc<dyn Shape>>,
    lights: Vec<Arc<dyn Light>>,
    camera: Option<Arc<dyn Camera>>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        SceneBuilder { shapes: Vec::new(), lights: Vec::new(), camera: None }
    }

    pub fn shape(mut self, shape: Arc<dyn Shape>) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn light(mut self, light: Arc<dyn Light>) -> Self {
        self.lights.push(light);
        self
    }

    /// Adds a shape that is simultaneously ordinary scene geometry and the
    /// support of a `DiffuseAreaLight`: the same `Arc` is pushed to both
    /// lists (see `shapes::Shape`'s doc comment on the back-reference
    /// pattern) and its `area_light_index` is set to the index the new
    /// light will occupy.
    pub fn area_light(mut self, radiance: Spectrum, shape: Arc<dyn Shape>) -> Self {
        let idx = self.lights.len();
        shape.mark_area_light(idx);
        self.shapes.push(shape.clone());
        self.lights
            .push(Arc::new(crate::light::diffuse::DiffuseAreaLight::new(radiance, shape)));
        self
    }

    pub fn camera(mut self, camera: Arc<dyn Camera>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn build(self) -> Result<Scene, RenderError> {
        let camera = self.camera.ok_or(RenderError::NoCamera)?;
        Ok(Scene { shapes: self.shapes, lights: self.lights, camera })
    }
}
