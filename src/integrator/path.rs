//! Unidirectional path tracing with next-event estimation and Russian
//! roulette (spec.md §4.11). Each bounce adds a light sample (MIS-weighted
//! against the BSDF strategy) and then extends the path by sampling the
//! BSDF; a path-traced ray that lands directly on a light adds its
//! emission MIS-weighted against the light-sampling strategy, using the
//! pdf the *previous* bounce's BSDF sample carried forward.

use crate::bsdf::TransportMode;
use crate::frame::Frame;
use crate::integrator::{mis_weight, sample_direct_lighting, RadianceIntegrator};
use crate::math::Float;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::RayDifferential;

pub struct PathRadianceIntegrator {
    pub max_depth: u32,
    /// Bounces before Russian roulette starts culling paths. Below this
    /// depth every path survives, so short paths (the common case) pay no
    /// roulette variance at all.
    pub roulette_depth: u32,
}

impl Default for PathRadianceIntegrator {
    fn default() -> Self {
        PathRadianceIntegrator { max_depth: 8, roulette_depth: 3 }
    }
}

impl RadianceIntegrator for PathRadianceIntegrator {
    fn li(&self, ray: &RayDifferential, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum {
        let mut l = Spectrum::BLACK;
        let mut beta = Spectrum::new(1.0);
        // Accumulated `eta^2` of every dielectric boundary crossed so far,
        // which scales the variance Russian roulette tests against,
        // matching the radiance scaling `DielectricBSDF::sample` applies
        // to `beta` itself (spec.md §9, "accumulate eta").
        let mut eta_scale = 1.0;
        let mut specular_bounce = true;
        let mut prev_bsdf_pdf: Float = 0.0;
        let mut ray = ray.ray;

        let mut depth = 0;
        loop {
            let si = match scene.intersect(&ray) {
                Some(si) => si,
                None => break,
            };

            if let Some(idx) = si.shape.area_light_index() {
                let le = scene.lights[idx].evaluate(&si);
                if !le.is_black() {
                    let weight = if specular_bounce {
                        1.0
                    } else {
                        let light_pdf = scene.pdf_light_direction(ray.origin, &si);
                        mis_weight(prev_bsdf_pdf, light_pdf)
                    };
                    l += beta * le * weight;
                }
            }

            if depth >= self.max_depth {
                break;
            }
            depth += 1;

            let frame = Frame::from_normal(si.shading_n.0);
            let wo = frame.to_local(si.wo);
            let bsdf = si.shape.bsdf();

            l += beta * sample_direct_lighting(&si, wo, bsdf, scene, sampler, &frame, 1, 1);

            let bs = match bsdf.sample(si.uv, wo, sampler.next_2d(), TransportMode::Radiance) {
                Some(bs) if bs.pdf > 0.0 && !bs.f.is_black() => bs,
                _ => break,
            };

            beta *= bs.f * (bs.wi.z.abs() / bs.pdf);
            eta_scale *= bs.eta * bs.eta;
            specular_bounce = bs.specular;
            prev_bsdf_pdf = bs.pdf;

            ray = si.spawn_ray(frame.to_world(bs.wi));

            let roulette_beta = beta * eta_scale;
            if depth > self.roulette_depth {
                let q = roulette_beta.max_component_value().min(0.95);
                if q <= 0.0 || sampler.next_1d() > q {
                    break;
                }
                beta /= q;
            }
        }

        l
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::diffuse::DiffuseBSDF;
    use crate::camera::PerspectiveCamera;
    use crate::light::point::PointLight;
    use crate::sampler::IndependentSampler;
    use crate::scene::Scene;
    use crate::shapes::sphere::Sphere;
    use crate::shapes::Shape;
    use crate::{vec3f, Point2i, Point3f, Ray, RayDifferential, Transform};
    use std::sync::Arc;

    fn lit_sphere_scene() -> Scene {
        let sphere: Arc<dyn Shape> = Arc::new(Sphere::new(
            Transform::IDENTITY,
            1.0,
            Box::new(DiffuseBSDF::new(Spectrum::new(0.5))),
            None,
        ));
        let camera = Arc::new(PerspectiveCamera::look_at(
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::new(0.0, 0.0, 0.0),
            vec3f!(0, 1, 0),
            Point2i::new(16, 16),
            40.0,
        ));
        Scene::builder()
            .shape(sphere)
            .light(Arc::new(PointLight::new(Point3f::new(2.0, 2.0, -2.0), Spectrum::new(20.0))))
            .camera(camera)
            .build()
            .expect("scene has a camera")
    }

    #[test]
    fn a_ray_that_misses_everything_is_black() {
        let scene = lit_sphere_scene();
        let integrator = PathRadianceIntegrator::default();
        let mut sampler = IndependentSampler::new(1, 0);
        let ray = RayDifferential::new(Ray::new(Point3f::new(0.0, 0.0, -5.0), vec3f!(0, 1, 0)));
        let l = integrator.li(&ray, &scene, &mut sampler);
        assert!(l.is_black());
    }

    #[test]
    fn a_lit_diffuse_sphere_returns_positive_radiance() {
        let scene = lit_sphere_scene();
        let integrator = PathRadianceIntegrator::default();
        let ray = RayDifferential::new(Ray::new(Point3f::new(0.0, 0.0, -5.0), vec3f!(0, 0, 1)));
        let mut total = Spectrum::BLACK;
        let mut sampler = IndependentSampler::new(64, 1);
        for _ in 0..64 {
            total += integrator.li(&ray, &scene, &mut sampler);
        }
        assert!(total.max_component_value() > 0.0);
    }
}
