//! Furnace test: a fully closed cavity where every wall shares the same
//! diffuse reflectance `rho` and emitted radiance `l0`. In radiative
//! equilibrium every point of the cavity reflects the same uniform
//! incoming radiance back at itself, so the exitant radiance anywhere
//! satisfies `l = l0 + rho*l = l0/(1-rho)` regardless of the cavity's
//! shape or size — a standard correctness check for a Monte Carlo
//! integrator's energy balance, adapted from the teacher's own
//! `tests/furnace.rs` (there driven by a pbrt scene file; here built
//! directly since this crate has no scene file loader).

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use cgmath::Deg;

use radiance::bsdf::diffuse::DiffuseBSDF;
use radiance::camera::PerspectiveCamera;
use radiance::film::Image;
use radiance::integrator::{self, DirectRadianceIntegrator, PathRadianceIntegrator};
use radiance::sampler::IndependentSampler;
use radiance::scene::Scene;
use radiance::shapes::rectangle::Rectangle;
use radiance::shapes::Shape;
use radiance::spectrum::Spectrum;
use radiance::{vec3f, Point2i, Point3f, Transform};

const HALF: f32 = 4.0;

fn furnace_cavity(rho: f32, l0: f32, resolution: Point2i) -> Scene {
    let wall = |rotation: Transform, translation: radiance::Vec3f| -> Arc<dyn Shape> {
        let object_to_world =
            Transform::scale(HALF, HALF, 1.0).then(rotation).then(Transform::translate(translation));
        Arc::new(Rectangle::new(object_to_world, Box::new(DiffuseBSDF::new(Spectrum::new(rho)))))
    };

    let floor = wall(Transform::rotate_x(Deg(-90.0)), vec3f!(0.0, -HALF, 0.0));
    let ceiling = wall(Transform::rotate_x(Deg(90.0)), vec3f!(0.0, HALF, 0.0));
    let back = wall(Transform::rotate_y(Deg(180.0)), vec3f!(0.0, 0.0, HALF));
    let front = wall(Transform::IDENTITY, vec3f!(0.0, 0.0, -HALF));
    let left = wall(Transform::rotate_y(Deg(90.0)), vec3f!(-HALF, 0.0, 0.0));
    let right = wall(Transform::rotate_y(Deg(-90.0)), vec3f!(HALF, 0.0, 0.0));

    let camera = Arc::new(PerspectiveCamera::look_at(
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(0.0, 0.0, 1.0),
        vec3f!(0.0, 1.0, 0.0),
        resolution,
        70.0,
    ));

    let walls: Vec<Arc<dyn Shape>> = vec![floor, ceiling, back, front, left, right];
    let mut builder = Scene::builder();
    for w in walls {
        builder = builder.area_light(Spectrum::new(l0), w);
    }
    builder.camera(camera).build().expect("furnace_cavity always sets a camera")
}

fn mean_radiance(image: &Image) -> f32 {
    let sum: f32 = image.pixels().iter().map(|p| p.average()).sum();
    sum / image.pixels().len() as f32
}

#[test]
fn path_tracer_reaches_radiative_equilibrium() -> anyhow::Result<()> {
    let rho = 0.5;
    let l0 = 1.0;
    let scene = furnace_cavity(rho, l0, Point2i::new(12, 12));
    let sampler = IndependentSampler::new(128, 7);
    let integrator = PathRadianceIntegrator { max_depth: 48, roulette_depth: 4 };

    let mut image = Image::new(scene.camera.resolution());
    integrator::render(&integrator, &scene, &sampler, &mut image)?;

    let expected = l0 / (1.0 - rho);
    assert_abs_diff_eq!(mean_radiance(&image), expected, epsilon = 0.4);
    Ok(())
}

#[test]
fn direct_lighting_sees_only_the_first_bounce() -> anyhow::Result<()> {
    let rho = 0.5;
    let l0 = 1.0;
    let scene = furnace_cavity(rho, l0, Point2i::new(12, 12));
    let sampler = IndependentSampler::new(128, 11);
    let integrator = DirectRadianceIntegrator::default();

    let mut image = Image::new(scene.camera.resolution());
    integrator::render(&integrator, &scene, &sampler, &mut image)?;

    // No recursion: one bounce of direct illumination on top of the wall's
    // own emission, `l0 * (1 + rho)`, not the full equilibrium series.
    let expected = l0 * (1.0 + rho);
    assert_abs_diff_eq!(mean_radiance(&image), expected, epsilon = 0.25);
    Ok(())
}
