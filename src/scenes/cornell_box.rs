//! The classic Cornell box: five diffuse walls (red left, green right,
//! white floor/ceiling/back), a small emissive rectangle set into the
//! ceiling, and two spheres resting on the floor, one diffuse and one
//! dielectric. A standard scene for judging a Monte Carlo integrator by
//! eye: color bleeding between the colored walls, soft shadows under the
//! area light, and caustic/refraction behavior through the glass sphere.

use std::sync::Arc;

use cgmath::Deg;

use crate::bsdf::dielectric::DielectricBSDF;
use crate::bsdf::diffuse::DiffuseBSDF;
use crate::camera::PerspectiveCamera;
use crate::geometry::transform::Transform;
use crate::scene::Scene;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;
use crate::shapes::Shape;
use crate::spectrum::Spectrum;
use crate::{vec3f, Point2i, Point3f, Vec3f};

/// Half the box's side length: walls run from `-HALF` to `+HALF` along
/// whichever two axes they span.
const HALF: f32 = 1.0 as f32;

fn wall(rotation: Transform, translation: Vec3f, bsdf: Box<dyn crate::bsdf::BSDF>) -> Arc<dyn Shape> {
    let object_to_world =
        Transform::scale(HALF as _, HALF as _, 1.0).then(rotation).then(Transform::translate(translation));
    Arc::new(Rectangle::new(object_to_world, bsdf))
}

/// Builds a Cornell box scene at the given output resolution. The box
/// itself is fixed at `[-1, 1]^3`; only the camera's pixel resolution is
/// a parameter, so callers can render it at preview or final quality
/// without touching the geometry.
pub fn cornell_box(resolution: Point2i) -> Scene {
    let white = || Box::new(DiffuseBSDF::new(Spectrum::rgb(0.73, 0.73, 0.73)));
    let red = Box::new(DiffuseBSDF::new(Spectrum::rgb(0.63, 0.065, 0.05)));
    let green = Box::new(DiffuseBSDF::new(Spectrum::rgb(0.14, 0.45, 0.091)));

    let floor = wall(Transform::rotate_x(Deg(-90.0)), vec3f!(0.0, -HALF, 0.0), white());
    let ceiling = wall(Transform::rotate_x(Deg(90.0)), vec3f!(0.0, HALF, 0.0), white());
    let back_wall = wall(Transform::rotate_y(Deg(180.0)), vec3f!(0.0, 0.0, HALF), white());
    let left_wall = wall(Transform::rotate_y(Deg(90.0)), vec3f!(-HALF, 0.0, 0.0), red);
    let right_wall = wall(Transform::rotate_y(Deg(-90.0)), vec3f!(HALF, 0.0, 0.0), green);

    // The emitter: a small rectangle just under the ceiling, facing down
    // into the box (same orientation as `ceiling`, smaller and nudged
    // down so it doesn't z-fight with it).
    let light_half = 0.35;
    let light_to_world = Transform::scale(light_half, light_half, 1.0)
        .then(Transform::rotate_x(Deg(90.0)))
        .then(Transform::translate(vec3f!(0.0, HALF - 0.01, 0.0)));
    let light_shape: Arc<dyn Shape> =
        Arc::new(Rectangle::new(light_to_world, Box::new(DiffuseBSDF::new(Spectrum::BLACK))));

    let diffuse_sphere_radius = 0.35;
    let diffuse_sphere = Arc::new(Sphere::new(
        Transform::translate(vec3f!(-0.4, -HALF + diffuse_sphere_radius, 0.3)),
        diffuse_sphere_radius,
        Box::new(DiffuseBSDF::new(Spectrum::rgb(0.2, 0.4, 0.7))),
        None,
    ));

    let glass_sphere_radius = 0.3;
    let glass_sphere = Arc::new(Sphere::new(
        Transform::translate(vec3f!(0.45, -HALF + glass_sphere_radius, -0.3)),
        glass_sphere_radius,
        Box::new(DielectricBSDF::new(1.5)),
        None,
    ));

    let camera = Arc::new(PerspectiveCamera::look_at(
        Point3f::new(0.0, 0.0, -HALF * 3.6),
        Point3f::new(0.0, 0.0, 0.0),
        vec3f!(0.0, 1.0, 0.0),
        resolution,
        38.0,
    ));

    Scene::builder()
        .shape(floor)
        .shape(ceiling)
        .shape(back_wall)
        .shape(left_wall)
        .shape(right_wall)
        .shape(diffuse_sphere)
        .shape(glass_sphere)
        .area_light(Spectrum::new(15.0), light_shape)
        .camera(camera)
        .build()
        .expect("cornell_box always sets a camera")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_seven_shapes_and_one_light() {
        let scene = cornell_box(Point2i::new(32, 32));
        assert_eq!(scene.shapes.len(), 8);
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn a_ray_from_the_camera_through_the_box_hits_something() {
        let scene = cornell_box(Point2i::new(32, 32));
        let (_, ray) = scene.camera.generate_ray(crate::camera::CameraSample {
            p_film: crate::Point2f::new(16.0, 16.0),
            p_lens: crate::Point2f::new(0.0, 0.0),
            time: 0.0,
        });
        assert!(scene.intersect(&ray).is_some());
    }
}
