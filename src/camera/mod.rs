//! Perspective camera: maps a normalized `[0,1)^2` film sample to a ray (and
//! its x/y pixel-footprint differential) through `raster -> screen ->
//! camera -> world` transforms, pbrt-style.

use crate::geometry::transform::Transform;
use crate::math::{lerp, Float, INFINITY};
use crate::{vec3f, point3f};
use crate::{Bounds2f, Differential, Point2f, Point2i, Point3f, Ray, RayDifferential, Transformable, Vec2f};
use cgmath::{EuclideanSpace, InnerSpace};

#[derive(Clone, Copy)]
pub struct CameraSample {
    pub p_film: Point2f,
    pub p_lens: Point2f,
    pub time: Float,
}

pub trait Camera: Sync {
    fn generate_ray(&self, sample: CameraSample) -> (Float, Ray);

    /// The full image resolution this camera was built for, so a renderer
    /// holding only `&dyn Camera` can still map a unit-square film sample
    /// to raster coordinates (see `sample_ray_differential`).
    fn resolution(&self) -> Point2i;

    /// Maps a film sample `s` in `[0, 1)^2` (the unit square spanning the
    /// whole image, independent of resolution) to a ray differential.
    fn sample_ray_differential(
        &self,
        s: Point2f,
        time_sample: Float,
        lens_sample: Point2f,
    ) -> (Float, RayDifferential) {
        let res = self.resolution();
        let p_film = Point2f::new(s.x * res.x as Float, s.y * res.y as Float);
        let sample = CameraSample { p_film, p_lens: lens_sample, time: time_sample };
        self.generate_ray_differential(sample)
    }

    fn generate_ray_differential(&self, sample: CameraSample) -> (Float, RayDifferential) {
        let (mut weight, ray) = self.generate_ray(sample);

        let cs_shift_x = CameraSample { p_film: sample.p_film + Vec2f::new(1.0, 0.0), ..sample };
        let (wtx, rx) = self.generate_ray(cs_shift_x);

        let cs_shift_y = CameraSample { p_film: sample.p_film + Vec2f::new(0.0, 1.0), ..sample };
        let (wty, ry) = self.generate_ray(cs_shift_y);

        let ray_diff = RayDifferential {
            ray,
            diff: Some(Differential {
                rx_origin: rx.origin,
                rx_dir: rx.dir,
                ry_origin: ry.origin,
                ry_dir: ry.dir,
            }),
        };

        if wtx == 0.0 || wty == 0.0 {
            weight = 0.0;
        }
        (weight, ray_diff)
    }
}

struct CameraProjection {
    pub camera_to_screen: Transform,
    pub raster_to_camera: Transform,
}

impl CameraProjection {
    fn new(camera_to_screen: Transform, full_resolution: Point2i, screen_window: Bounds2f) -> Self {
        let screen_to_raster = Transform::scale(full_resolution.x as Float, full_resolution.y as Float, 1.0)
            * Transform::scale(
                1.0 / (screen_window.max.x - screen_window.min.x),
                1.0 / (screen_window.min.y - screen_window.max.y),
                1.0,
            )
            * Transform::translate(vec3f!(-screen_window.min.x, -screen_window.max.y, 0.0));

        let raster_to_screen = screen_to_raster.inverse();
        let raster_to_camera = camera_to_screen.inverse() * raster_to_screen;

        Self { camera_to_screen, raster_to_camera }
    }
}

/// The screen window pbrt uses by default: the unit square stretched along
/// whichever axis the image is wider in, so square pixels map to square
/// regions of the image plane regardless of aspect ratio.
fn default_screen_window(resolution: Point2i) -> Bounds2f {
    let aspect = resolution.x as Float / resolution.y as Float;
    if aspect > 1.0 {
        Bounds2f::with_bounds(Point2f::new(-aspect, -1.0), Point2f::new(aspect, 1.0))
    } else {
        Bounds2f::with_bounds(Point2f::new(-1.0, -1.0 / aspect), Point2f::new(1.0, 1.0 / aspect))
    }
}

pub struct PerspectiveCamera {
    camera_to_world: Transform,
    proj: CameraProjection,
    resolution: Point2i,
    shutter_interval: (Float, Float),
    lens_radius: Float,
    focal_dist: Float,
}

impl PerspectiveCamera {
    pub fn new(
        camera_to_world: Transform,
        full_resolution: Point2i,
        screen_window: Bounds2f,
        shutter_interval: (Float, Float),
        lens_radius: Float,
        focal_dist: Float,
        fov: Float,
    ) -> Self {
        let persp = Transform::perspective(fov, 0.001, 1000.0);
        let proj = CameraProjection::new(persp, full_resolution, screen_window);

        Self {
            camera_to_world,
            proj,
            resolution: full_resolution,
            shutter_interval,
            lens_radius,
            focal_dist,
        }
    }

    /// Builds a camera at `eye` looking toward `target`, with the given
    /// vertical resolution and horizontal field of view in degrees.
    pub fn look_at(
        eye: Point3f,
        target: Point3f,
        up: crate::Vec3f,
        resolution: Point2i,
        fov_degrees: Float,
    ) -> Self {
        let camera_to_world = Transform::camera_look_at(eye, target, up);
        let screen_window = default_screen_window(resolution);
        Self::new(camera_to_world, resolution, screen_window, (0.0, 1.0), 0.0, 1e6, fov_degrees)
    }
}

impl Camera for PerspectiveCamera {
    fn resolution(&self) -> Point2i {
        self.resolution
    }

    fn generate_ray(&self, sample: CameraSample) -> (Float, Ray) {
        let p_film = point3f!(sample.p_film.x, sample.p_film.y, 0);
        let p_camera: Point3f = p_film.transform(self.proj.raster_to_camera);

        let mut origin = Point3f::new(0.0, 0.0, 0.0);
        let mut dir = p_camera.to_vec().normalize();

        if self.lens_radius > 0.0 {
            let lens_sample = crate::warp::square_to_uniform_disk_concentric(sample.p_lens);
            let lens = Point2f::new(lens_sample.x * self.lens_radius, lens_sample.y * self.lens_radius);
            let ft = self.focal_dist / dir.z;
            let p_focus = origin + dir * ft;
            origin = Point3f::new(lens.x, lens.y, 0.0);
            dir = (p_focus - origin).normalize();
        }

        let time = lerp(sample.time, self.shutter_interval.0, self.shutter_interval.1);
        let ray = Ray { origin, dir, time, t_max: INFINITY };
        let ray = ray.transform(self.camera_to_world);
        (1.0, ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> PerspectiveCamera {
        PerspectiveCamera::look_at(
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::new(0.0, 0.0, 0.0),
            crate::Vec3f::new(0.0, 1.0, 0.0),
            Point2i::new(200, 100),
            60.0,
        )
    }

    #[test]
    fn center_of_image_points_toward_the_target() {
        let camera = test_camera();
        let (w, ray) = camera.sample_ray_differential(Point2f::new(0.5, 0.5), 0.5, Point2f::new(0.0, 0.0));
        assert_eq!(w, 1.0);
        assert!(ray.ray.dir.x.abs() < 1e-3 && ray.ray.dir.y.abs() < 1e-3);
        assert!(ray.ray.dir.z > 0.0);
    }

    #[test]
    fn differential_rays_diverge_from_the_main_ray() {
        let camera = test_camera();
        let (_, ray) = camera.sample_ray_differential(Point2f::new(0.5, 0.5), 0.0, Point2f::new(0.0, 0.0));
        let diff = ray.diff.expect("perspective cameras always produce differentials");
        assert!((diff.rx_dir - ray.ray.dir).magnitude() > 0.0);
    }
}
