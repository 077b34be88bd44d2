//! A physically-based Monte Carlo radiance integrator.
//!
//! The crate is organized leaf-first: math utilities and geometric
//! primitives at the bottom, the `Shape`/`BSDF`/`Light` sampling hierarchy
//! in the middle, and the two radiance integrators (`DirectRadianceIntegrator`,
//! `PathRadianceIntegrator`) on top of a `Scene`.

#[macro_use]
pub mod macros;

pub mod math;
pub mod err_float;
pub mod frame;
pub mod warp;
pub mod fresnel;
pub mod spectrum;
pub mod geometry;
pub mod interaction;
pub mod sampler;
pub mod texture;
pub mod bsdf;
pub mod shapes;
pub mod light;
pub mod camera;
pub mod scene;
pub mod film;
pub mod integrator;
pub mod error;
pub mod scenes;

pub use crate::math::Float;
pub use crate::geometry::{
    Differential, Normal3, Point2f, Point2i, Point3f, Ray, RayDifferential, Vec2f, Vec3f,
};
pub use crate::geometry::transform::{Transform, Transformable};
pub use crate::geometry::bounds::{Bounds2f, Bounds2i, Bounds3f};
pub use crate::frame::Frame;
pub use crate::spectrum::Spectrum;
pub use crate::sampler::Sampler;
pub use crate::scene::Scene;
