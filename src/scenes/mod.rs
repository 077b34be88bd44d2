//! Scene construction helpers used by the renderer binary and the
//! integration tests. Generalizes the teacher's `cover_example_scene`:
//! instead of one hardcoded scene, each function here builds a `Scene`
//! whose shapes, lights and camera are assembled the same way (`Scene::
//! builder()`, world-space transforms composed with `Transform::then`).

pub mod cornell_box;

pub use cornell_box::cornell_box;
