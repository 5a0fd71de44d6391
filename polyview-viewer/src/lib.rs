//! Interactive viewing of ground-plane contour scenes
//!
//! This crate assembles the scene (reference grid, contour point cloud,
//! textured ground mesh), owns the camera and orbit controls, and drives
//! the render loop through an explicit mount/unmount lifecycle.

pub mod camera;
pub mod controls;
pub mod scene;
pub mod viewer;

pub use camera::Camera;
pub use controls::OrbitControls;
pub use scene::SceneData;
pub use viewer::{ContourViewer, Lifecycle, ViewerConfig, ViewerState};
