//! Core data structures for polyview
//!
//! This crate provides the fundamental types for contour visualization:
//! ground-plane points, point clouds, triangle meshes and bounding boxes.

pub mod bounds;
pub mod error;
pub mod mesh;
pub mod point;
pub mod point_cloud;

pub use bounds::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use point_cloud::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector3};

/// Common result type for polyview operations
pub type Result<T> = std::result::Result<T, Error>;
