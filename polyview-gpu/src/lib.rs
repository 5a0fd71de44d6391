//! wgpu rendering for polyview
//!
//! This crate provides the GPU plumbing for the viewer: device setup,
//! a scene renderer with grid/point/mesh pipelines, texture upload with
//! asynchronous remote fetching, and CPU-to-GPU vertex conversion.

pub mod device;
pub mod renderer;
pub mod texture;
pub mod vertex;

// Re-export commonly used items
pub use device::GpuContext;
pub use renderer::{LightingUniform, RenderConfig, SceneRenderer};
pub use texture::TextureLoader;
pub use vertex::{
    grid_vertices, mesh_to_vertices, point_cloud_to_quads, FlatVertex, MeshVertex,
};
