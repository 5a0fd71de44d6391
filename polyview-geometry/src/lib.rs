//! Geometric operations for polyview
//!
//! This crate turns a 2D polygon contour into a renderable ground-plane
//! mesh: constrained Delaunay triangulation (via spade), vertex-merged
//! mesh construction, and planar UV projection.

pub mod mesh_builder;
pub mod triangulate;
pub mod uv;

pub use mesh_builder::*;
pub use triangulate::*;
pub use uv::*;

use polyview_core::{lift_to_ground, Point2f, Point3f, Result, TriangleMesh};

/// Build the textured ground mesh for a contour: triangulate, lift into
/// the ground plane, merge shared vertices and assign planar UVs.
pub fn ground_mesh_from_contour(
    contour: &[Point2f],
    holes: &[Vec<Point2f>],
) -> Result<TriangleMesh> {
    let triangles = triangulate_contour(contour, holes)?;
    let lifted: Vec<[Point3f; 3]> = triangles
        .iter()
        .map(|tri| {
            [
                lift_to_ground(&tri[0]),
                lift_to_ground(&tri[1]),
                lift_to_ground(&tri[2]),
            ]
        })
        .collect();

    let mut mesh = mesh_from_triangles(&lifted);
    assign_planar_uvs(&mut mesh);
    Ok(mesh)
}
