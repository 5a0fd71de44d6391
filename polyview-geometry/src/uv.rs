//! Planar texture projection for ground-plane meshes

use polyview_core::{Aabb, TriangleMesh};

/// Assign UVs by projecting vertices against the mesh bounding box.
///
/// U follows world X normalized over the box extent; V follows world
/// depth Z, inverted so the texture's top-left origin lands at minimum
/// X / maximum Z. A box axis with zero extent maps to 0 on that axis.
/// One UV triple is emitted per face, in corner order.
pub fn assign_planar_uvs(mesh: &mut TriangleMesh) {
    let Some(bounds) = Aabb::from_points(&mesh.vertices) else {
        mesh.uvs = None;
        return;
    };
    let extent = bounds.extent();

    let mut uvs = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        let corner = |index: usize| -> [f32; 2] {
            let vertex = mesh.vertices[index];
            let u = if extent.x > 0.0 {
                (vertex.x - bounds.min.x) / extent.x
            } else {
                0.0
            };
            let v = if extent.z > 0.0 {
                (bounds.max.z - vertex.z) / extent.z
            } else {
                0.0
            };
            [u, v]
        };
        uvs.push([corner(face[0]), corner(face[1]), corner(face[2])]);
    }
    mesh.uvs = Some(uvs);
}
