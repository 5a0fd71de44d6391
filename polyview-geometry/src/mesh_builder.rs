//! Building an indexed mesh from triangulator output

use std::collections::HashMap;

use polyview_core::{Point3f, TriangleMesh};

/// Merge tolerance used by [`mesh_from_triangles`]; vertices closer than
/// this collapse to a single entry.
pub const DEFAULT_MERGE_TOLERANCE: f32 = 1e-4;

/// Build an indexed mesh from a set of triangles.
///
/// Each triangle's corners are appended as vertices with a face
/// referencing them, then a single merge pass collapses coincident
/// vertices so adjacent triangles share edges topologically. An empty
/// triangle set yields an empty mesh.
pub fn mesh_from_triangles(triangles: &[[Point3f; 3]]) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    for tri in triangles {
        let a = mesh.add_vertex(tri[0]);
        let b = mesh.add_vertex(tri[1]);
        let c = mesh.add_vertex(tri[2]);
        mesh.add_face([a, b, c]);
    }
    merge_vertices(&mut mesh, DEFAULT_MERGE_TOLERANCE);
    mesh
}

/// Merge vertices within `tolerance` of each other, rewriting face
/// indices to the surviving vertex and dropping the duplicates.
///
/// Positions are quantized onto a tolerance-sized grid; the first vertex
/// seen in a cell survives. Faces collapsed to fewer than three distinct
/// vertices are removed. Running the pass a second time changes nothing.
/// Per-face UVs are invalidated by the index rewrite and cleared.
pub fn merge_vertices(mesh: &mut TriangleMesh, tolerance: f32) {
    let quantize = |value: f32| -> i64 { (value / tolerance).round() as i64 };

    let mut first_in_cell: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    let mut kept: Vec<Point3f> = Vec::new();

    for vertex in &mesh.vertices {
        let key = (quantize(vertex.x), quantize(vertex.y), quantize(vertex.z));
        let index = *first_in_cell.entry(key).or_insert_with(|| {
            kept.push(*vertex);
            kept.len() - 1
        });
        remap.push(index);
    }

    let faces = mesh
        .faces
        .iter()
        .map(|face| [remap[face[0]], remap[face[1]], remap[face[2]]])
        .filter(|face| face[0] != face[1] && face[1] != face[2] && face[2] != face[0])
        .collect();

    mesh.vertices = kept;
    mesh.faces = faces;
    mesh.uvs = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_edge_triangles() -> Vec<[Point3f; 3]> {
        // two triangles of a unit square in the ground plane, sharing the
        // diagonal (0,0,0)-(1,0,1)
        vec![
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 1.0),
            ],
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 1.0),
                Point3f::new(0.0, 0.0, 1.0),
            ],
        ]
    }

    #[test]
    fn test_shared_vertices_are_merged() {
        let mesh = mesh_from_triangles(&shared_edge_triangles());
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_face_indices_in_bounds() {
        let mesh = mesh_from_triangles(&shared_edge_triangles());
        for face in &mesh.faces {
            for &index in face {
                assert!(index < mesh.vertices.len());
            }
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut mesh = mesh_from_triangles(&shared_edge_triangles());
        let before = mesh.clone();
        merge_vertices(&mut mesh, DEFAULT_MERGE_TOLERANCE);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_input() {
        let mesh = mesh_from_triangles(&[]);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_near_coincident_vertices_merge() {
        let eps = DEFAULT_MERGE_TOLERANCE * 0.1;
        let triangles = vec![
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 0.0, 1.0),
            ],
            [
                Point3f::new(eps, 0.0, eps),
                Point3f::new(0.0, 0.0, 1.0 + eps),
                Point3f::new(-1.0, 0.0, 1.0),
            ],
        ];
        let mesh = mesh_from_triangles(&triangles);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_fully_collapsed_face_is_dropped() {
        let p = Point3f::new(0.5, 0.0, 0.5);
        let triangles = vec![[p, p, p]];
        let mesh = mesh_from_triangles(&triangles);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_order_independent_topology() {
        let mut reversed = shared_edge_triangles();
        reversed.reverse();
        let a = mesh_from_triangles(&shared_edge_triangles());
        let b = mesh_from_triangles(&reversed);
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.face_count(), b.face_count());
    }
}
