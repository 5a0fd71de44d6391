//! GPU vertex types and CPU-side geometry conversion

use bytemuck::{Pod, Zeroable};
use polyview_core::{Point3f, PointCloud, TriangleMesh};

/// Vertex for unlit colored geometry (grid lines, point quads)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FlatVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl FlatVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FlatVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Vertex for the textured mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Expand an indexed mesh into per-face-corner vertices.
///
/// UVs are stored per face corner, so corners are not shared between
/// faces on the GPU side; each carries its face's flat normal.
pub fn mesh_to_vertices(mesh: &TriangleMesh) -> Vec<MeshVertex> {
    let normals = mesh.calculate_face_normals();
    let mut vertices = Vec::with_capacity(mesh.faces.len() * 3);

    for (face_index, face) in mesh.faces.iter().enumerate() {
        let normal = normals
            .get(face_index)
            .map(|n| [n.x, n.y, n.z])
            .unwrap_or([0.0, 1.0, 0.0]);
        for (corner, &vertex_index) in face.iter().enumerate() {
            let position = mesh.vertices[vertex_index];
            let uv = mesh
                .uvs
                .as_ref()
                .map(|uvs| uvs[face_index][corner])
                .unwrap_or([0.0, 0.0]);
            vertices.push(MeshVertex {
                position: [position.x, position.y, position.z],
                normal,
                uv,
            });
        }
    }
    vertices
}

/// Expand a point cloud into fixed-size ground-plane quads.
///
/// Two triangles per point, `size` world units across, centered on the
/// point.
pub fn point_cloud_to_quads(
    cloud: &PointCloud<Point3f>,
    color: [f32; 3],
    size: f32,
) -> Vec<FlatVertex> {
    let half = size / 2.0;
    let mut vertices = Vec::with_capacity(cloud.len() * 6);

    for point in cloud.iter() {
        let corners = [
            [point.x - half, point.y, point.z - half],
            [point.x + half, point.y, point.z - half],
            [point.x + half, point.y, point.z + half],
            [point.x - half, point.y, point.z + half],
        ];
        for &index in &[0usize, 1, 2, 0, 2, 3] {
            vertices.push(FlatVertex {
                position: corners[index],
                color,
            });
        }
    }
    vertices
}

/// Line-list vertices for a square reference grid in the ground plane.
///
/// `size` is the total side length, split into `divisions` cells; the
/// two center lines use `center_color`.
pub fn grid_vertices(
    size: f32,
    divisions: u32,
    color: [f32; 3],
    center_color: [f32; 3],
) -> Vec<FlatVertex> {
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut vertices = Vec::with_capacity(((divisions + 1) * 4) as usize);

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let line_color = if offset.abs() < step * 1e-3 {
            center_color
        } else {
            color
        };
        // line parallel to X
        vertices.push(FlatVertex {
            position: [-half, 0.0, offset],
            color: line_color,
        });
        vertices.push(FlatVertex {
            position: [half, 0.0, offset],
            color: line_color,
        });
        // line parallel to Z
        vertices.push(FlatVertex {
            position: [offset, 0.0, -half],
            color: line_color,
        });
        vertices.push(FlatVertex {
            position: [offset, 0.0, half],
            color: line_color,
        });
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_expansion_counts() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 1.0),
                Point3f::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        mesh.uvs = Some(vec![
            [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
            [[0.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        ]);

        let vertices = mesh_to_vertices(&mesh);
        assert_eq!(vertices.len(), mesh.face_count() * 3);
        // per-corner UVs survive expansion
        assert_eq!(vertices[2].uv, [1.0, 0.0]);
        assert_eq!(vertices[5].uv, [0.0, 0.0]);
        // flat ground mesh: normals point along Y
        for vertex in &vertices {
            assert_relative_eq!(vertex.normal[1].abs(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_mesh_without_uvs_defaults_to_origin() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );
        let vertices = mesh_to_vertices(&mesh);
        assert!(vertices.iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn test_point_quads() {
        let cloud = PointCloud::from_points(vec![Point3f::new(10.0, 0.0, 20.0)]);
        let vertices = point_cloud_to_quads(&cloud, [1.0, 1.0, 0.0], 2.0);
        assert_eq!(vertices.len(), 6);
        for vertex in &vertices {
            assert_eq!(vertex.color, [1.0, 1.0, 0.0]);
            assert_eq!(vertex.position[1], 0.0);
            assert!((vertex.position[0] - 10.0).abs() <= 1.0);
            assert!((vertex.position[2] - 20.0).abs() <= 1.0);
        }
    }

    #[test]
    fn test_grid_vertex_count() {
        let vertices = grid_vertices(1000.0, 10, [0.5; 3], [0.3; 3]);
        // 11 lines per direction, 2 vertices each
        assert_eq!(vertices.len(), 44);
        // center lines picked up the center color
        assert!(vertices.iter().any(|v| v.color == [0.3; 3]));
        for vertex in &vertices {
            assert!(vertex.position[0].abs() <= 500.0);
            assert!(vertex.position[2].abs() <= 500.0);
        }
    }
}
