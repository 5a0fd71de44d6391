//! Scene assembly: grid, contour point cloud and textured ground mesh

use polyview_core::{lift_to_ground, Point2f, Point3f, PointCloud, Result, TriangleMesh};
use polyview_geometry::ground_mesh_from_contour;
use polyview_gpu::{grid_vertices, mesh_to_vertices, point_cloud_to_quads, FlatVertex, MeshVertex};

pub const GRID_SIZE: f32 = 1000.0;
pub const GRID_DIVISIONS: u32 = 10;
const GRID_COLOR: [f32; 3] = [0.53, 0.53, 0.53];
const GRID_CENTER_COLOR: [f32; 3] = [0.27, 0.27, 0.27];

/// CPU-side scene contents, ready for upload to the renderer.
pub struct SceneData {
    pub grid: Vec<FlatVertex>,
    pub points: Vec<FlatVertex>,
    pub mesh_vertices: Vec<MeshVertex>,
    pub mesh: TriangleMesh,
}

impl SceneData {
    /// Assemble the scene for a contour: reference grid, the contour
    /// points lifted into the ground plane, and the triangulated,
    /// UV-mapped interior mesh.
    pub fn from_contour(
        contour: &[Point2f],
        point_color: [f32; 3],
        point_size: f32,
    ) -> Result<Self> {
        let cloud: PointCloud<Point3f> = contour.iter().map(lift_to_ground).collect();
        let mesh = ground_mesh_from_contour(contour, &[])?;

        tracing::info!(
            points = cloud.len(),
            mesh_vertices = mesh.vertex_count(),
            mesh_faces = mesh.face_count(),
            "assembled contour scene"
        );

        Ok(Self {
            grid: grid_vertices(GRID_SIZE, GRID_DIVISIONS, GRID_COLOR, GRID_CENTER_COLOR),
            points: point_cloud_to_quads(&cloud, point_color, point_size),
            mesh_vertices: mesh_to_vertices(&mesh),
            mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyview_core::Error;

    fn demo_contour() -> Vec<Point2f> {
        vec![
            Point2f::new(154.0, 0.0),
            Point2f::new(140.0, 10.0),
            Point2f::new(150.0, 40.0),
        ]
    }

    #[test]
    fn test_scene_from_demo_contour() {
        let scene = SceneData::from_contour(&demo_contour(), [1.0, 1.0, 0.0], 2.0).unwrap();

        // 11 grid lines per direction, 2 vertices each
        assert_eq!(scene.grid.len(), 44);
        // one quad (6 vertices) per contour point
        assert_eq!(scene.points.len(), 18);
        // a triangle contour triangulates to a single face
        assert_eq!(scene.mesh.face_count(), 1);
        assert_eq!(scene.mesh_vertices.len(), 3);
        assert!(scene.mesh.uvs.is_some());
    }

    #[test]
    fn test_point_quads_carry_color() {
        let scene = SceneData::from_contour(&demo_contour(), [1.0, 1.0, 0.0], 2.0).unwrap();
        assert!(scene.points.iter().all(|v| v.color == [1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_invalid_contour_propagates() {
        let result = SceneData::from_contour(&[Point2f::new(0.0, 0.0)], [1.0, 1.0, 0.0], 2.0);
        assert!(matches!(result, Err(Error::InvalidContour(_))));
    }
}
