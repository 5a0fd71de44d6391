//! Constrained Delaunay triangulation of polygon contours

use polyview_core::{Error, Point2f, Result};
use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Triangulate a simple closed polygon, optionally with hole contours.
///
/// The contour is implicitly closed: the last point connects back to the
/// first. Output triangles exactly cover the interior (outside every
/// hole); for a simple N-gon without holes the triangle count is N-2.
///
/// Fewer than 3 contour points, non-finite coordinates, or rings whose
/// edges intersect are rejected with `Error::InvalidContour`.
pub fn triangulate_contour(
    contour: &[Point2f],
    holes: &[Vec<Point2f>],
) -> Result<Vec<[Point2f; 3]>> {
    if contour.len() < 3 {
        return Err(Error::InvalidContour(format!(
            "need at least 3 contour points, got {}",
            contour.len()
        )));
    }
    for point in contour.iter().chain(holes.iter().flatten()) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(Error::InvalidContour(
                "contour contains a non-finite coordinate".to_string(),
            ));
        }
    }

    let mut cdt = Cdt::new();
    constrain_ring(&mut cdt, contour)?;
    for hole in holes {
        constrain_ring(&mut cdt, hole)?;
    }

    // The triangulation covers the convex hull of all vertices; keep the
    // faces whose centroid is inside the polygon (even-odd over all rings).
    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let positions = face.vertices().map(|v| v.position());
        let cx = (positions[0].x + positions[1].x + positions[2].x) / 3.0;
        let cy = (positions[0].y + positions[1].y + positions[2].y) / 3.0;

        let inside = point_in_ring(cx, cy, contour)
            && !holes.iter().any(|hole| point_in_ring(cx, cy, hole));
        if inside {
            triangles.push([
                Point2f::new(positions[0].x as f32, positions[0].y as f32),
                Point2f::new(positions[1].x as f32, positions[1].y as f32),
                Point2f::new(positions[2].x as f32, positions[2].y as f32),
            ]);
        }
    }

    tracing::debug!(
        contour_points = contour.len(),
        holes = holes.len(),
        triangles = triangles.len(),
        "triangulated contour"
    );
    Ok(triangles)
}

/// Insert a ring's vertices and constrain its boundary edges.
fn constrain_ring(cdt: &mut Cdt, ring: &[Point2f]) -> Result<()> {
    let mut handles: Vec<FixedVertexHandle> = Vec::with_capacity(ring.len());
    for point in ring {
        let handle = cdt
            .insert(Point2::new(point.x as f64, point.y as f64))
            .map_err(|e| Error::Triangulation(format!("failed to insert point: {e:?}")))?;
        handles.push(handle);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        // coincident consecutive points collapse to the same vertex
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(Error::InvalidContour(
                "contour edges intersect each other".to_string(),
            ));
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Even-odd point-in-ring test.
fn point_in_ring(x: f64, y: f64, ring: &[Point2f]) -> bool {
    if ring.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].x as f64, ring[i].y as f64);
        let (xj, yj) = (ring[j].x as f64, ring[j].y as f64);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Signed area of a closed ring (shoelace formula), positive for
/// counter-clockwise winding.
pub fn ring_area(ring: &[Point2f]) -> f64 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        let (xi, yi) = (ring[i].x as f64, ring[i].y as f64);
        let (xj, yj) = (ring[j].x as f64, ring[j].y as f64);
        area += xi * yj - xj * yi;
    }
    area / 2.0
}

/// Unsigned area of a 2D triangle.
pub fn triangle_area(tri: &[Point2f; 3]) -> f64 {
    let (ax, ay) = (tri[0].x as f64, tri[0].y as f64);
    let (bx, by) = (tri[1].x as f64, tri[1].y as f64);
    let (cx, cy) = (tri[2].x as f64, tri[2].y as f64);
    ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn total_area(triangles: &[[Point2f; 3]]) -> f64 {
        triangles.iter().map(triangle_area).sum()
    }

    #[test]
    fn test_single_triangle() {
        let contour = vec![
            Point2f::new(154.0, 0.0),
            Point2f::new(140.0, 10.0),
            Point2f::new(150.0, 40.0),
        ];
        let triangles = triangulate_contour(&contour, &[]).unwrap();
        assert_eq!(triangles.len(), 1);
        assert_relative_eq!(
            total_area(&triangles),
            ring_area(&contour).abs(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_convex_square() {
        let contour = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(10.0, 0.0),
            Point2f::new(10.0, 10.0),
            Point2f::new(0.0, 10.0),
        ];
        let triangles = triangulate_contour(&contour, &[]).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_relative_eq!(total_area(&triangles), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_concave_polygon() {
        // L-shape: 6 vertices, area 3 * 1 unit squares
        let contour = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(2.0, 0.0),
            Point2f::new(2.0, 1.0),
            Point2f::new(1.0, 1.0),
            Point2f::new(1.0, 2.0),
            Point2f::new(0.0, 2.0),
        ];
        let triangles = triangulate_contour(&contour, &[]).unwrap();
        assert_eq!(triangles.len(), contour.len() - 2);
        assert_relative_eq!(total_area(&triangles), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_too_few_points() {
        let contour = vec![Point2f::new(0.0, 0.0), Point2f::new(1.0, 0.0)];
        let result = triangulate_contour(&contour, &[]);
        assert!(matches!(result, Err(Error::InvalidContour(_))));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let contour = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, f32::NAN),
            Point2f::new(0.0, 1.0),
        ];
        let result = triangulate_contour(&contour, &[]);
        assert!(matches!(result, Err(Error::InvalidContour(_))));
    }

    #[test]
    fn test_self_intersecting_contour() {
        // bowtie: the last edge crosses the first
        let contour = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 1.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(0.0, 1.0),
        ];
        let result = triangulate_contour(&contour, &[]);
        assert!(matches!(result, Err(Error::InvalidContour(_))));
    }

    #[test]
    fn test_square_with_hole() {
        let contour = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(10.0, 0.0),
            Point2f::new(10.0, 10.0),
            Point2f::new(0.0, 10.0),
        ];
        let hole = vec![
            Point2f::new(4.0, 4.0),
            Point2f::new(6.0, 4.0),
            Point2f::new(6.0, 6.0),
            Point2f::new(4.0, 6.0),
        ];
        let triangles = triangulate_contour(&contour, &[hole.clone()]).unwrap();
        assert!(!triangles.is_empty());
        assert_relative_eq!(total_area(&triangles), 100.0 - 4.0, epsilon = 1e-6);

        // no triangle centroid falls inside the hole
        for tri in &triangles {
            let cx = f64::from(tri[0].x + tri[1].x + tri[2].x) / 3.0;
            let cy = f64::from(tri[0].y + tri[1].y + tri[2].y) / 3.0;
            assert!(!point_in_ring(cx, cy, &hole));
        }
    }

    #[test]
    fn test_ring_area_winding() {
        let ccw = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(1.0, 1.0),
            Point2f::new(0.0, 1.0),
        ];
        assert_relative_eq!(ring_area(&ccw).abs(), 1.0, epsilon = 1e-9);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(ring_area(&cw).abs(), 1.0, epsilon = 1e-9);
    }
}
