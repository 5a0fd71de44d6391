//! Axis-aligned bounding boxes

use crate::point::{Point3f, Vector3f};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Compute the bounding box of a set of points, `None` if empty
    pub fn from_points(points: &[Point3f]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;

        for point in &points[1..] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        Some(Self { min, max })
    }

    /// Size of the box along each axis
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = vec![
            Point3f::new(140.0, 0.0, 10.0),
            Point3f::new(154.0, 0.0, 0.0),
            Point3f::new(150.0, 0.0, 40.0),
        ];
        let bounds = Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, Point3f::new(140.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3f::new(154.0, 0.0, 40.0));
        assert_eq!(bounds.extent(), Vector3f::new(14.0, 0.0, 40.0));
    }

    #[test]
    fn test_empty_points() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_single_point() {
        let bounds = Aabb::from_points(&[Point3f::new(1.0, 2.0, 3.0)]).unwrap();
        assert_eq!(bounds.min, bounds.max);
        assert_eq!(bounds.extent(), Vector3f::zeros());
    }
}
