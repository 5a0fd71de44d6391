//! Point types and ground-plane lifting

use nalgebra::{Point2, Point3, Vector3};

/// A 2D point with floating point coordinates
pub type Point2f = Point2<f32>;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Lift a ground-plane point into 3D at zero elevation.
///
/// The ground plane is XZ: the contour's first coordinate stays X, its
/// second becomes world depth Z, and elevation Y is zero.
pub fn lift_to_ground(point: &Point2f) -> Point3f {
    Point3f::new(point.x, 0.0, point.y)
}
