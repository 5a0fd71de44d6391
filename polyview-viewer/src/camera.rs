//! Camera utilities for 3D visualization

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

// keep the orbit off the poles so the up vector stays valid
const MAX_PITCH: f32 = 1.55;

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    home_position: Point3<f32>,
    home_target: Point3<f32>,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            min_distance: near * 5.0,
            max_distance: far * 0.9,
            home_position: position,
            home_target: target,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Distance from the camera to its target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Rotate the camera around the target, keeping the distance fixed.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius == 0.0 {
            return;
        }

        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        yaw += delta_yaw;
        pitch = (pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);

        self.position = self.target
            + Vector3::new(
                radius * pitch.cos() * yaw.cos(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.sin(),
            );
    }

    /// Shift the camera and its target in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let screen_up = right.cross(&forward);

        let shift = right * dx + screen_up * dy;
        self.position += shift;
        self.target += shift;
    }

    /// Dolly toward (positive) or away from (negative) the target.
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius == 0.0 {
            return;
        }
        let distance = (radius * (1.0 - amount)).clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset / radius * distance;
    }

    /// Update the aspect ratio from viewport dimensions.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Return to the construction-time position and target.
    pub fn reset(&mut self) {
        self.position = self.home_position;
        self.target = self.home_target;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(150.0, 150.0, 150.0),
            Point3::origin(),
            Vector3::y(),
            60.0_f32.to_radians(),
            1.0,
            1.0,
            2000.0,
        )
    }
}
