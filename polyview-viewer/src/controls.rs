//! Orbit/pan/zoom pointer bindings

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::Key;

use crate::camera::Camera;

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.1;
// pan in world units proportional to the view distance
const PAN_SENSITIVITY: f32 = 0.001;

/// Maps pointer input onto camera orbit/pan/zoom.
///
/// Left-drag orbits, right-drag pans, the wheel zooms and `R` resets.
/// A disposed binding ignores all further input.
pub struct OrbitControls {
    enabled: bool,
    left_pressed: bool,
    right_pressed: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enabled: true,
            left_pressed: false,
            right_pressed: false,
            last_cursor: None,
        }
    }

    /// Feed a window event; returns true if it drove the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y, camera)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 100.0,
                };
                self.on_scroll(scroll, camera)
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Key::Character(c) = &event.logical_key {
                        return self.on_key(c.as_str(), camera);
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) -> bool {
        if !self.enabled {
            return false;
        }
        match button {
            MouseButton::Left => {
                self.left_pressed = pressed;
                true
            }
            MouseButton::Right => {
                self.right_pressed = pressed;
                true
            }
            _ => false,
        }
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        let mut consumed = false;
        if let Some(last) = self.last_cursor {
            let dx = (x - last.x) as f32;
            let dy = (y - last.y) as f32;

            if self.left_pressed {
                camera.orbit(dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY);
                consumed = true;
            } else if self.right_pressed {
                let scale = camera.distance() * PAN_SENSITIVITY;
                camera.pan(-dx * scale, dy * scale);
                consumed = true;
            }
        }
        self.last_cursor = Some(PhysicalPosition::new(x, y));
        consumed
    }

    fn on_scroll(&mut self, scroll: f32, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        camera.zoom(scroll * ZOOM_SENSITIVITY);
        true
    }

    fn on_key(&mut self, key: &str, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        match key {
            "r" | "R" => {
                camera.reset();
                true
            }
            _ => false,
        }
    }

    /// Detach from input; subsequent events are ignored.
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.left_pressed = false;
        self.right_pressed = false;
        self.last_cursor = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
