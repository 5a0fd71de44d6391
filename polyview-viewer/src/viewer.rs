//! Interactive viewer: render loop and mount/unmount lifecycle

use std::sync::Arc;

use polyview_core::{Error, Point2f, Result};
use polyview_gpu::{RenderConfig, SceneRenderer, TextureLoader};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::scene::SceneData;

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Remote image applied to the mesh once it resolves
    pub texture_url: Option<String>,
    pub point_color: [f32; 3],
    pub point_size: f32,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "polyview".to_string(),
            width: 1200.0,
            height: 800.0,
            texture_url: None,
            point_color: [1.0, 1.0, 0.0],
            point_size: 2.0,
            render: RenderConfig::default(),
        }
    }
}

/// The viewer's lifecycle states.
///
/// `Mounted` schedules a redraw after every completed frame; `Unmounted`
/// draws nothing further and has released its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Mounted,
    Unmounted,
}

/// Viewer state that owns no window or GPU resources, so lifecycle and
/// resize behavior stay testable without a display.
pub struct ViewerState {
    pub camera: Camera,
    pub controls: OrbitControls,
    lifecycle: Lifecycle,
    viewport: PhysicalSize<u32>,
}

impl ViewerState {
    pub fn new(camera: Camera, viewport: PhysicalSize<u32>) -> Self {
        Self {
            camera,
            controls: OrbitControls::new(),
            lifecycle: Lifecycle::Mounted,
            viewport,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The frame loop's liveness gate: only a mounted viewer draws and
    /// reschedules.
    pub fn should_redraw(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn viewport(&self) -> PhysicalSize<u32> {
        self.viewport
    }

    /// Apply a viewport change to the camera; returns true if the
    /// surface must be reconfigured. Zero-sized dimensions and
    /// post-unmount calls are ignored.
    pub fn handle_resize(&mut self, size: PhysicalSize<u32>) -> bool {
        if self.lifecycle == Lifecycle::Unmounted || size.width == 0 || size.height == 0 {
            return false;
        }
        self.viewport = size;
        self.camera.set_aspect(size.width as f32, size.height as f32);
        true
    }

    /// Route an input event to the orbit controls.
    pub fn handle_input(&mut self, event: &WindowEvent) -> bool {
        self.controls.handle_event(event, &mut self.camera)
    }

    /// Mounted -> Unmounted; idempotent. Disables the resize handler and
    /// detaches the controls.
    pub fn unmount(&mut self) {
        self.lifecycle = Lifecycle::Unmounted;
        self.controls.dispose();
    }
}

/// Interactive viewer for a ground-plane contour.
///
/// Owns the window, renderer, camera and controls for one mount/unmount
/// cycle; [`run`](Self::run) blocks until the window closes.
pub struct ContourViewer {
    contour: Vec<Point2f>,
    config: ViewerConfig,
}

impl ContourViewer {
    pub fn new(contour: Vec<Point2f>, config: ViewerConfig) -> Self {
        Self { contour, config }
    }

    pub fn run(self) -> Result<()> {
        let scene = SceneData::from_contour(
            &self.contour,
            self.config.point_color,
            self.config.point_size,
        )?;

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Window(format!("failed to create event loop: {e}")))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                ))
                .build(&event_loop)
                .map_err(|e| Error::Window(format!("failed to create window: {e}")))?,
        );

        let mut scene_renderer = pollster::block_on(SceneRenderer::new(
            window.clone(),
            self.config.render.clone(),
        ))?;
        scene_renderer.set_grid(&scene.grid);
        scene_renderer.set_points(&scene.points);
        scene_renderer.set_mesh(&scene.mesh_vertices);
        let mut renderer = Some(scene_renderer);

        let mut state = ViewerState::new(Camera::default(), window.inner_size());
        state.handle_resize(window.inner_size());

        let mut texture_load = self.config.texture_url.as_deref().map(TextureLoader::fetch);

        // seed the self-perpetuating frame loop
        window.request_redraw();

        let loop_window = window.clone();
        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => {
                        // teardown order: resize handler off and controls
                        // detached, in-flight texture fetch cancelled,
                        // then GPU resources released
                        state.unmount();
                        texture_load = None;
                        renderer = None;
                        tracing::debug!("viewer unmounted");
                        target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if state.handle_resize(new_size) {
                            if let Some(r) = renderer.as_mut() {
                                r.resize(new_size);
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if !state.should_redraw() {
                            return;
                        }

                        // apply the remote texture the frame it resolves
                        if let Some(loader) = &texture_load {
                            if let Some(result) = loader.try_take() {
                                match result {
                                    Ok(image) => {
                                        if let Some(r) = renderer.as_mut() {
                                            r.set_mesh_texture(&image);
                                        }
                                    }
                                    Err(e) => tracing::warn!("texture load failed: {e}"),
                                }
                                texture_load = None;
                            }
                        }

                        if let Some(r) = renderer.as_mut() {
                            r.update_camera(
                                state.camera.view_matrix(),
                                state.camera.projection_matrix(),
                                state.camera.position.coords,
                            );
                            if let Err(e) = r.render() {
                                tracing::error!("render error: {e}");
                            }
                        }
                        loop_window.request_redraw();
                    }
                    other => {
                        state.handle_input(&other);
                    }
                }
            })
            .map_err(|e| Error::Window(format!("event loop error: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mounted_state() -> ViewerState {
        ViewerState::new(Camera::default(), PhysicalSize::new(1200, 800))
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut once = mounted_state();
        once.handle_resize(PhysicalSize::new(1920, 1080));

        let mut twice = mounted_state();
        twice.handle_resize(PhysicalSize::new(1920, 1080));
        twice.handle_resize(PhysicalSize::new(1920, 1080));

        assert_relative_eq!(once.camera.aspect_ratio, twice.camera.aspect_ratio);
        assert_eq!(once.viewport(), twice.viewport());
    }

    #[test]
    fn test_resize_ignores_zero_dimensions() {
        let mut state = mounted_state();
        let aspect = state.camera.aspect_ratio;
        assert!(!state.handle_resize(PhysicalSize::new(0, 500)));
        assert!(!state.handle_resize(PhysicalSize::new(500, 0)));
        assert_relative_eq!(state.camera.aspect_ratio, aspect);
        assert_eq!(state.viewport(), PhysicalSize::new(1200, 800));
    }

    #[test]
    fn test_unmount_closes_redraw_gate() {
        let mut state = mounted_state();
        assert_eq!(state.lifecycle(), Lifecycle::Mounted);
        assert!(state.should_redraw());

        state.unmount();
        assert_eq!(state.lifecycle(), Lifecycle::Unmounted);
        assert!(!state.should_redraw());

        // the gated frame loop stops scheduling once unmounted
        let mut frames = 0;
        for _ in 0..5 {
            if state.should_redraw() {
                frames += 1;
            }
        }
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_unmount_disables_resize_handler() {
        let mut state = mounted_state();
        state.unmount();
        let aspect = state.camera.aspect_ratio;
        assert!(!state.handle_resize(PhysicalSize::new(640, 480)));
        assert_relative_eq!(state.camera.aspect_ratio, aspect);
    }

    #[test]
    fn test_unmount_detaches_controls() {
        let mut state = mounted_state();
        assert!(state.controls.is_enabled());
        state.unmount();
        assert!(!state.controls.is_enabled());
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut state = mounted_state();
        state.unmount();
        state.unmount();
        assert_eq!(state.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn test_mounted_resize_updates_aspect() {
        let mut state = mounted_state();
        assert!(state.handle_resize(PhysicalSize::new(1000, 500)));
        assert_relative_eq!(state.camera.aspect_ratio, 2.0);
        assert_eq!(state.viewport(), PhysicalSize::new(1000, 500));
    }
}
