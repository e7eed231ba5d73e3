//! Windowed viewer: winit event loop driving the cloud and the GPU backend.
//!
//! Per redraw: the clock advances the tween, the cloud evaluates the frame
//! with the latest pointer sample, and the GPU draws it.
//!
//! Controls:
//! - drag with the left button to orbit, scroll to zoom
//! - `Space` restarts the intro tween
//! - `Up` / `Down` raise or lower the noise frequency
//! - `R` toggles scrubbing; while scrubbing `Left` / `Right` move progress
//! - `P` pauses the clock

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use crate::camera::Camera;
use crate::cloud::{run_frame, PointCloud, Rasterizer};
use crate::config::CloudConfig;
use crate::driver::{Easing, FixedProgress, TransitionDriver, Tween};
use crate::error::ViewerError;
use crate::gpu::GpuState;
use crate::input::Input;
use crate::source::ImageTexture;
use crate::time::Time;

/// Frequency change per key press.
const FREQUENCY_STEP: f32 = 0.05;
/// Progress change per frame while scrubbing with the arrow keys.
const SCRUB_STEP: f32 = 0.005;

/// Window and animation settings for [`run`].
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Image to assemble. `None` uses a procedural gradient.
    pub image: Option<PathBuf>,
    pub tween_duration: f32,
    pub easing: Easing,
    pub cloud: CloudConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "dust-image".to_string(),
            width: 1280,
            height: 720,
            image: None,
            tween_duration: 2.5,
            easing: Easing::Power4Out,
            cloud: CloudConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cloud(mut self, cloud: CloudConfig) -> Self {
        self.cloud = cloud;
        self
    }
}

/// Build the cloud and colors, then run the event loop until the window closes.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let texture = match &config.image {
        Some(path) => ImageTexture::from_file(path)?,
        None => {
            log::info!("No image given, using procedural gradient");
            ImageTexture::gradient(256, 256, [40, 90, 220, 255], [250, 200, 80, 255])
        }
    };

    let cloud = PointCloud::new(config.cloud.clone())?;
    let colors = cloud.sample_colors(&texture);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(config, cloud, colors);
    event_loop.run_app(&mut viewer)?;

    match viewer.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct Viewer {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    cloud: PointCloud,
    colors: Vec<glam::Vec4>,
    camera: Camera,
    input: Input,
    time: Time,
    tween: Tween,
    scrub: Option<FixedProgress>,
    error: Option<ViewerError>,
}

impl Viewer {
    fn new(config: ViewerConfig, cloud: PointCloud, colors: Vec<glam::Vec4>) -> Self {
        let tween = Tween::new(0.0, 1.0, config.tween_duration, config.easing);
        let input = Input::new(config.width, config.height);
        Self {
            config,
            window: None,
            gpu: None,
            cloud,
            colors,
            camera: Camera::new(),
            input,
            time: Time::new(),
            tween,
            scrub: None,
            error: None,
        }
    }

    fn handle_keys(&mut self) {
        if self.input.key_pressed(KeyCode::Space) {
            self.tween.restart();
            self.scrub = None;
            log::info!("Restarting transition");
        }

        if self.input.key_pressed(KeyCode::KeyP) {
            self.time.toggle_pause();
        }

        if self.input.key_pressed(KeyCode::KeyR) {
            self.scrub = match self.scrub {
                Some(_) => {
                    log::info!("Scrubbing off");
                    None
                }
                None => {
                    let held = FixedProgress(self.tween.current_progress());
                    log::info!("Scrubbing at progress {:.3}", held.0);
                    Some(held)
                }
            };
        }

        if let Some(scrub) = &mut self.scrub {
            if self.input.key_held(KeyCode::ArrowRight) {
                scrub.nudge(SCRUB_STEP);
            }
            if self.input.key_held(KeyCode::ArrowLeft) {
                scrub.nudge(-SCRUB_STEP);
            }
        }

        let mut frequency = self.cloud.frequency();
        if self.input.key_pressed(KeyCode::ArrowUp) {
            frequency += FREQUENCY_STEP;
        }
        if self.input.key_pressed(KeyCode::ArrowDown) {
            frequency = (frequency - FREQUENCY_STEP).max(0.0);
        }
        if frequency != self.cloud.frequency() {
            match self.cloud.set_frequency(frequency) {
                Ok(()) => log::info!("Frequency -> {:.2}", frequency),
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    /// Clock, keys and camera for one redraw. Consumes this frame's input
    /// edges whether or not anything gets drawn.
    fn update_controls(&mut self) {
        let dt = self.time.update();
        self.tween.advance(dt);
        self.handle_keys();

        self.camera.orbit(self.input.drag_delta());
        if self.input.scroll_delta() != 0.0 {
            self.camera.zoom(self.input.scroll_delta());
        }

        self.input.begin_frame();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.update_controls();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let view_proj = self.camera.view_proj(gpu.aspect());
        self.cloud.set_view_projection(view_proj);
        gpu.set_view_proj(view_proj);

        let driver: &dyn TransitionDriver = match &self.scrub {
            Some(fixed) => fixed,
            None => &self.tween,
        };

        match run_frame(&mut self.cloud, driver, &self.input, gpu) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            if self.time.frame() % 60 == 0 {
                window.set_title(&format!(
                    "{} - {:.0} fps - progress {:.2}",
                    self.config.title,
                    self.time.fps(),
                    self.cloud.state().progress
                ));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let point_count = self.cloud.len() as u32;
        match pollster::block_on(GpuState::new(window.clone(), point_count)) {
            Ok(mut gpu) => {
                gpu.upload_colors(&self.colors);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        }

        self.time = Time::new();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { .. } if self.input.key_pressed(KeyCode::Escape) => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn headless() -> Viewer {
        let config = ViewerConfig::default().with_cloud(CloudConfig::new().with_grid(4, 4));
        let cloud = PointCloud::new(config.cloud.clone()).unwrap();
        Viewer::new(config, cloud, Vec::new())
    }

    fn press(viewer: &mut Viewer, key: KeyCode) {
        viewer.input.key_event(key, ElementState::Pressed);
        viewer.input.key_event(key, ElementState::Released);
    }

    #[test]
    fn test_key_press_acts_once_without_gpu() {
        let mut viewer = headless();
        assert!(viewer.gpu.is_none());

        press(&mut viewer, KeyCode::KeyP);
        viewer.update_controls();
        assert!(viewer.time.is_paused());
        assert!(!viewer.input.key_pressed(KeyCode::KeyP));

        // Later frames must not see the same press again
        viewer.update_controls();
        viewer.update_controls();
        assert!(viewer.time.is_paused());
    }

    #[test]
    fn test_frequency_steps_once_per_press() {
        let mut viewer = headless();
        let before = viewer.cloud.frequency();

        press(&mut viewer, KeyCode::ArrowUp);
        for _ in 0..5 {
            viewer.update_controls();
        }
        assert!((viewer.cloud.frequency() - (before + FREQUENCY_STEP)).abs() < 1e-6);
    }

    #[test]
    fn test_scrub_toggles_once_while_key_held() {
        let mut viewer = headless();
        viewer.input.key_event(KeyCode::KeyR, ElementState::Pressed);
        viewer.update_controls();
        assert!(viewer.scrub.is_some());

        viewer.update_controls();
        assert!(viewer.scrub.is_some());
        assert!(viewer.input.key_held(KeyCode::KeyR));
    }
}
