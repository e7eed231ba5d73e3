//! Pointer and keyboard tracking for the viewer.
//!
//! [`Input`] folds raw winit window events into per-frame state: the latest
//! pointer sample in pixels and NDC, drag and scroll deltas, and which keys
//! went down this frame. The cloud only ever sees the pointer through
//! [`PointerSource`], so tests can feed NDC directly.
//!
//! ```ignore
//! input.handle_event(&event);
//! // once per frame, after rendering:
//! cloud.advance(progress, input.pointer_ndc());
//! input.begin_frame();
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Latest pointer sample in normalized device coordinates.
pub trait PointerSource {
    /// `None` when no pointer is over the canvas.
    fn pointer_ndc(&self) -> Option<Vec2>;
}

impl PointerSource for Option<Vec2> {
    fn pointer_ndc(&self) -> Option<Vec2> {
        *self
    }
}

impl PointerSource for Vec2 {
    fn pointer_ndc(&self) -> Option<Vec2> {
        Some(*self)
    }
}

/// Convert a pixel position to NDC. Y grows upward in NDC.
///
/// Returns `None` for a zero-sized viewport.
pub fn pixel_to_ndc(pixel: Vec2, viewport: (u32, u32)) -> Option<Vec2> {
    let (w, h) = viewport;
    if w == 0 || h == 0 {
        return None;
    }
    Some(Vec2::new(
        (pixel.x / w as f32) * 2.0 - 1.0,
        1.0 - (pixel.y / h as f32) * 2.0,
    ))
}

/// Keyboard and pointer state for one window.
#[derive(Debug)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    buttons_held: HashSet<MouseButton>,

    cursor: Option<Vec2>,
    drag_delta: Vec2,
    scroll_delta: f32,

    window_size: (u32, u32),
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            buttons_held: HashSet::new(),
            cursor: None,
            drag_delta: Vec2::ZERO,
            scroll_delta: 0.0,
            window_size: (width, height),
        }
    }

    /// Key went down this frame (repeats excluded).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn button_held(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    /// Cursor position in window pixels, `None` once it leaves the window.
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Cursor movement this frame while the left button is held.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Scroll this frame in lines. Positive is away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Clear per-frame state. Held keys and the cursor persist.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Fold a winit window event into the state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.key_event(key, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.buttons_held.insert(*button);
                }
                ElementState::Released => {
                    self.buttons_held.remove(button);
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.buttons_held.clear();
            }
            _ => {}
        }
    }

    pub(crate) fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    pub(crate) fn cursor_moved(&mut self, pixel: Vec2) {
        if let Some(last) = self.cursor {
            if self.buttons_held.contains(&MouseButton::Left) {
                self.drag_delta += pixel - last;
            }
        }
        self.cursor = Some(pixel);
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl PointerSource for Input {
    fn pointer_ndc(&self) -> Option<Vec2> {
        self.cursor
            .and_then(|pixel| pixel_to_ndc(pixel, self.window_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc() {
        let center = pixel_to_ndc(Vec2::new(400.0, 300.0), (800, 600)).unwrap();
        assert!(center.length() < 1e-6);

        let top_left = pixel_to_ndc(Vec2::ZERO, (800, 600)).unwrap();
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        assert!(pixel_to_ndc(Vec2::ZERO, (0, 600)).is_none());
    }

    #[test]
    fn test_pointer_cleared_on_leave() {
        let mut input = Input::new(800, 600);
        assert!(input.pointer_ndc().is_none());

        input.cursor_moved(Vec2::new(10.0, 10.0));
        let ndc = input.pointer_ndc().unwrap();
        assert!((ndc.x - (-0.975)).abs() < 1e-6);
        assert!((ndc.y - (1.0 - 20.0 / 600.0)).abs() < 1e-6);

        input.cursor = None;
        assert!(input.pointer_ndc().is_none());
    }

    #[test]
    fn test_key_pressed_once() {
        let mut input = Input::default();
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(input.key_pressed(KeyCode::Space));

        input.begin_frame();
        // OS key repeat
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        input.key_event(KeyCode::Space, ElementState::Released);
        assert!(!input.key_held(KeyCode::Space));
    }

    #[test]
    fn test_drag_requires_left_button() {
        let mut input = Input::default();
        input.cursor_moved(Vec2::new(100.0, 100.0));
        input.cursor_moved(Vec2::new(110.0, 100.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.buttons_held.insert(MouseButton::Left);
        input.cursor_moved(Vec2::new(120.0, 95.0));
        assert_eq!(input.drag_delta(), Vec2::new(10.0, -5.0));

        input.begin_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
        assert_eq!(input.cursor_position(), Some(Vec2::new(120.0, 95.0)));
    }

    #[test]
    fn test_option_pointer_source() {
        let none: Option<Vec2> = None;
        assert!(none.pointer_ndc().is_none());
        assert_eq!(Vec2::X.pointer_ndc(), Some(Vec2::X));
    }
}
