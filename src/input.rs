//! Pointer input for dragging.
//!
//! [`Pointer`] turns raw winit window events into [`PointerEvent`]s that the
//! frame loop forwards to the interaction controller. Only the left mouse
//! button picks and releases; cursor motion is always reported.

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Pointer event in screen pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// Tracks cursor position, window size and the drag button.
#[derive(Debug, Clone)]
pub struct Pointer {
    position: Vec2,
    ndc: Vec2,
    held: bool,
    window_size: (u32, u32),
}

impl Pointer {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            ndc: Vec2::ZERO,
            held: false,
            window_size: (800, 600),
        }
    }

    /// Cursor position in screen pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Cursor position in normalized device coordinates (-1 to 1, Y up).
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Whether the drag button is held.
    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Window size as a float viewport.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window_size.0 as f32, self.window_size.1 as f32)
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.ndc = crate::camera::screen_to_ndc(self.position, self.viewport());
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let btn = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => self.press(btn),
                    ElementState::Released => self.release(btn),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.move_to(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => self.release(MouseButton::Left),
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
                None
            }
            _ => None,
        }
    }

    pub(crate) fn press(&mut self, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left || self.held {
            return None;
        }
        self.held = true;
        Some(PointerEvent::Down(self.position))
    }

    pub(crate) fn release(&mut self, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left || !self.held {
            return None;
        }
        self.held = false;
        Some(PointerEvent::Up(self.position))
    }

    pub(crate) fn move_to(&mut self, position: Vec2) -> PointerEvent {
        self.position = position;
        self.ndc = crate::camera::screen_to_ndc(position, self.viewport());
        PointerEvent::Move(position)
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_button_drives_drag() {
        let mut pointer = Pointer::new();
        pointer.move_to(Vec2::new(10.0, 20.0));
        assert_eq!(pointer.press(MouseButton::Left), Some(PointerEvent::Down(Vec2::new(10.0, 20.0))));
        assert!(pointer.is_held());
        // Repeated press is not a second pick.
        assert_eq!(pointer.press(MouseButton::Left), None);
        assert_eq!(pointer.release(MouseButton::Left), Some(PointerEvent::Up(Vec2::new(10.0, 20.0))));
        assert!(!pointer.is_held());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut pointer = Pointer::new();
        assert_eq!(pointer.press(MouseButton::Right), None);
        assert_eq!(pointer.press(MouseButton::Middle), None);
        assert!(!pointer.is_held());
        assert_eq!(pointer.release(MouseButton::Left), None);
    }

    #[test]
    fn test_pointer_ndc() {
        let mut pointer = Pointer::new();
        pointer.set_window_size(800, 600);
        pointer.move_to(Vec2::new(400.0, 300.0));

        assert!(pointer.ndc().x.abs() < 0.01);
        assert!(pointer.ndc().y.abs() < 0.01);
    }
}
