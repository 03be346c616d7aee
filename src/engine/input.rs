// Input and clock state for the simulation
// Abstracts winit events into a queryable per-frame snapshot
//
// The pointer is virtual: raw mouse motion (DeviceEvent::MouseMotion) moves
// it, and `set_cursor_position` snaps it back to the reference point. The OS
// cursor stays grabbed and hidden, so look rotation is unbounded.

use std::collections::HashSet;
use std::time::Instant;

use glam::DVec2;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Window/input services the simulation queries each tick.
pub trait Platform {
    /// Monotonic time in seconds.
    fn now(&self) -> f64;

    fn cursor_position(&self) -> DVec2;

    fn set_cursor_position(&mut self, position: DVec2);

    /// Whether the fire input is currently held.
    fn is_fire_held(&self) -> bool;
}

pub struct InputState {
    started: Instant,

    // Keyboard
    keys_held: HashSet<KeyCode>,

    // Mouse
    buttons_held: HashSet<MouseButton>,
    cursor: DVec2,

    close_requested: bool,
}

impl InputState {
    pub fn new(cursor: DVec2) -> Self {
        Self {
            started: Instant::now(),
            keys_held: HashSet::new(),
            buttons_held: HashSet::new(),
            cursor,
            close_requested: false,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => { self.keys_held.insert(key); }
                        ElementState::Released => { self.keys_held.remove(&key); }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => { self.buttons_held.insert(*button); }
                ElementState::Released => { self.buttons_held.remove(button); }
            },
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.buttons_held.clear();
            }
            WindowEvent::CloseRequested => self.close_requested = true,
            _ => {}
        }
    }

    /// Feed a raw device event (relative mouse motion).
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.cursor += DVec2::new(delta.0, delta.1);
        }
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Escape held or the window asked to close.
    pub fn quit_requested(&self) -> bool {
        self.close_requested || self.is_key_held(KeyCode::Escape)
    }
}

impl Platform for InputState {
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn cursor_position(&self) -> DVec2 {
        self.cursor
    }

    fn set_cursor_position(&mut self, position: DVec2) {
        self.cursor = position;
    }

    fn is_fire_held(&self) -> bool {
        self.buttons_held.contains(&MouseButton::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_motion_moves_virtual_cursor() {
        let mut input = InputState::new(DVec2::new(512.0, 384.0));
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (10.0, -4.0) });
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 1.0) });
        assert_eq!(input.cursor_position(), DVec2::new(524.0, 381.0));

        input.set_cursor_position(DVec2::new(512.0, 384.0));
        assert_eq!(input.cursor_position(), DVec2::new(512.0, 384.0));
    }

    #[test]
    fn close_request_is_sticky() {
        let mut input = InputState::new(DVec2::ZERO);
        assert!(!input.quit_requested());
        input.process_event(&WindowEvent::CloseRequested);
        assert!(input.quit_requested());
    }

    #[test]
    fn clock_is_monotonic() {
        let input = InputState::new(DVec2::ZERO);
        let a = input.now();
        let b = input.now();
        assert!(b >= a);
        assert!(!input.is_fire_held());
    }
}
