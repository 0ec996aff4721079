//! Input abstraction: pointer position and mouse button polling.
//!
//! [`InputBackend`] is what the click system polls once per frame.
//! [`InputState`] is the in-tree backend, fed from winit window events (or
//! directly, for scripted runs and tests).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;
use winit::event::{ElementState, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    /// Platform specific button code.
    Other(u16),
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            winit::event::MouseButton::Back => Self::Back,
            winit::event::MouseButton::Forward => Self::Forward,
            winit::event::MouseButton::Other(code) => Self::Other(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown mouse button {0:?}")]
    UnknownButton(MouseButton),
}

/// Polling interface consumed by the click system.
pub trait InputBackend {
    /// Current state of `button`; buttons the device cannot report are an error.
    fn is_button_pressed(&self, button: MouseButton) -> Result<bool, InputError>;

    /// Pointer position in screen pixels.
    fn pointer_position(&self) -> Vec2;
}

impl<T: InputBackend> InputBackend for Rc<RefCell<T>> {
    fn is_button_pressed(&self, button: MouseButton) -> Result<bool, InputError> {
        self.borrow().is_button_pressed(button)
    }

    fn pointer_position(&self) -> Vec2 {
        self.borrow().pointer_position()
    }
}

/// Latest pointer and button state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pointer: Vec2,
    pressed: HashSet<MouseButton>,
    /// Extra button codes the device has reported at least once.
    seen_other: HashSet<u16>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if let MouseButton::Other(code) = button {
            self.seen_other.insert(code);
        }
        if pressed {
            self.pressed.insert(button);
        } else {
            self.pressed.remove(&button);
        }
    }

    pub fn press(&mut self, button: MouseButton) {
        self.set_button(button, true);
    }

    pub fn release(&mut self, button: MouseButton) {
        self.set_button(button, false);
    }

    /// Feed a winit window event. Returns `true` if the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_pointer(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_button((*button).into(), *state == ElementState::Pressed);
                true
            }
            _ => false,
        }
    }
}

impl InputBackend for InputState {
    fn is_button_pressed(&self, button: MouseButton) -> Result<bool, InputError> {
        match button {
            MouseButton::Other(code) if !self.seen_other.contains(&code) => {
                Err(InputError::UnknownButton(button))
            }
            _ => Ok(self.pressed.contains(&button)),
        }
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}
