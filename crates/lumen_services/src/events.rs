//! Events published by the click system.

use crate::input::MouseButton;
use glam::Vec2;

/// The pointer moved since the previous frame. Sent at most once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnMouseMove {
    pub pos: Vec2,
}

/// A tracked button went down this frame. Releases have no counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnMouseClick {
    pub pos: Vec2,
    pub button: MouseButton,
}
