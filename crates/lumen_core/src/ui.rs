//! Screen-space UI rectangle component.
//!
//! Layout is out of scope: something else writes `pos`, `width` and
//! `height`. Input reads the rectangle for hit tests, rendering reads it
//! for placement, and both use `z` as the depth (higher is in front).

use crate::define_component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, half-open on its right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UiRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl UiRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UiComponent {
    /// Top-left corner in screen pixels.
    pub pos: Vec2,
    /// Depth; larger values draw over and receive input before smaller ones.
    pub z: i32,
    pub width: f32,
    pub height: f32,
    /// Optional clip region (e.g. a scroll view) the element is cut to.
    #[serde(default)]
    pub clip: Option<UiRect>,
}

define_component!(UiComponent, 1, "UiComponent");

impl UiComponent {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    #[must_use]
    pub fn with_clip(mut self, clip: UiRect) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }

    pub fn set_z(&mut self, z: i32) {
        self.z = z;
    }

    pub fn rect(&self) -> UiRect {
        UiRect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Hit test against the element's rectangle cut by its clip region.
    pub fn in_clip_bound(&self, x: f32, y: f32) -> bool {
        self.rect().contains(x, y) && self.clip.map_or(true, |clip| clip.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_half_open() {
        let ui = UiComponent::new(10.0, 10.0, 20.0, 5.0);
        assert!(ui.in_clip_bound(10.0, 10.0));
        assert!(ui.in_clip_bound(29.9, 14.9));
        assert!(!ui.in_clip_bound(30.0, 12.0));
        assert!(!ui.in_clip_bound(15.0, 15.0));
        assert!(!ui.in_clip_bound(9.9, 12.0));
    }

    #[test]
    fn clip_region_cuts_the_hit_area() {
        let ui = UiComponent::new(0.0, 0.0, 100.0, 100.0).with_clip(UiRect::new(0.0, 0.0, 50.0, 50.0));
        assert!(ui.in_clip_bound(25.0, 25.0));
        assert!(!ui.in_clip_bound(75.0, 25.0));
    }

    #[test]
    fn setters_update_the_rect() {
        let mut ui = UiComponent::default().with_z(3);
        ui.set_pos(1.0, 2.0);
        ui.set_width(4.0);
        ui.set_height(5.0);
        ui.set_z(9);
        assert_eq!(ui.rect(), UiRect::new(1.0, 2.0, 4.0, 5.0));
        assert_eq!(ui.z, 9);
    }
}
