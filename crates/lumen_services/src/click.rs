//! Click components: a trigger mode plus a callback, one type per button.

use crate::input::MouseButton;
use lumen_core::define_component;
use lumen_core::ecs::{Component, Entity, World};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which button edge fires the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseStateTrigger {
    #[default]
    OnPress,
    OnRelease,
    Both,
}

impl MouseStateTrigger {
    pub fn fires_on_press(self) -> bool {
        matches!(self, Self::OnPress | Self::Both)
    }

    pub fn fires_on_release(self) -> bool {
        matches!(self, Self::OnRelease | Self::Both)
    }
}

pub type ClickCallback = Arc<dyn Fn(&mut World, Entity) + Send + Sync>;

/// Trigger mode and callback shared by both click component types.
#[derive(Clone)]
pub struct ClickHandler {
    pub trigger: MouseStateTrigger,
    callback: ClickCallback,
}

impl ClickHandler {
    pub fn new<F>(trigger: MouseStateTrigger, callback: F) -> Self
    where
        F: Fn(&mut World, Entity) + Send + Sync + 'static,
    {
        Self {
            trigger,
            callback: Arc::new(callback),
        }
    }

    pub fn callback(&self) -> ClickCallback {
        Arc::clone(&self.callback)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHandler")
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

/// A component that makes its entity's UI rectangle clickable with one button.
pub trait ClickComponent: Component {
    const BUTTON: MouseButton;

    fn handler(&self) -> &ClickHandler;
}

#[derive(Debug, Clone)]
pub struct MouseLeftClick(pub ClickHandler);

define_component!(MouseLeftClick, 10, "MouseLeftClick");

impl MouseLeftClick {
    pub fn new<F>(trigger: MouseStateTrigger, callback: F) -> Self
    where
        F: Fn(&mut World, Entity) + Send + Sync + 'static,
    {
        Self(ClickHandler::new(trigger, callback))
    }
}

impl ClickComponent for MouseLeftClick {
    const BUTTON: MouseButton = MouseButton::Left;

    fn handler(&self) -> &ClickHandler {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct MouseRightClick(pub ClickHandler);

define_component!(MouseRightClick, 11, "MouseRightClick");

impl MouseRightClick {
    pub fn new<F>(trigger: MouseStateTrigger, callback: F) -> Self
    where
        F: Fn(&mut World, Entity) + Send + Sync + 'static,
    {
        Self(ClickHandler::new(trigger, callback))
    }
}

impl ClickComponent for MouseRightClick {
    const BUTTON: MouseButton = MouseButton::Right;

    fn handler(&self) -> &ClickHandler {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_sides() {
        assert!(MouseStateTrigger::OnPress.fires_on_press());
        assert!(!MouseStateTrigger::OnPress.fires_on_release());
        assert!(!MouseStateTrigger::OnRelease.fires_on_press());
        assert!(MouseStateTrigger::Both.fires_on_press());
        assert!(MouseStateTrigger::Both.fires_on_release());
    }

    #[test]
    fn callback_runs_against_the_world() {
        let mut world = World::new();
        let target = world.spawn();
        let click = MouseLeftClick::new(MouseStateTrigger::OnPress, |world, entity| {
            world.send_event(entity);
        });

        (click.handler().callback())(&mut world, target);

        let event = world.pop_event().unwrap();
        assert_eq!(event.get::<Entity>(), Some(&target));
        assert_eq!(<MouseLeftClick as ClickComponent>::BUTTON, MouseButton::Left);
    }
}
