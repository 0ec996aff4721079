//! Mouse click dispatch.
//!
//! Each frame the system polls the input backend once per tracked button and
//! runs a Released/Pressed state machine per button. On a press edge it sends
//! [`OnMouseClick`] and fires the topmost press-triggered area under the
//! pointer; on a release edge it fires the topmost release-triggered area.

use crate::click::{
    ClickCallback, ClickComponent, MouseLeftClick, MouseRightClick, MouseStateTrigger,
};
use crate::events::{OnMouseClick, OnMouseMove};
use crate::input::{InputBackend, MouseButton};
use crate::interaction::ClickAreas;
use crate::settings::InputSettings;
use glam::Vec2;
use lumen_core::ecs::{Entity, GroupHandle, InitContext, System, World};
use lumen_core::ui::UiComponent;
use std::collections::HashMap;
use tracing::{debug, error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Press,
    Release,
}

/// Press and release indices for one button, plus the trigger each entity
/// was enrolled with.
#[derive(Debug, Default)]
struct ButtonAreas {
    press: ClickAreas,
    release: ClickAreas,
    enrolled: HashMap<Entity, MouseStateTrigger>,
}

impl ButtonAreas {
    fn side(&self, edge: Edge) -> &ClickAreas {
        match edge {
            Edge::Press => &self.press,
            Edge::Release => &self.release,
        }
    }

    fn enroll<C: ClickComponent>(&mut self, world: &World, entity: Entity) {
        let (Some(ui), Some(click)) = (world.get::<UiComponent>(entity), world.get::<C>(entity))
        else {
            debug_assert!(false, "{entity} joined a click group without its components");
            return;
        };
        let trigger = click.handler().trigger;
        if trigger.fires_on_press() {
            self.press.insert(entity, ui.z);
        }
        if trigger.fires_on_release() {
            self.release.insert(entity, ui.z);
        }
        self.enrolled.insert(entity, trigger);
        debug!(%entity, button = ?C::BUTTON, ?trigger, depth = ui.z, "click area added");
    }

    fn withdraw(&mut self, entity: Entity) {
        self.enrolled.remove(&entity);
        let removed = self.press.remove(entity) | self.release.remove(entity);
        if removed {
            debug!(%entity, "click area removed");
        }
    }

    /// Re-enroll entities whose click component was replaced with a
    /// different trigger. Replacing a component is not a group transition.
    fn refresh<C: ClickComponent>(&mut self, world: &World) {
        let stale: Vec<Entity> = self
            .enrolled
            .iter()
            .filter(|&(&entity, &trigger)| {
                world
                    .get::<C>(entity)
                    .is_some_and(|click| click.handler().trigger != trigger)
            })
            .map(|(&entity, _)| entity)
            .collect();
        for entity in stale {
            trace!(%entity, "click trigger changed");
            self.withdraw(entity);
            self.enroll::<C>(world, entity);
        }
    }
}

pub struct MouseClickSystem<B: InputBackend> {
    backend: B,
    tracked: Vec<MouseButton>,
    pressed: HashMap<MouseButton, bool>,
    last_pointer: Vec2,
    left: ButtonAreas,
    right: ButtonAreas,
    left_group: Option<GroupHandle>,
    right_group: Option<GroupHandle>,
}

impl<B: InputBackend> MouseClickSystem<B> {
    pub fn new(backend: B, settings: &InputSettings) -> Self {
        Self {
            backend,
            tracked: settings.tracked_buttons.clone(),
            pressed: HashMap::new(),
            last_pointer: Vec2::ZERO,
            left: ButtonAreas::default(),
            right: ButtonAreas::default(),
            left_group: None,
            right_group: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn left_press_areas(&self) -> &ClickAreas {
        &self.left.press
    }

    pub fn left_release_areas(&self) -> &ClickAreas {
        &self.left.release
    }

    pub fn right_press_areas(&self) -> &ClickAreas {
        &self.right.press
    }

    pub fn right_release_areas(&self) -> &ClickAreas {
        &self.right.release
    }

    fn handle_button(&mut self, world: &mut World, button: MouseButton, pointer: Vec2) {
        let down = match self.backend.is_button_pressed(button) {
            Ok(down) => down,
            Err(error) => {
                error!(%error, "skipping button");
                return;
            }
        };
        let was_down = self.pressed.insert(button, down).unwrap_or(false);

        match (was_down, down) {
            (false, true) => {
                trace!(?button, "press edge");
                world.send_event(OnMouseClick { pos: pointer, button });
                self.dispatch(world, button, Edge::Press, pointer);
            }
            (true, false) => {
                trace!(?button, "release edge");
                self.dispatch(world, button, Edge::Release, pointer);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, world: &mut World, button: MouseButton, edge: Edge, pointer: Vec2) {
        let areas = match button {
            MouseButton::Left => {
                self.left.refresh::<MouseLeftClick>(world);
                &self.left
            }
            MouseButton::Right => {
                self.right.refresh::<MouseRightClick>(world);
                &self.right
            }
            _ => return,
        };

        // Collect first: callbacks may mutate the world the walk reads from.
        let hits = areas.side(edge).hits(pointer, world);
        for entity in hits {
            let callback = match button {
                MouseButton::Left => callback_of::<MouseLeftClick>(world, entity),
                _ => callback_of::<MouseRightClick>(world, entity),
            };
            if let Some(callback) = callback {
                debug!(%entity, ?button, ?edge, "click");
                callback(world, entity);
            }
        }
    }
}

fn callback_of<C: ClickComponent>(world: &World, entity: Entity) -> Option<ClickCallback> {
    world.get::<C>(entity).map(|click| click.handler().callback())
}

impl<B: InputBackend> System for MouseClickSystem<B> {
    fn name(&self) -> &str {
        "MouseClickSystem"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        self.left_group = Some(ctx.register_group::<(UiComponent, MouseLeftClick)>());
        self.right_group = Some(ctx.register_group::<(UiComponent, MouseRightClick)>());
    }

    fn on_group_add(&mut self, world: &mut World, group: GroupHandle, entity: Entity) {
        if Some(group) == self.left_group {
            self.left.enroll::<MouseLeftClick>(world, entity);
        } else if Some(group) == self.right_group {
            self.right.enroll::<MouseRightClick>(world, entity);
        }
    }

    fn on_group_remove(&mut self, _world: &mut World, group: GroupHandle, entity: Entity) {
        if Some(group) == self.left_group {
            self.left.withdraw(entity);
        } else if Some(group) == self.right_group {
            self.right.withdraw(entity);
        }
    }

    fn execute(&mut self, world: &mut World) {
        let pointer = self.backend.pointer_position();
        if pointer != self.last_pointer {
            world.send_event(OnMouseMove { pos: pointer });
        }
        self.last_pointer = pointer;

        for index in 0..self.tracked.len() {
            let button = self.tracked[index];
            self.handle_button(world, button, pointer);
        }
    }
}
