//! The [`System`] trait: per-frame logic plus group and event observers.

use crate::ecs::{ComponentSet, Entity, Event, GroupHandle, World};

/// A unit of frame logic owned by the [`Scheduler`](crate::ecs::Scheduler).
///
/// Group transitions for groups a system registered during [`System::init`]
/// are routed back to that system. Handlers run on the frame thread between
/// system steps; a panicking handler is a bug and is not caught.
pub trait System {
    /// Unique system name.
    fn name(&self) -> &str;

    /// Register groups and set up backend resources.
    fn init(&mut self, _ctx: &mut InitContext<'_>) {}

    /// `entity` now carries every component of `group`. Its components are
    /// attached for the whole call.
    fn on_group_add(&mut self, _world: &mut World, _group: GroupHandle, _entity: Entity) {}

    /// `entity` no longer satisfies `group`. The component that broke the set
    /// is already gone, and the entity itself may have been despawned.
    fn on_group_remove(&mut self, _world: &mut World, _group: GroupHandle, _entity: Entity) {}

    /// Every event sent through the world is offered to every system.
    fn on_event(&mut self, _world: &mut World, _event: &Event) {}

    /// Run once per frame, in registration order.
    fn execute(&mut self, world: &mut World);
}

/// Registration surface handed to [`System::init`].
pub struct InitContext<'w> {
    world: &'w mut World,
    claimed: Vec<GroupHandle>,
}

impl<'w> InitContext<'w> {
    pub(crate) fn new(world: &'w mut World) -> Self {
        Self {
            world,
            claimed: Vec::new(),
        }
    }

    /// Register a group and route its transitions to the system being
    /// initialised. A set already claimed by another system changes owner;
    /// handlers are replaced, never chained.
    pub fn register_group<S: ComponentSet>(&mut self) -> GroupHandle {
        let handle = self.world.register_group::<S>();
        self.claimed.push(handle);
        handle
    }

    pub fn world(&mut self) -> &mut World {
        self.world
    }

    pub(crate) fn into_claimed(self) -> Vec<GroupHandle> {
        self.claimed
    }
}
