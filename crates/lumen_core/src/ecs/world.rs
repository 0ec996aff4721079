// world.rs - ECS World: entity/component store with mutation notifications

use crate::ecs::event::EventQueue;
use crate::ecs::group::TransitionQueue;
use crate::ecs::{
    Component, ComponentId, ComponentSet, Entity, EntityChanged, Event, GroupEvent, GroupHandle,
    GroupRegistry, Signature,
};
use crate::ecs::entity::EntityAllocator;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("{0} does not exist")]
    NoSuchEntity(Entity),
}

/// Type-erased access to one component column.
trait ErasedColumn: Send + Sync {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// All instances of one component type, ordered by entity.
struct Column<T> {
    rows: BTreeMap<Entity, T>,
}

impl<T: Component> ErasedColumn for Column<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.rows.remove(&entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The main ECS world containing all entities and components.
///
/// Every attach/detach is run through the [`GroupRegistry`] before the call
/// returns, so group membership always matches the current attachments. The
/// resulting transitions are queued until the scheduler delivers them.
pub struct World {
    allocator: EntityAllocator,
    entities: HashMap<Entity, BTreeSet<ComponentId>>,
    columns: HashMap<ComponentId, Box<dyn ErasedColumn>>,
    groups: GroupRegistry,
    transitions: TransitionQueue,
    events: EventQueue,
    scratch: Vec<GroupEvent>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            entities: HashMap::new(),
            columns: HashMap::new(),
            groups: GroupRegistry::new(),
            transitions: TransitionQueue::default(),
            events: EventQueue::default(),
            scratch: Vec::new(),
        }
    }

    /// Spawn an entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, BTreeSet::new());
        trace!(%entity, "spawned");
        entity
    }

    /// Despawn an entity, detaching every component first.
    ///
    /// Each detach is evaluated against the groups, so removal transitions
    /// fire exactly as if the components had been detached one by one.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        let mut components = self
            .entities
            .remove(&entity)
            .ok_or(WorldError::NoSuchEntity(entity))?;

        let ids: Vec<ComponentId> = components.iter().copied().collect();
        for id in ids {
            if let Some(column) = self.columns.get_mut(&id) {
                column.remove_entity(entity);
            }
            components.remove(&id);
            self.groups
                .evaluate(entity, id, &components, &mut self.scratch);
        }
        self.flush_scratch();
        debug!(%entity, "despawned");
        Ok(())
    }

    /// Entity existence check.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Attach a component, replacing any previous value of the same type.
    ///
    /// Replacing a value does not change the entity's component set and so
    /// never produces a group transition.
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), WorldError> {
        T::ensure_registered();
        if !self.entities.contains_key(&entity) {
            return Err(WorldError::NoSuchEntity(entity));
        }

        let previous = self.column_or_insert::<T>().rows.insert(entity, value);
        if previous.is_none() {
            trace!(%entity, component = T::NAME, "attached");
            self.notify(entity, T::ID, true);
        }
        Ok(())
    }

    /// Detach a component, returning it if it was attached.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, WorldError> {
        if !self.entities.contains_key(&entity) {
            return Err(WorldError::NoSuchEntity(entity));
        }

        let removed = self
            .columns
            .get_mut(&T::ID)
            .and_then(|column| column.as_any_mut().downcast_mut::<Column<T>>())
            .and_then(|column| column.rows.remove(&entity));
        if removed.is_some() {
            trace!(%entity, component = T::NAME, "detached");
            self.notify(entity, T::ID, false);
        }
        Ok(removed)
    }

    /// Get an immutable reference to a component.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.rows.get(&entity)
    }

    /// Get a mutable reference to a component.
    ///
    /// In-place edits are invisible to dependents; follow up with
    /// [`World::mark_changed`] when cached data derives from the component.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.columns
            .get_mut(&T::ID)?
            .as_any_mut()
            .downcast_mut::<Column<T>>()?
            .rows
            .get_mut(&entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Iterate every `(entity, component)` pair of type `T`, by ascending entity.
    pub fn view<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.column::<T>()
            .into_iter()
            .flat_map(|column| column.rows.iter().map(|(entity, value)| (*entity, value)))
    }

    /// Number of entities carrying `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.column::<T>().map_or(0, |column| column.rows.len())
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Register a group for the component set `S`.
    ///
    /// Entities already satisfying `S` are enrolled immediately and their
    /// add transitions are queued like any other.
    pub fn register_group<S: ComponentSet>(&mut self) -> GroupHandle {
        S::ensure_registered();
        self.register_signature(S::signature())
    }

    /// Untyped form of [`World::register_group`].
    pub fn register_signature(&mut self, signature: Signature) -> GroupHandle {
        let (handle, fresh) = self.groups.register(signature);
        if fresh {
            let mut existing: Vec<Entity> = self.entities.keys().copied().collect();
            existing.sort_unstable();
            for entity in existing {
                if let Some(event) = self.groups.enroll(handle, entity, &self.entities[&entity]) {
                    self.transitions.push(event);
                }
            }
            debug!(
                group = %handle,
                signature = ?self.groups.signature(handle).map(ToString::to_string),
                members = self.groups.member_count(handle),
                "registered group"
            );
        }
        handle
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn is_member(&self, group: GroupHandle, entity: Entity) -> bool {
        self.groups.is_member(group, entity)
    }

    /// Next undelivered group transition, oldest first.
    pub fn pop_group_event(&mut self) -> Option<GroupEvent> {
        self.transitions.pop()
    }

    pub fn pending_group_events(&self) -> usize {
        self.transitions.len()
    }

    /// Queue an event for every system's `on_event`.
    pub fn send_event<E: Any + Send>(&mut self, event: E) {
        self.events.push(Event::new(event));
    }

    /// Next undelivered event, oldest first.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Announce that an entity's component data was edited in place.
    pub fn mark_changed(&mut self, entity: Entity) -> Result<(), WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::NoSuchEntity(entity));
        }
        self.send_event(EntityChanged { id: entity });
        Ok(())
    }

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns.get(&T::ID)?.as_any().downcast_ref::<Column<T>>()
    }

    fn column_or_insert<T: Component>(&mut self) -> &mut Column<T> {
        self.columns
            .entry(T::ID)
            .or_insert_with(|| {
                Box::new(Column::<T> {
                    rows: BTreeMap::new(),
                })
            })
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .unwrap_or_else(|| panic!("component id {} is bound to another type", T::ID))
    }

    /// Store mutation hook: keep the entity's signature current and run it
    /// through the group registry.
    fn notify(&mut self, entity: Entity, changed: ComponentId, attached: bool) {
        let Some(components) = self.entities.get_mut(&entity) else {
            return;
        };
        if attached {
            components.insert(changed);
        } else {
            components.remove(&changed);
        }
        self.groups
            .evaluate(entity, changed, components, &mut self.scratch);
        self.flush_scratch();
    }

    fn flush_scratch(&mut self) {
        for event in self.scratch.drain(..) {
            self.transitions.push(event);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
