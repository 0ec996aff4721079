//! Type-erased event queue.
//!
//! Systems publish events through [`World::send_event`](crate::ecs::World::send_event);
//! the scheduler drains the queue between system steps and offers every
//! event to every system's `on_event`.

use crate::ecs::Entity;
use std::any::{type_name, Any};
use std::collections::VecDeque;
use std::fmt;

/// A queued event of any `'static` type.
pub struct Event {
    name: &'static str,
    payload: Box<dyn Any + Send>,
}

impl Event {
    pub fn new<E: Any + Send>(event: E) -> Self {
        Self {
            name: type_name::<E>(),
            payload: Box::new(event),
        }
    }

    /// Borrow the payload if it is an `E`.
    pub fn get<E: Any>(&self) -> Option<&E> {
        self.payload.downcast_ref::<E>()
    }

    pub fn is<E: Any>(&self) -> bool {
        self.payload.is::<E>()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("name", &self.name).finish()
    }
}

/// Emitted by [`World::mark_changed`](crate::ecs::World::mark_changed) when a
/// caller mutated component data in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityChanged {
    pub id: Entity,
}

#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: VecDeque<Event>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    pub(crate) fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_matches_only_the_sent_type() {
        let event = Event::new(EntityChanged {
            id: Entity::from_raw(3),
        });
        assert!(event.is::<EntityChanged>());
        assert!(event.get::<u32>().is_none());
        assert_eq!(
            event.get::<EntityChanged>().map(|e| e.id),
            Some(Entity::from_raw(3))
        );
        assert!(event.name().ends_with("EntityChanged"));
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = EventQueue::default();
        queue.push(Event::new(1u32));
        queue.push(Event::new(2u32));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().and_then(|e| e.get::<u32>().copied()), Some(1));
        assert_eq!(queue.pop().and_then(|e| e.get::<u32>().copied()), Some(2));
        assert!(queue.pop().is_none());
    }
}
