//! Entity handle
//!
//! Entities are lightweight handles (8 bytes) that reference data in the World.
//! IDs are allocated monotonically and never reused, so a larger id always
//! means a more recently spawned entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity handle (opaque, stable ID)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u64);

impl Entity {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity IDs, starting at 1.
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    pub(crate) fn new() -> Self {
        Self { next_id: 1 }
    }

    pub(crate) fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }
}
