//! Depth-ordered index of clickable regions.
//!
//! Entries are ordered by depth, then entity id, and walked greatest first.
//! A region's depth is fixed when it is inserted: ordering, early
//! termination and the winning depth all use it. Only the rectangle is read
//! live from the [`UiComponent`], so a region that moved is tested where it
//! is now, but changing its `z` has no effect until it is re-inserted.

use glam::Vec2;
use lumen_core::ecs::{Entity, World};
use lumen_core::ui::UiComponent;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AreaKey {
    depth: i32,
    entity: Entity,
}

#[derive(Debug, Default)]
pub struct ClickAreas {
    order: BTreeSet<AreaKey>,
    by_entity: HashMap<Entity, AreaKey>,
}

impl ClickAreas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region for `entity` at `depth`.
    pub fn insert(&mut self, entity: Entity, depth: i32) {
        let key = AreaKey { depth, entity };
        if let Some(previous) = self.by_entity.insert(entity, key) {
            debug_assert!(false, "{entity} inserted twice into a click index");
            self.order.remove(&previous);
        }
        self.order.insert(key);
        trace!(%entity, depth, "click area inserted");
    }

    /// Drop the region for `entity`. Returns `false` if it had none.
    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.by_entity.remove(&entity) {
            Some(key) => {
                self.order.remove(&key);
                trace!(%entity, "click area removed");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.by_entity.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities in walk order: deepest first, then greatest id.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().rev().map(|key| key.entity)
    }

    /// Every region under `pointer` at the winning depth, in walk order.
    ///
    /// The walk stops at the first entry inserted shallower than the best hit
    /// so far, so every reported region shares one insert-time depth.
    /// Several regions sharing the winning depth are all reported.
    pub fn hits(&self, pointer: Vec2, world: &World) -> Vec<Entity> {
        let mut best: Option<i32> = None;
        let mut hits = Vec::new();

        for key in self.order.iter().rev() {
            let Some(ui) = world.get::<UiComponent>(key.entity) else {
                continue;
            };
            if best.is_some_and(|best| key.depth < best) {
                break;
            }
            if ui.in_clip_bound(pointer.x, pointer.y) {
                best = Some(key.depth);
                hits.push(key.entity);
            }
        }

        hits
    }

    /// The single topmost region under `pointer`, if any.
    pub fn query_topmost(&self, pointer: Vec2, world: &World) -> Option<Entity> {
        self.hits(pointer, world).into_iter().next()
    }
}
