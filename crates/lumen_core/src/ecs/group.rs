//! Group registry: live membership of entities against component-type sets.
//!
//! A group is keyed by an unordered set of component ids. Every attach or
//! detach in the [`World`](crate::ecs::World) re-evaluates the mutated entity
//! against the groups that mention the changed component, and each
//! membership flip becomes exactly one [`GroupEvent`].
//!
//! Membership is updated synchronously inside the mutation; the events are
//! queued and handed to their owning system by the
//! [`Scheduler`](crate::ecs::Scheduler) before the next system step runs.

use crate::ecs::{name_of, Component, ComponentId, Entity};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use tracing::trace;

/// Handle to a registered group. Registering the same set twice yields the
/// same handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(u32);

impl GroupHandle {
    /// Return the raw index backing this handle.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Sorted, deduplicated list of the component ids a group requires.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(Vec<ComponentId>);

impl Signature {
    /// Build a signature from ids in any order. Duplicates collapse.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        let mut list: Vec<ComponentId> = ids.into_iter().collect();
        list.sort_unstable();
        list.dedup();
        Self(list)
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.0
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// True when `components` carries every required id.
    pub fn is_satisfied_by(&self, components: &BTreeSet<ComponentId>) -> bool {
        self.0.iter().all(|id| components.contains(id))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name_of(*id))?;
        }
        f.write_str("}")
    }
}

/// A statically typed set of components, implemented for tuples.
///
/// ```ignore
/// let handle = world.register_group::<(UiComponent, MouseLeftClick)>();
/// ```
pub trait ComponentSet: 'static {
    fn signature() -> Signature;

    fn ensure_registered();
}

macro_rules! impl_component_set {
    ($($ty:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            fn signature() -> Signature {
                Signature::from_ids([$($ty::ID),+])
            }

            fn ensure_registered() {
                $($ty::ensure_registered();)+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);

/// A single membership flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupTransition {
    Added(Entity),
    Removed(Entity),
}

impl GroupTransition {
    pub fn entity(self) -> Entity {
        match self {
            Self::Added(entity) | Self::Removed(entity) => entity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupEvent {
    pub group: GroupHandle,
    pub transition: GroupTransition,
}

struct Group {
    signature: Signature,
    members: BTreeSet<Entity>,
}

/// Tracks which entities currently satisfy each registered signature.
#[derive(Default)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    by_signature: HashMap<Signature, GroupHandle>,
    by_component: HashMap<ComponentId, Vec<GroupHandle>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signature, returning its handle and whether it is new.
    ///
    /// # Panics
    /// An empty signature is a caller bug.
    pub fn register(&mut self, signature: Signature) -> (GroupHandle, bool) {
        assert!(
            !signature.ids().is_empty(),
            "a group needs at least one component type"
        );
        if let Some(&handle) = self.by_signature.get(&signature) {
            return (handle, false);
        }

        let handle = GroupHandle(self.groups.len() as u32);
        for &id in signature.ids() {
            self.by_component.entry(id).or_default().push(handle);
        }
        self.by_signature.insert(signature.clone(), handle);
        self.groups.push(Group {
            signature,
            members: BTreeSet::new(),
        });
        (handle, true)
    }

    pub fn signature(&self, handle: GroupHandle) -> Option<&Signature> {
        self.groups.get(handle.0 as usize).map(|g| &g.signature)
    }

    /// Re-evaluate `entity` after the component `changed` was attached or
    /// detached. `components` is the entity's full component set after the
    /// mutation. Only groups mentioning `changed` can flip.
    pub fn evaluate(
        &mut self,
        entity: Entity,
        changed: ComponentId,
        components: &BTreeSet<ComponentId>,
        out: &mut Vec<GroupEvent>,
    ) {
        let Some(handles) = self.by_component.get(&changed) else {
            return;
        };
        for &handle in handles {
            if let Some(event) = Self::reconcile(&mut self.groups, handle, entity, components) {
                out.push(event);
            }
        }
    }

    /// Evaluate one group for one entity; used to backfill a new group.
    pub fn enroll(
        &mut self,
        handle: GroupHandle,
        entity: Entity,
        components: &BTreeSet<ComponentId>,
    ) -> Option<GroupEvent> {
        Self::reconcile(&mut self.groups, handle, entity, components)
    }

    fn reconcile(
        groups: &mut [Group],
        handle: GroupHandle,
        entity: Entity,
        components: &BTreeSet<ComponentId>,
    ) -> Option<GroupEvent> {
        let group = &mut groups[handle.0 as usize];
        let satisfied = group.signature.is_satisfied_by(components);
        let transition = match (satisfied, group.members.contains(&entity)) {
            (true, false) => {
                group.members.insert(entity);
                GroupTransition::Added(entity)
            }
            (false, true) => {
                group.members.remove(&entity);
                GroupTransition::Removed(entity)
            }
            _ => return None,
        };
        trace!(group = %handle, signature = %group.signature, ?transition, "group membership changed");
        Some(GroupEvent {
            group: handle,
            transition,
        })
    }

    pub fn is_member(&self, handle: GroupHandle, entity: Entity) -> bool {
        self.groups
            .get(handle.0 as usize)
            .is_some_and(|g| g.members.contains(&entity))
    }

    /// Members of a group in ascending entity order.
    pub fn members(&self, handle: GroupHandle) -> impl Iterator<Item = Entity> + '_ {
        self.groups
            .get(handle.0 as usize)
            .into_iter()
            .flat_map(|g| g.members.iter().copied())
    }

    pub fn member_count(&self, handle: GroupHandle) -> usize {
        self.groups
            .get(handle.0 as usize)
            .map_or(0, |g| g.members.len())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// FIFO of undelivered transitions.
///
/// An add followed by a remove of the same entity, both still undelivered,
/// cancel out: the add handler would otherwise receive an entity whose
/// components are already gone. Cancelled adds are left as tombstones and
/// skipped on pop, so both ends stay constant time.
#[derive(Debug, Default)]
pub(crate) struct TransitionQueue {
    pending: VecDeque<Option<GroupEvent>>,
    /// Sequence number of `pending[0]`.
    head: u64,
    live: usize,
    undelivered_adds: HashMap<(GroupHandle, Entity), u64>,
}

impl TransitionQueue {
    pub(crate) fn push(&mut self, event: GroupEvent) {
        match event.transition {
            GroupTransition::Removed(entity) => {
                if let Some(seq) = self.undelivered_adds.remove(&(event.group, entity)) {
                    let slot = (seq - self.head) as usize;
                    self.pending[slot] = None;
                    self.live -= 1;
                    return;
                }
            }
            GroupTransition::Added(entity) => {
                let seq = self.head + self.pending.len() as u64;
                self.undelivered_adds.insert((event.group, entity), seq);
            }
        }
        self.pending.push_back(Some(event));
        self.live += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<GroupEvent> {
        while let Some(slot) = self.pending.pop_front() {
            let seq = self.head;
            self.head += 1;
            let Some(event) = slot else {
                continue;
            };
            if let GroupTransition::Added(entity) = event.transition {
                let key = (event.group, entity);
                if self.undelivered_adds.get(&key) == Some(&seq) {
                    self.undelivered_adds.remove(&key);
                }
            }
            self.live -= 1;
            return Some(event);
        }
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
