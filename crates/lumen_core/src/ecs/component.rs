// component.rs - Runtime component registration
//
// Components are identified by u32 IDs, not Rust TypeIds.
// Group signatures and log lines are expressed in these IDs.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

pub type ComponentId = u32;

/// Metadata describing a registered component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub id: ComponentId,
    pub name: &'static str,
}

/// Global registry of every component type attached so far.
static REGISTRY: Lazy<RwLock<HashMap<ComponentId, ComponentMeta>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a component's metadata.
///
/// Two different types claiming the same id is a programming error and panics.
pub fn register_component(meta: ComponentMeta) {
    let mut map = REGISTRY.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(prev) = map.get(&meta.id) {
        assert_eq!(
            prev.name, meta.name,
            "Component id {} claimed by both '{}' and '{}'",
            meta.id, prev.name, meta.name
        );
        return;
    }
    map.insert(meta.id, meta);
}

/// Look up component metadata by ID.
pub fn meta_of(id: ComponentId) -> Option<ComponentMeta> {
    REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&id)
        .cloned()
}

/// Human-readable name for a component id, for diagnostics.
pub fn name_of(id: ComponentId) -> &'static str {
    meta_of(id).map(|meta| meta.name).unwrap_or("<unregistered>")
}

/// Trait for data attachable to an entity.
///
/// Implementors must be `Send + Sync` so click callbacks and render records
/// can be shared with backends living on other threads.
pub trait Component: 'static + Sized + Send + Sync {
    /// Globally unique component ID.
    const ID: ComponentId;

    /// Human-readable name for debugging.
    const NAME: &'static str;

    /// Register this component with the global registry.
    /// The world calls this on first attach, so explicit calls are optional.
    fn ensure_registered() {
        register_component(ComponentMeta {
            id: Self::ID,
            name: Self::NAME,
        });
    }
}

/// Helper macro to implement Component trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Position { x: f32, y: f32 }
///
/// define_component!(Position, 1, "Position");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty, $id:expr, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const ID: $crate::ecs::ComponentId = $id;
            const NAME: &'static str = $name;
        }
    };
}
