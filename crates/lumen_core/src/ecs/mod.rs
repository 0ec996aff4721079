//! Entity Component System core types.
//!
//! The world is a typed component store that reports every attach and
//! detach to a [`GroupRegistry`]. Systems claim groups during
//! initialisation and receive the add/remove transitions through the
//! [`Scheduler`], which also runs them once per frame in a fixed order.

mod component;
mod entity;
mod event;
mod group;
mod scheduler;
mod system;
mod system_handle;
mod system_registration_error;
mod world;

pub use component::{meta_of, name_of, register_component, Component, ComponentId, ComponentMeta};
pub use entity::Entity;
pub use event::{EntityChanged, Event};
pub use group::{
    ComponentSet, GroupEvent, GroupHandle, GroupRegistry, GroupTransition, Signature,
};
pub use scheduler::Scheduler;
pub use system::{InitContext, System};
pub use system_handle::SystemHandle;
pub use system_registration_error::SystemRegistrationError;
pub use world::{World, WorldError};
