//! Lumen Engine Core
//!
//! Contains the fundamental simulation pieces:
//! - Entity Component System (ECS) with group membership observers
//! - UI rectangle component shared by input and rendering
//! - Lenient serialization helpers for persisted components

pub mod ecs;
pub mod serialization;
pub mod ui;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
