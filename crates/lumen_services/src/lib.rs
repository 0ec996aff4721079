//! Lumen Services Layer
//!
//! Platform abstraction for input, clickable UI areas and settings.

pub mod click;
pub mod events;
pub mod input;
pub mod interaction;
pub mod mouse_click;
pub mod settings;

pub use click::{ClickComponent, ClickHandler, MouseLeftClick, MouseRightClick, MouseStateTrigger};
pub use events::{OnMouseClick, OnMouseMove};
pub use input::{InputBackend, InputError, InputState, MouseButton};
pub use interaction::ClickAreas;
pub use mouse_click::MouseClickSystem;
pub use settings::{InputSettings, Settings, SettingsError, WindowSettings};
