//! Lumen Render System
//!
//! Render-submission records for 2D UI shapes, cached and rebuilt only when
//! the set of shapes changes. Drawing itself belongs to a [`RenderBackend`].

pub mod backend;
pub mod material;
pub mod render_call;
pub mod shape;
pub mod simple2d;

pub use backend::{RecordingRenderer, RenderBackend};
pub use material::{Material, MaterialId, OpacityType, RenderStage};
pub use render_call::{RenderCall, ShapeInstance};
pub use shape::{make_simple_2d_shape, Shape2D, Simple2DObject, Simple2DRenderCall};
pub use simple2d::Simple2DObjectSystem;
