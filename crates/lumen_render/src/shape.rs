//! Simple 2D shapes drawn over a UI rectangle.

use crate::render_call::RenderCall;
use glam::Vec3;
use lumen_core::define_component;
use lumen_core::ecs::{Entity, World, WorldError};
use lumen_core::serialization::lenient_field;
use lumen_core::ui::UiComponent;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Shape2D {
    Triangle,
    Square,
    Circle,
    #[default]
    None,
}

impl Shape2D {
    /// Parse a shape name; anything unrecognised becomes [`Shape2D::None`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Triangle" => Self::Triangle,
            "Square" => Self::Square,
            "Circle" => Self::Circle,
            "None" => Self::None,
            other => {
                warn!(shape = other, "unknown shape, using None");
                Self::None
            }
        }
    }
}

impl<'de> Deserialize<'de> for Shape2D {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(name) => Ok(Self::from_name(&name)),
            None => {
                warn!("shape is null, using None");
                Ok(Self::None)
            }
        }
    }
}

/// Flat-colored shape filling its entity's [`UiComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Simple2DObjectDoc", into = "Simple2DObjectDoc")]
pub struct Simple2DObject {
    pub shape: Shape2D,
    pub width: f32,
    pub height: f32,
    pub colors: Vec3,
}

define_component!(Simple2DObject, 20, "Simple2DObject");

impl Simple2DObject {
    pub fn new(shape: Shape2D, width: f32, height: f32, colors: Vec3) -> Self {
        Self {
            shape,
            width,
            height,
            colors,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Simple2DObjectDoc {
    #[serde(default, deserialize_with = "lenient_field")]
    shape: Shape2D,
    #[serde(default, deserialize_with = "lenient_field")]
    size: [f32; 2],
    #[serde(default, deserialize_with = "lenient_field")]
    colors: Vec3,
}

impl From<Simple2DObjectDoc> for Simple2DObject {
    fn from(doc: Simple2DObjectDoc) -> Self {
        Self::new(doc.shape, doc.size[0], doc.size[1], doc.colors)
    }
}

impl From<Simple2DObject> for Simple2DObjectDoc {
    fn from(object: Simple2DObject) -> Self {
        Self {
            shape: object.shape,
            size: [object.width, object.height],
            colors: object.colors,
        }
    }
}

/// Cached render record for an entity in the UI + shape group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simple2DRenderCall(pub RenderCall);

define_component!(Simple2DRenderCall, 21, "Simple2DRenderCall");

/// Spawn an entity with a UI rectangle sized to the shape and the shape itself.
pub fn make_simple_2d_shape(
    world: &mut World,
    shape: Shape2D,
    width: f32,
    height: f32,
    colors: Vec3,
) -> Result<Entity, WorldError> {
    let entity = world.spawn();
    let mut ui = UiComponent::default();
    ui.set_width(width);
    ui.set_height(height);
    world.attach(entity, ui)?;
    world.attach(entity, Simple2DObject::new(shape, width, height, colors))?;
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::serialization::{deserialize_node, serialize_node};
    use serde_json::json;

    #[test]
    fn simple_object_round_trips() {
        let object = Simple2DObject::new(Shape2D::Circle, 12.0, 8.0, Vec3::new(0.5, 0.25, 1.0));
        let node = serialize_node("Shape 2D", &object).unwrap();
        assert_eq!(
            node,
            json!({ "shape": "Circle", "size": [12.0, 8.0], "colors": [0.5, 0.25, 1.0] })
        );

        let back: Simple2DObject = deserialize_node("Shape 2D", Some(&node));
        assert_eq!(back, object);
    }

    #[test]
    fn unknown_shape_names_become_none() {
        let node = json!({ "shape": "Hexagon", "size": [1.0, 2.0], "colors": [0.0, 0.0, 0.0] });
        let object: Simple2DObject = deserialize_node("Shape 2D", Some(&node));
        assert_eq!(object.shape, Shape2D::None);
        assert_eq!((object.width, object.height), (1.0, 2.0));
    }

    #[test]
    fn null_shape_and_missing_fields_default() {
        let node = json!({ "shape": null });
        let object: Simple2DObject = deserialize_node("Shape 2D", Some(&node));
        assert_eq!(object, Simple2DObject::default());
    }

    #[test]
    fn one_malformed_field_keeps_the_others() {
        let node = json!({ "shape": "Square", "size": [1.0], "colors": [1.0, 0.0, 0.0] });
        let object: Simple2DObject = deserialize_node("Shape 2D", Some(&node));
        assert_eq!(object, Simple2DObject::new(Shape2D::Square, 0.0, 0.0, Vec3::X));

        let node = json!({ "shape": 5, "size": [3.0, 4.0] });
        let object: Simple2DObject = deserialize_node("Shape 2D", Some(&node));
        assert_eq!(object, Simple2DObject::new(Shape2D::None, 3.0, 4.0, Vec3::ZERO));
    }

    #[test]
    fn make_shape_sizes_the_ui_rect() {
        let mut world = World::new();
        let entity =
            make_simple_2d_shape(&mut world, Shape2D::Square, 40.0, 20.0, Vec3::ONE).unwrap();

        let ui = world.get::<UiComponent>(entity).unwrap();
        assert_eq!((ui.width, ui.height), (40.0, 20.0));
        assert_eq!(world.get::<Simple2DObject>(entity).unwrap().shape, Shape2D::Square);
    }
}
