//! Render submission records.

use crate::material::{MaterialId, OpacityType, RenderStage};
use lumen_core::ui::{UiComponent, UiRect};

/// Per-instance vertex data, laid out as the shape material's `[3, 2, 3]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub position: [f32; 3],
    pub size: [f32; 2],
    pub color: [f32; 3],
}

/// Flat snapshot of one drawable for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCall {
    pub material: MaterialId,
    pub stage: RenderStage,
    pub opacity: OpacityType,
    pub depth: i32,
    pub clip: Option<UiRect>,
    pub instance: ShapeInstance,
}

impl RenderCall {
    /// Start a record placed by `ui`.
    pub fn from_ui(ui: &UiComponent, material: MaterialId, stage: RenderStage) -> Self {
        Self {
            material,
            stage,
            opacity: OpacityType::Opaque,
            depth: ui.z,
            clip: ui.clip,
            instance: ShapeInstance {
                position: [ui.pos.x, ui.pos.y, ui.z as f32],
                size: [ui.width, ui.height],
                color: [0.0; 3],
            },
        }
    }

    /// Instance attributes as floats.
    pub fn data(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(&self.instance))
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_data_is_eight_floats() {
        let ui = UiComponent::new(1.0, 2.0, 30.0, 40.0).with_z(7);
        let mut call = RenderCall::from_ui(&ui, MaterialId(3), RenderStage(1));
        call.instance.color = [0.1, 0.2, 0.3];

        assert_eq!(call.data(), &[1.0, 2.0, 7.0, 30.0, 40.0, 0.1, 0.2, 0.3]);
        assert_eq!(call.bytes().len(), 8 * std::mem::size_of::<f32>());
        assert_eq!(call.opacity, OpacityType::Opaque);
    }
}
