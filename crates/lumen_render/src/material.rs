//! Material descriptors handed to the backend at registration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Backend-assigned material handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Placeholder held until a material is registered.
    pub const UNREGISTERED: Self = Self(u32::MAX);
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Material({})", self.0)
    }
}

/// Render pass ordering key; lower stages are drawn first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RenderStage(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpacityType {
    #[default]
    Opaque,
    Additive,
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Shader name resolved by the backend.
    pub shader: String,
    /// Floats per instance.
    pub nb_attributes: usize,
    pub nb_textures: usize,
    /// Shader uniform name to engine-provided value name.
    pub uniforms: BTreeMap<String, String>,
    /// Per-instance attribute widths, in floats.
    pub mesh_layout: Vec<usize>,
}

impl Material {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            nb_attributes: 0,
            nb_textures: 0,
            uniforms: BTreeMap::new(),
            mesh_layout: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_uniform(mut self, uniform: impl Into<String>, source: impl Into<String>) -> Self {
        self.uniforms.insert(uniform.into(), source.into());
        self
    }
}
