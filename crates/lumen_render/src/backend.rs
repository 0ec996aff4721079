//! Rendering backend abstraction
//!
//! Systems register materials once and submit their record list every
//! frame along with a revision number. The revision only changes when the
//! list was rebuilt, so a backend can skip re-uploading identical data.

use crate::material::{Material, MaterialId};
use crate::render_call::RenderCall;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, trace};

pub trait RenderBackend {
    fn register_material(&mut self, material: Material) -> MaterialId;

    fn submit(&mut self, revision: u64, calls: &[RenderCall]);
}

impl<T: RenderBackend> RenderBackend for Rc<RefCell<T>> {
    fn register_material(&mut self, material: Material) -> MaterialId {
        self.borrow_mut().register_material(material)
    }

    fn submit(&mut self, revision: u64, calls: &[RenderCall]) {
        self.borrow_mut().submit(revision, calls)
    }
}

/// Headless backend that keeps the latest submitted list.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    materials: Vec<Material>,
    frames: u64,
    uploads: u64,
    revision: Option<u64>,
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Number of `submit` calls.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of submissions that carried a new revision.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }
}

impl RenderBackend for RecordingRenderer {
    fn register_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        info!(%id, shader = %material.shader, "material registered");
        self.materials.push(material);
        id
    }

    fn submit(&mut self, revision: u64, calls: &[RenderCall]) {
        self.frames += 1;
        if self.revision == Some(revision) {
            return;
        }
        trace!(revision, count = calls.len(), "uploading render calls");
        self.revision = Some(revision);
        self.calls = calls.to_vec();
        self.uploads += 1;
    }
}
