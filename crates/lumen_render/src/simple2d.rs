//! Render-submission cache for [`Simple2DObject`] shapes.
//!
//! Entities joining the UI + shape group get a [`Simple2DRenderCall`]
//! holding their record; leaving the group detaches it. Any membership
//! change, or an [`EntityChanged`] for a cached entity, sets the dirty flag.
//! `execute` rebuilds the whole list only when dirty, then submits it.

use crate::backend::RenderBackend;
use crate::material::{Material, MaterialId, RenderStage};
use crate::render_call::RenderCall;
use crate::shape::{Simple2DObject, Simple2DRenderCall};
use lumen_core::ecs::{Entity, EntityChanged, Event, GroupHandle, InitContext, System, World};
use lumen_core::ui::UiComponent;
use tracing::{debug, info, warn};

pub const SHAPE_SHADER: &str = "2DShapes";

/// Material used by every simple 2D shape.
pub fn shape_material() -> Material {
    Material {
        nb_attributes: 8,
        nb_textures: 0,
        mesh_layout: vec![3, 2, 3],
        ..Material::new(SHAPE_SHADER)
    }
    .with_uniform("sWidth", "ScreenWidth")
    .with_uniform("sHeight", "ScreenHeight")
}

pub struct Simple2DObjectSystem<R: RenderBackend> {
    backend: R,
    stage: RenderStage,
    material: MaterialId,
    group: Option<GroupHandle>,
    calls: Vec<RenderCall>,
    dirty: bool,
    revision: u64,
}

impl<R: RenderBackend> Simple2DObjectSystem<R> {
    pub fn new(backend: R, stage: RenderStage) -> Self {
        Self {
            backend,
            stage,
            material: MaterialId::UNREGISTERED,
            group: None,
            calls: Vec::new(),
            dirty: false,
            revision: 0,
        }
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of rebuilds so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn create_render_call(&self, ui: &UiComponent, shape: &Simple2DObject) -> RenderCall {
        let mut call = RenderCall::from_ui(ui, self.material, self.stage);
        call.instance.color = shape.colors.to_array();
        call
    }

    fn cached_call(&self, world: &World, entity: Entity) -> Option<RenderCall> {
        let ui = world.get::<UiComponent>(entity)?;
        let shape = world.get::<Simple2DObject>(entity)?;
        Some(self.create_render_call(ui, shape))
    }

    fn rebuild(&mut self, world: &World) {
        self.calls.clear();
        self.calls.reserve(world.count::<Simple2DRenderCall>());
        self.calls
            .extend(world.view::<Simple2DRenderCall>().map(|(_, cached)| cached.0));
        self.revision += 1;
        self.dirty = false;
        debug!(revision = self.revision, count = self.calls.len(), "render calls rebuilt");
    }
}

impl<R: RenderBackend> System for Simple2DObjectSystem<R> {
    fn name(&self) -> &str {
        "Simple2DObjectSystem"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) {
        self.material = self.backend.register_material(shape_material());
        info!(material = %self.material, stage = self.stage.0, "simple 2D shapes ready");
        self.group = Some(ctx.register_group::<(UiComponent, Simple2DObject)>());
    }

    fn on_group_add(&mut self, world: &mut World, _group: GroupHandle, entity: Entity) {
        let Some(call) = self.cached_call(world, entity) else {
            debug_assert!(false, "{entity} joined the shape group without its components");
            return;
        };
        debug!(%entity, "shape added");
        if let Err(error) = world.attach(entity, Simple2DRenderCall(call)) {
            warn!(%error, "could not cache render call");
        }
        self.mark_dirty();
    }

    fn on_group_remove(&mut self, world: &mut World, _group: GroupHandle, entity: Entity) {
        debug!(%entity, "shape removed");
        if world.contains(entity) {
            if let Err(error) = world.detach::<Simple2DRenderCall>(entity) {
                warn!(%error, "could not drop cached render call");
            }
        }
        self.mark_dirty();
    }

    fn on_event(&mut self, world: &mut World, event: &Event) {
        let Some(&EntityChanged { id }) = event.get::<EntityChanged>() else {
            return;
        };
        if !world.has::<Simple2DRenderCall>(id) {
            return;
        }
        let Some(call) = self.cached_call(world, id) else {
            return;
        };
        if let Some(cached) = world.get_mut::<Simple2DRenderCall>(id) {
            cached.0 = call;
        }
        self.mark_dirty();
    }

    fn execute(&mut self, world: &mut World) {
        if self.dirty {
            self.rebuild(world);
        }
        self.backend.submit(self.revision, &self.calls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingRenderer;
    use crate::shape::{make_simple_2d_shape, Shape2D};
    use glam::Vec3;
    use lumen_core::ecs::Scheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Scheduler, Rc<RefCell<RecordingRenderer>>) {
        let renderer = Rc::new(RefCell::new(RecordingRenderer::new()));
        let mut scheduler = Scheduler::new();
        scheduler
            .register(Simple2DObjectSystem::new(Rc::clone(&renderer), RenderStage(2)))
            .unwrap();
        (scheduler, renderer)
    }

    #[test]
    fn init_registers_the_shape_material() {
        let (_scheduler, renderer) = setup();
        let renderer = renderer.borrow();
        let material = renderer.material(MaterialId(0)).unwrap();
        assert_eq!(material.shader, "2DShapes");
        assert_eq!(material.nb_attributes, 8);
        assert_eq!(material.nb_textures, 0);
        assert_eq!(material.mesh_layout, vec![3, 2, 3]);
        assert_eq!(material.uniforms["sWidth"], "ScreenWidth");
        assert_eq!(material.uniforms["sHeight"], "ScreenHeight");
    }

    #[test]
    fn group_membership_drives_the_marker() {
        let (mut scheduler, _renderer) = setup();
        let entity = make_simple_2d_shape(
            scheduler.world_mut(),
            Shape2D::Triangle,
            10.0,
            10.0,
            Vec3::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        scheduler.flush();

        let cached = scheduler.world().get::<Simple2DRenderCall>(entity).unwrap();
        assert_eq!(cached.0.instance.color, [1.0, 0.0, 0.0]);
        assert_eq!(cached.0.material, MaterialId(0));
        assert_eq!(cached.0.stage, RenderStage(2));

        scheduler.world_mut().detach::<Simple2DObject>(entity).unwrap();
        scheduler.flush();
        assert!(!scheduler.world().has::<Simple2DRenderCall>(entity));
    }

    #[test]
    fn idle_frames_do_not_rebuild() {
        let (mut scheduler, renderer) = setup();
        make_simple_2d_shape(scheduler.world_mut(), Shape2D::Square, 5.0, 5.0, Vec3::ONE)
            .unwrap();

        scheduler.run_frame();
        assert_eq!(renderer.borrow().revision(), Some(1));
        assert_eq!(renderer.borrow().calls().len(), 1);

        for _ in 0..5 {
            scheduler.run_frame();
        }
        assert_eq!(renderer.borrow().revision(), Some(1));
        assert_eq!(renderer.borrow().uploads(), 1);
        assert_eq!(renderer.borrow().frames(), 6);
    }
}
