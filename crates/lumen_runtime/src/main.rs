//! Lumen Runtime
//!
//! Boots the scheduler with the click and shape systems and drives a short
//! headless session from scripted input.
//!
//! Usage: `lumen [settings.json]`

use anyhow::{Context, Result};
use glam::Vec3;
use lumen_core::ecs::{Event, Scheduler, System, World};
use lumen_core::ui::UiComponent;
use lumen_render::{
    make_simple_2d_shape, RecordingRenderer, RenderStage, Shape2D, Simple2DObjectSystem,
};
use lumen_services::{
    InputState, MouseButton, MouseClickSystem, MouseLeftClick, MouseRightClick, MouseStateTrigger,
    OnMouseClick, Settings,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Logs generic click events.
struct ClickLogger;

impl System for ClickLogger {
    fn name(&self) -> &str {
        "ClickLogger"
    }

    fn on_event(&mut self, _world: &mut World, event: &Event) {
        if let Some(click) = event.get::<OnMouseClick>() {
            info!(button = ?click.button, x = click.pos.x, y = click.pos.y, "mouse click");
        }
    }

    fn execute(&mut self, _world: &mut World) {}
}

/// One scripted input step applied before a frame.
enum Step {
    Move(f32, f32),
    Press(MouseButton),
    Release(MouseButton),
    Idle,
}

fn spawn_button(world: &mut World, x: f32, y: f32, z: i32, color: Vec3) -> Result<()> {
    let entity = make_simple_2d_shape(world, Shape2D::Square, 120.0, 40.0, color)?;
    if let Some(ui) = world.get_mut::<UiComponent>(entity) {
        ui.set_pos(x, y);
        ui.set_z(z);
    }
    world.mark_changed(entity)?;
    world.attach(
        entity,
        MouseLeftClick::new(MouseStateTrigger::OnPress, |world, entity| {
            info!(%entity, "button pressed");
            if let Some(ui) = world.get_mut::<UiComponent>(entity) {
                ui.set_z(ui.z + 1);
            }
            if let Err(error) = world.mark_changed(entity) {
                warn!(%error, "press on a stale button");
            }
        }),
    )?;
    world.attach(
        entity,
        MouseRightClick::new(MouseStateTrigger::OnRelease, |world, entity| {
            info!(%entity, "button dismissed");
            if let Err(error) = world.despawn(entity) {
                warn!(%error, "button already gone");
            }
        }),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Lumen v{}", lumen_core::VERSION);

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };
    info!(
        title = %settings.window.title,
        width = settings.window.width,
        height = settings.window.height,
        "settings"
    );

    let input = Rc::new(RefCell::new(InputState::new()));
    let renderer = Rc::new(RefCell::new(RecordingRenderer::new()));

    let mut scheduler = Scheduler::new();
    scheduler.register(MouseClickSystem::new(Rc::clone(&input), &settings.input))?;
    scheduler.register(Simple2DObjectSystem::new(Rc::clone(&renderer), RenderStage(0)))?;
    scheduler.register(ClickLogger)?;

    let world = scheduler.world_mut();
    spawn_button(world, 40.0, 40.0, 0, Vec3::new(0.8, 0.2, 0.2))?;
    spawn_button(world, 100.0, 60.0, 1, Vec3::new(0.2, 0.8, 0.2))?;
    spawn_button(world, 40.0, 200.0, 0, Vec3::new(0.2, 0.2, 0.8))?;

    let script = [
        Step::Idle,
        Step::Move(110.0, 70.0),
        Step::Press(MouseButton::Left),
        Step::Release(MouseButton::Left),
        Step::Idle,
        Step::Move(50.0, 210.0),
        Step::Press(MouseButton::Right),
        Step::Release(MouseButton::Right),
        Step::Idle,
    ];

    for step in script {
        {
            let mut input = input.borrow_mut();
            match step {
                Step::Move(x, y) => input.set_pointer(x, y),
                Step::Press(button) => input.press(button),
                Step::Release(button) => input.release(button),
                Step::Idle => {}
            }
        }
        scheduler.run_frame();
    }

    let renderer = renderer.borrow();
    info!(
        frames = scheduler.frame(),
        uploads = renderer.uploads(),
        shapes = renderer.calls().len(),
        entities = scheduler.world().entity_count(),
        "session finished"
    );

    Ok(())
}
