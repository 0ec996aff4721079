use crate::ecs::{
    GroupHandle, GroupTransition, InitContext, System, SystemHandle, SystemRegistrationError,
    World,
};
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

/// Owns the world and the ordered list of systems, and drives frames.
///
/// Between any two system steps the scheduler drains the world's queues:
/// group transitions go to the system that owns the group, then events go to
/// every system, until both queues are empty.
pub struct Scheduler {
    world: World,
    systems: Vec<RegisteredSystem>,
    name_lookup: HashMap<String, SystemHandle>,
    group_owners: HashMap<GroupHandle, SystemHandle>,
    frame: u64,
}

struct RegisteredSystem {
    name: String,
    system: Box<dyn System>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_world(World::new())
    }

    pub fn with_world(world: World) -> Self {
        Self {
            world,
            systems: Vec::new(),
            name_lookup: HashMap::new(),
            group_owners: HashMap::new(),
            frame: 0,
        }
    }

    /// Initialise and append a system. Systems execute in registration order.
    pub fn register<S: System + 'static>(
        &mut self,
        mut system: S,
    ) -> Result<SystemHandle, SystemRegistrationError> {
        let name = system.name().to_string();
        if self.name_lookup.contains_key(&name) {
            return Err(SystemRegistrationError::DuplicateName { name });
        }

        let handle = SystemHandle::new(self.systems.len() as u32);

        let mut ctx = InitContext::new(&mut self.world);
        system.init(&mut ctx);
        for group in ctx.into_claimed() {
            if let Some(previous) = self.group_owners.insert(group, handle) {
                if previous != handle {
                    warn!(
                        %group,
                        previous = %self.systems[previous.index() as usize].name,
                        system = %name,
                        "group handlers replaced"
                    );
                }
            }
        }

        info!(system = %name, %handle, "system registered");
        self.name_lookup.insert(name.clone(), handle);
        self.systems.push(RegisteredSystem {
            name,
            system: Box::new(system),
        });

        // Deliver backfilled transitions right away.
        self.flush();
        Ok(handle)
    }

    /// Run one frame: every system's `execute`, each followed by a flush.
    pub fn run_frame(&mut self) {
        self.flush();
        for index in 0..self.systems.len() {
            trace!(frame = self.frame, system = %self.systems[index].name, "execute");
            self.systems[index].system.execute(&mut self.world);
            self.flush();
        }
        self.frame += 1;
    }

    /// Deliver every queued group transition and event.
    pub fn flush(&mut self) {
        loop {
            if let Some(event) = self.world.pop_group_event() {
                let Some(&owner) = self.group_owners.get(&event.group) else {
                    trace!(group = %event.group, "transition without an owner");
                    continue;
                };
                let system = &mut self.systems[owner.index() as usize].system;
                match event.transition {
                    GroupTransition::Added(entity) => {
                        system.on_group_add(&mut self.world, event.group, entity)
                    }
                    GroupTransition::Removed(entity) => {
                        system.on_group_remove(&mut self.world, event.group, entity)
                    }
                }
                continue;
            }

            if let Some(event) = self.world.pop_event() {
                debug!(event = event.name(), "dispatching event");
                for registered in &mut self.systems {
                    registered.system.on_event(&mut self.world, &event);
                }
                continue;
            }

            break;
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutations made here are delivered on the next flush or frame.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Number of frames completed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn lookup(&self, name: &str) -> Option<SystemHandle> {
        self.name_lookup.get(name).copied()
    }

    pub fn group_owner(&self, group: GroupHandle) -> Option<SystemHandle> {
        self.group_owners.get(&group).copied()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_component;
    use crate::ecs::{Entity, Event};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tag;
    define_component!(Tag, 200, "Tag");

    struct Other;
    define_component!(Other, 201, "Other");

    #[derive(Default)]
    struct Log(Vec<String>);

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Log>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&mut self, ctx: &mut InitContext<'_>) {
            ctx.register_group::<(Tag, Other)>();
        }

        fn on_group_add(&mut self, _world: &mut World, _group: GroupHandle, entity: Entity) {
            self.log.borrow_mut().0.push(format!("{}:add:{}", self.name, entity.id()));
        }

        fn on_group_remove(&mut self, _world: &mut World, _group: GroupHandle, entity: Entity) {
            self.log.borrow_mut().0.push(format!("{}:remove:{}", self.name, entity.id()));
        }

        fn on_event(&mut self, _world: &mut World, event: &Event) {
            if let Some(value) = event.get::<u32>() {
                self.log.borrow_mut().0.push(format!("{}:event:{}", self.name, value));
            }
        }

        fn execute(&mut self, world: &mut World) {
            self.log.borrow_mut().0.push(format!("{}:execute", self.name));
            if self.name == "sender" {
                world.send_event(7u32);
            }
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Log>>) -> Recorder {
        Recorder {
            name,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut scheduler = Scheduler::new();
        scheduler.register(recorder("a", &log)).unwrap();
        assert_eq!(
            scheduler.register(recorder("a", &log)),
            Err(SystemRegistrationError::DuplicateName {
                name: "a".to_string()
            })
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn transitions_reach_the_owner_before_the_next_step() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut scheduler = Scheduler::new();
        scheduler.register(recorder("sender", &log)).unwrap();

        let world = scheduler.world_mut();
        let e = world.spawn();
        world.attach(e, Tag).unwrap();
        world.attach(e, Other).unwrap();
        scheduler.run_frame();

        world_detach_other(&mut scheduler, e);
        scheduler.run_frame();

        assert_eq!(
            log.borrow().0,
            vec![
                "sender:add:1",
                "sender:execute",
                "sender:event:7",
                "sender:remove:1",
                "sender:execute",
                "sender:event:7",
            ]
        );
        assert_eq!(scheduler.frame(), 2);
    }

    fn world_detach_other(scheduler: &mut Scheduler, entity: Entity) {
        scheduler.world_mut().detach::<Other>(entity).unwrap();
    }

    #[test]
    fn later_registration_takes_over_the_group() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut scheduler = Scheduler::new();
        let first = scheduler.register(recorder("first", &log)).unwrap();
        let second = scheduler.register(recorder("second", &log)).unwrap();
        assert_ne!(first, second);

        let world = scheduler.world_mut();
        let e = world.spawn();
        world.attach(e, Tag).unwrap();
        world.attach(e, Other).unwrap();
        scheduler.flush();

        assert_eq!(log.borrow().0, vec!["second:add:1"]);
        let group = scheduler.world_mut().register_group::<(Tag, Other)>();
        assert_eq!(scheduler.group_owner(group), Some(second));
        assert_eq!(scheduler.lookup("first"), Some(first));
    }

    #[test]
    fn backfill_is_delivered_on_registration() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut scheduler = Scheduler::new();
        let world = scheduler.world_mut();
        let e = world.spawn();
        world.attach(e, Tag).unwrap();
        world.attach(e, Other).unwrap();

        scheduler.register(recorder("late", &log)).unwrap();
        assert_eq!(log.borrow().0, vec!["late:add:1"]);
    }
}
