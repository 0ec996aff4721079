//! Group membership against ground truth over a long mutation sequence.

use lumen_core::define_component;
use lumen_core::ecs::{Component, Entity, GroupHandle, GroupTransition, World};
use std::collections::{BTreeSet, HashMap};

struct A;
define_component!(A, 300, "A");

struct B;
define_component!(B, 301, "B");

struct C;
define_component!(C, 302, "C");

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn has_all(world: &World, entity: Entity, ids: &[u32]) -> bool {
    ids.iter().all(|&id| match id {
        300 => world.has::<A>(entity),
        301 => world.has::<B>(entity),
        _ => world.has::<C>(entity),
    })
}

#[test]
fn membership_matches_ground_truth() {
    let mut world = World::new();
    let groups: Vec<(GroupHandle, Vec<u32>)> = vec![
        (world.register_group::<(A, B)>(), vec![A::ID, B::ID]),
        (world.register_group::<(B, C)>(), vec![B::ID, C::ID]),
        (world.register_group::<(A, B, C)>(), vec![A::ID, B::ID, C::ID]),
        (world.register_group::<(C,)>(), vec![C::ID]),
    ];
    let mut observed: HashMap<GroupHandle, BTreeSet<Entity>> = HashMap::new();
    let mut live: Vec<Entity> = Vec::new();
    let mut rng = Lcg(0x5eed);

    for step in 0..2_000 {
        if live.is_empty() || rng.below(10) == 0 {
            live.push(world.spawn());
        }
        let entity = live[rng.below(live.len())];
        match rng.below(7) {
            0 => world.attach(entity, A).unwrap(),
            1 => world.attach(entity, B).unwrap(),
            2 => world.attach(entity, C).unwrap(),
            3 => drop(world.detach::<A>(entity).unwrap()),
            4 => drop(world.detach::<B>(entity).unwrap()),
            5 => drop(world.detach::<C>(entity).unwrap()),
            _ => {
                world.despawn(entity).unwrap();
                live.retain(|&e| e != entity);
            }
        }

        while let Some(event) = world.pop_group_event() {
            let members = observed.entry(event.group).or_default();
            match event.transition {
                GroupTransition::Added(e) => {
                    assert!(members.insert(e), "step {step}: duplicate add for {e}")
                }
                GroupTransition::Removed(e) => {
                    assert!(members.remove(&e), "step {step}: remove without add for {e}")
                }
            }
        }

        for (group, ids) in &groups {
            let truth: BTreeSet<Entity> = live
                .iter()
                .copied()
                .filter(|&e| has_all(&world, e, ids))
                .collect();
            let registry: BTreeSet<Entity> = world.groups().members(*group).collect();
            let seen = observed.get(group).cloned().unwrap_or_default();
            assert_eq!(registry, truth, "step {step}: registry drifted for {group}");
            assert_eq!(seen, truth, "step {step}: callbacks drifted for {group}");
        }
    }
}

#[test]
fn reattaching_the_same_type_is_not_a_transition() {
    let mut world = World::new();
    let group = world.register_group::<(A, B)>();
    let entity = world.spawn();
    world.attach(entity, A).unwrap();
    world.attach(entity, B).unwrap();
    assert_eq!(world.pending_group_events(), 1);

    world.attach(entity, B).unwrap();
    world.attach(entity, A).unwrap();
    assert_eq!(world.pending_group_events(), 1);
    assert!(world.is_member(group, entity));
}
