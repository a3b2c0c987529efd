use super::{golem, Floor, TestWorld};
use crate::ecs::Entity;
use crate::elements::{Category, Element, Outcome, ReactionTable};
use crate::events::{EventType, ReactionEvent};
use crate::foundation::math::{Vec3, WORLD_UP};
use crate::manifestation::{ManifestationSpec, PlacementSettings};
use crate::reactions::{
    validate_authoring, CollisionCoordinator, CoordinatorConfig, NoFloor, PairState, ReactionError,
    Resolution,
};
use approx::assert_relative_eq;

#[test]
fn stone_meets_order_at_rest_manifests_at_midpoint() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::new(0.0, 0.5, 0.0));
    let order = world.add(Element::Order, Category::Order, Vec3::new(1.0, 0.5, 0.0));
    world.edit(stone, |b| b.with_manifestation(golem()));
    let floor = Floor::flat(0.0);
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(stone, order, &mut world, &floor);
    let reaction = resolution.reaction().expect("resolved");

    assert_eq!(reaction.outcome, Outcome::Manifest);
    assert_eq!(reaction.actor, stone);
    assert_eq!(world.spawned.len(), 1);
    assert_eq!(world.spawned[0].prefab_id, "golem");
    assert_relative_eq!(world.spawned[0].transform.position, Vec3::new(0.5, 0.5, 0.0));
    assert_relative_eq!(world.spawned[0].transform.up(), WORLD_UP, epsilon = 1e-6);
    assert!(world.alive().is_empty());
    assert_eq!(reaction.destroyed, vec![stone, order]);

    // At rest: the facing came from the fallback.
    assert!(matches!(reaction.issues.as_slice(), [ReactionError::DegenerateDirection { .. }]));

    // The other side's report of the same contact does nothing.
    let duplicate = coordinator.on_contact_begin(order, stone, &mut world, &floor);
    assert_eq!(duplicate, Resolution::Duplicate);
    assert_eq!(world.spawned.len(), 1);
}

#[test]
fn order_with_lower_id_still_lets_stone_manifest() {
    let mut world = TestWorld::new();
    let order = world.add(Element::Order, Category::Order, Vec3::new(0.0, 0.5, 0.0));
    let stone = world.add(Element::Stone, Category::Order, Vec3::new(1.0, 0.5, 0.0));
    world.edit(stone, |b| b.with_manifestation(golem()));
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(order, stone, &mut world, &Floor::flat(0.0));
    let reaction = resolution.reaction().expect("resolved");

    assert_eq!(reaction.outcome, Outcome::Manifest);
    assert_eq!(reaction.actor, stone);
    assert_eq!(reaction.target, order);
    assert_eq!(world.spawned.len(), 1);
}

#[test]
fn void_erases_chaos_fire_and_survives() {
    for void_first in [true, false] {
        let mut world = TestWorld::new();
        let (void, fire) = if void_first {
            let void = world.add(Element::Void, Category::Void, Vec3::zeros());
            (void, world.add(Element::Fire, Category::Chaos, Vec3::x()))
        } else {
            let fire = world.add(Element::Fire, Category::Chaos, Vec3::x());
            (world.add(Element::Void, Category::Void, Vec3::zeros()), fire)
        };
        let mut coordinator = CollisionCoordinator::default();

        let resolution = coordinator.on_contact_begin(void, fire, &mut world, &NoFloor);
        let reaction = resolution.reaction().expect("resolved");

        assert_eq!(reaction.outcome, Outcome::DestroyOther);
        assert_eq!(reaction.actor, void);
        assert_eq!(world.alive(), vec![void]);
        assert_eq!(world.destroyed, vec![fire]);
    }
}

#[test]
fn void_ignores_balance_category() {
    let mut world = TestWorld::new();
    let void = world.add(Element::Void, Category::Void, Vec3::zeros());
    let fire = world.add(Element::Fire, Category::Balance, Vec3::x());
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(fire, void, &mut world, &NoFloor);

    assert_eq!(resolution.outcome(), Some(Outcome::None));
    assert_eq!(world.alive(), vec![void, fire]);
    assert_eq!(coordinator.pair_state(void, fire), Some(PairState::Resolved { resolved_at: 0.0 }));
}

#[test]
fn order_and_chaos_annihilate() {
    let mut world = TestWorld::new();
    let chaos = world.add(Element::Chaos, Category::Chaos, Vec3::zeros());
    let order = world.add(Element::Order, Category::Order, Vec3::x());
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(order, chaos, &mut world, &NoFloor);

    assert_eq!(resolution.outcome(), Some(Outcome::DestroyBoth));
    assert!(world.alive().is_empty());
    assert!(world.spawned.is_empty());
}

#[test]
fn missing_spec_still_destroys_both() {
    let mut world = TestWorld::new();
    let wind = world.add(Element::Wind, Category::Chaos, Vec3::zeros());
    let chaos = world.add(Element::Chaos, Category::Chaos, Vec3::x());
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(wind, chaos, &mut world, &NoFloor);
    let reaction = resolution.reaction().expect("resolved");

    assert_eq!(reaction.outcome, Outcome::Manifest);
    assert!(world.spawned.is_empty());
    assert!(world.alive().is_empty());
    assert_eq!(
        reaction.issues,
        vec![ReactionError::MissingManifestationSpec { entity: wind, element: Element::Wind }]
    );

    let events = coordinator.dispatch_events();
    assert!(events.iter().any(|e| e.event_type() == EventType::SpawnSkipped));
}

#[test]
fn target_spec_is_used_when_actor_has_none() {
    let mut world = TestWorld::new();
    let ice = world.add(Element::Ice, Category::Order, Vec3::zeros());
    let order = world.add(Element::Order, Category::Order, Vec3::x());
    world.edit(order, |b| b.with_manifestation(ManifestationSpec::single("glacier")));
    let mut coordinator = CollisionCoordinator::default();

    coordinator.on_contact_begin(ice, order, &mut world, &NoFloor);

    assert_eq!(world.spawned.len(), 1);
    assert_eq!(world.spawned[0].prefab_id, "glacier");
}

#[test]
fn invalid_spec_skips_spawn() {
    let mut world = TestWorld::new();
    let water = world.add(Element::Water, Category::Order, Vec3::zeros());
    let order = world.add(Element::Order, Category::Order, Vec3::x());
    world.edit(water, |b| b.with_manifestation(ManifestationSpec::grid("wave", 0, 1, 1.0)));
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(water, order, &mut world, &NoFloor);
    let reaction = resolution.reaction().expect("resolved");

    assert!(world.spawned.is_empty());
    assert!(world.alive().is_empty());
    assert!(matches!(reaction.issues[0], ReactionError::InvalidManifestationSpec { .. }));
}

#[test]
fn grid_manifestation_spawns_every_cell_once() {
    let mut world = TestWorld::new();
    let fire = world.add(Element::Fire, Category::Chaos, Vec3::new(0.0, 0.5, 0.0));
    let chaos = world.add(Element::Chaos, Category::Chaos, Vec3::new(0.0, 0.5, 1.0));
    world.edit(fire, |b| {
        b.with_velocity(Vec3::new(0.0, 0.0, 3.0))
            .with_manifestation(ManifestationSpec::grid("firewall", 3, 2, 1.0))
    });
    let mut coordinator = CollisionCoordinator::default();
    let floor = Floor::flat(0.0);

    coordinator.on_contact_begin(fire, chaos, &mut world, &floor);
    coordinator.on_contact_begin(chaos, fire, &mut world, &floor);

    assert_eq!(world.spawned.len(), 6);
    for spawned in &world.spawned {
        assert_relative_eq!(spawned.transform.forward(), Vec3::z(), epsilon = 1e-6);
    }
    let base = Vec3::new(0.0, 0.0, 0.5) + WORLD_UP * PlacementSettings::default().grid_floor_epsilon;
    assert_relative_eq!(world.spawned[0].transform.position, base, epsilon = 1e-6);
    assert_relative_eq!(
        world.spawned[5].transform.position,
        base + Vec3::z() * 2.0 + WORLD_UP,
        epsilon = 1e-6
    );
}

#[test]
fn sloped_floor_aligns_manifestation() {
    let mut world = TestWorld::new();
    let lightning = world.add(Element::Lightning, Category::Chaos, Vec3::new(0.0, 0.5, 0.0));
    let chaos = world.add(Element::Chaos, Category::Chaos, Vec3::new(1.0, 0.5, 0.0));
    world.edit(lightning, |b| {
        b.with_velocity(Vec3::new(2.0, 0.0, 0.0)).with_manifestation(golem())
    });
    let normal = Vec3::new(-1.0, 2.0, 0.0).normalize();
    let floor = Floor { height: 0.0, normal };
    let mut coordinator = CollisionCoordinator::default();

    coordinator.on_contact_begin(lightning, chaos, &mut world, &floor);

    let transform = world.spawned[0].transform;
    assert!(transform.forward().dot(&normal).abs() < 1e-5);
    assert_relative_eq!(transform.up(), normal, epsilon = 1e-5);
    assert!(transform.forward().y > 0.0);
}

#[test]
fn floor_out_of_range_falls_back_to_world_up() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::new(0.0, 10.0, 0.0));
    let order = world.add(Element::Order, Category::Order, Vec3::new(0.0, 10.0, 1.0));
    world.edit(stone, |b| b.with_manifestation(golem()));
    let tilted = Floor { height: 0.0, normal: Vec3::new(1.0, 1.0, 0.0).normalize() };
    let mut coordinator = CollisionCoordinator::default();

    coordinator.on_contact_begin(stone, order, &mut world, &tilted);

    assert_relative_eq!(world.spawned[0].transform.up(), WORLD_UP, epsilon = 1e-6);
}

#[test]
fn stale_reference_is_a_no_op() {
    let mut world = TestWorld::new();
    let void = world.add(Element::Void, Category::Void, Vec3::zeros());
    let fire = world.add(Element::Fire, Category::Chaos, Vec3::x());
    let ice = world.add(Element::Ice, Category::Order, Vec3::new(2.0, 0.0, 0.0));
    let mut coordinator = CollisionCoordinator::default();

    coordinator.on_contact_begin(void, fire, &mut world, &NoFloor);
    // Fire was erased earlier in the same step; Ice's contact with it is stale.
    let resolution = coordinator.on_contact_begin(ice, fire, &mut world, &NoFloor);

    assert_eq!(resolution, Resolution::Stale(ReactionError::StaleEntityReference(fire)));
    assert_eq!(world.alive(), vec![void, ice]);
    assert_eq!(coordinator.pair_state(ice, fire), Some(PairState::Resolved { resolved_at: 0.0 }));
}

#[test]
fn self_contact_is_ignored() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::zeros());
    let mut coordinator = CollisionCoordinator::default();

    assert_eq!(coordinator.on_contact_begin(stone, stone, &mut world, &NoFloor), Resolution::Ignored);
    assert_eq!(coordinator.tracked_pairs(), 0);
}

#[test]
fn pairs_are_pruned() {
    let mut world = TestWorld::new();
    let shadow = world.add(Element::Shadow, Category::Chaos, Vec3::zeros());
    let light = world.add(Element::Light, Category::Order, Vec3::x());
    let stone = world.add(Element::Stone, Category::Order, Vec3::new(0.0, 0.0, 1.0));
    let ice = world.add(Element::Ice, Category::Order, Vec3::new(0.0, 0.0, 2.0));
    let death = world.add(Element::Death, Category::Chaos, Vec3::new(0.0, 0.0, 3.0));
    let life = world.add(Element::Life, Category::Order, Vec3::new(0.0, 0.0, 4.0));
    let config = CoordinatorConfig { pair_timeout: 1.0, ..Default::default() };
    let mut coordinator =
        CollisionCoordinator::new(ReactionTable::standard(), config, PlacementSettings::default());

    coordinator.on_contact_begin(shadow, light, &mut world, &NoFloor);
    coordinator.on_contact_begin(stone, ice, &mut world, &NoFloor);
    coordinator.on_contact_begin(life, death, &mut world, &NoFloor);
    assert_eq!(coordinator.tracked_pairs(), 3);

    // Shadow/Light and Death/Life annihilated; only the indifferent pair is left.
    coordinator.advance(0.1, &world);
    assert_eq!(coordinator.tracked_pairs(), 1);
    assert!(coordinator.pair_state(stone, ice).is_some());

    coordinator.advance(1.0, &world);
    assert_eq!(coordinator.tracked_pairs(), 0);

    coordinator.on_contact_begin(stone, ice, &mut world, &NoFloor);
    coordinator.on_contact_end(ice, stone);
    assert_eq!(coordinator.tracked_pairs(), 0);

    coordinator.on_contact_begin(stone, ice, &mut world, &NoFloor);
    coordinator.on_entity_destroyed(stone);
    assert!(coordinator.pair_state(stone, ice).is_none());
}

#[test]
fn events_follow_side_effects() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::zeros());
    let order = world.add(Element::Order, Category::Order, Vec3::x());
    world.edit(stone, |b| b.with_velocity(Vec3::x()).with_manifestation(golem()));
    let mut coordinator = CollisionCoordinator::default();

    coordinator.on_contact_begin(order, stone, &mut world, &NoFloor);
    let events = coordinator.dispatch_events();
    let kinds: Vec<_> = events.iter().map(ReactionEvent::event_type).collect();

    assert_eq!(
        kinds,
        vec![
            EventType::Reacted,
            EventType::ManifestationSpawned,
            EventType::EntityDestroyed,
            EventType::EntityDestroyed,
        ]
    );
    assert!(coordinator.dispatch_events().is_empty());
}

#[test]
fn authoring_validation_flags_missing_specs() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::zeros());
    let life = world.add(Element::Life, Category::Order, Vec3::x());
    let table = ReactionTable::standard();

    let boxes: Vec<_> = [stone, life].iter().filter_map(|e| world.boxes.get(e).cloned()).collect();
    assert!(validate_authoring(&table, &boxes).is_err());

    world.edit(stone, |b| b.with_manifestation(golem()));
    let boxes: Vec<_> = [stone, life].iter().filter_map(|e| world.boxes.get(e).cloned()).collect();
    assert!(validate_authoring(&table, &boxes).is_ok());
}

#[test]
fn unknown_entity_resolves_stale() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::zeros());
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(Entity::new(99), stone, &mut world, &NoFloor);
    assert!(matches!(resolution, Resolution::Stale(_)));
    assert_eq!(world.alive(), vec![stone]);
}

#[test]
fn falling_box_manifests_without_rest_issue() {
    let mut world = TestWorld::new();
    let stone = world.add(Element::Stone, Category::Order, Vec3::new(0.0, 1.5, 0.0));
    let order = world.add(Element::Order, Category::Order, Vec3::new(0.0, 0.5, 0.0));
    world.edit(stone, |b| {
        b.with_velocity(Vec3::new(0.0, -5.0, 0.0)).with_manifestation(golem())
    });
    let floor = Floor::flat(0.0);
    let mut coordinator = CollisionCoordinator::default();

    let resolution = coordinator.on_contact_begin(stone, order, &mut world, &floor);
    let reaction = resolution.reaction().expect("resolved");

    assert_eq!(reaction.outcome, Outcome::Manifest);
    assert_eq!(world.spawned.len(), 1);
    assert!(reaction.issues.is_empty(), "{:?}", reaction.issues);
    let forward = world.spawned[0].transform.forward();
    assert!(forward.dot(&WORLD_UP).abs() < 1e-6);
    assert_relative_eq!(forward.norm(), 1.0, epsilon = 1e-6);
}
