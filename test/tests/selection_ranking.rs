/// Pool ordering: distance ranking, health-state precedence, per-category
/// dedup, range and reference point

use mindlink_client::{policy, Candidate, InputKey, ReferenceMode, SelectionConfig};
use mindlink_shared::{CategoryId, EntityArena, Position};
use mindlink_test::{at, Harness};

fn candidate(
    arena: &EntityArena,
    position: Position,
    category: CategoryId,
    health: bool,
) -> Candidate {
    Candidate {
        entity: arena.spawn(),
        position,
        category,
        alive: true,
        controlled: false,
        has_health_state: health,
    }
}

#[test]
fn health_state_outranks_distance() {
    let arena = EntityArena::new();
    let a = candidate(&arena, at(5.0, 0.0), 1, true);
    let b = candidate(&arena, at(3.0, 0.0), 1, false);
    let c = candidate(&arena, at(0.0, 3.0), 1, true);
    let mut ranked = vec![a.clone(), b.clone(), c.clone()];

    policy::rank_candidates(&mut ranked, &at(0.0, 0.0));

    let order: Vec<_> = ranked.iter().map(|candidate| candidate.entity.clone()).collect();
    assert_eq!(order, vec![c.entity, a.entity, b.entity]);
}

#[test]
fn equal_distances_keep_source_order() {
    let arena = EntityArena::new();
    let first = candidate(&arena, at(0.0, 4.0), 1, true);
    let second = candidate(&arena, at(4.0, 0.0), 2, true);
    let third = candidate(&arena, at(-4.0, 0.0), 3, true);
    let mut ranked = vec![first.clone(), second.clone(), third.clone()];

    policy::rank_candidates(&mut ranked, &at(0.0, 0.0));

    let categories: Vec<_> = ranked.iter().map(|candidate| candidate.category).collect();
    assert_eq!(categories, vec![1, 2, 3]);
}

#[test]
fn dedup_keeps_first_of_each_category() {
    let arena = EntityArena::new();
    let pool = vec![
        candidate(&arena, at(1.0, 0.0), 7, true),
        candidate(&arena, at(2.0, 0.0), 9, true),
        candidate(&arena, at(3.0, 0.0), 7, true),
        candidate(&arena, at(4.0, 0.0), 9, true),
        candidate(&arena, at(5.0, 0.0), 7, true),
    ];
    let expected = vec![pool[0].entity.clone(), pool[1].entity.clone()];

    let deduped = policy::dedup_by_category(pool);

    assert_eq!(deduped.len(), 2);
    let order: Vec<_> = deduped.into_iter().map(|candidate| candidate.entity).collect();
    assert_eq!(order, expected);
}

#[test]
fn pool_is_ranked_and_range_limited() {
    let mut harness = Harness::new(SelectionConfig {
        selection_range: 100.0,
        ..SelectionConfig::default()
    });
    let agent = harness.agent(at(0.0, 0.0));
    let far = harness.world.spawn(at(80.0, 0.0), 1);
    let near = harness.world.spawn(at(10.0, 0.0), 1);
    let bare = harness.world.spawn_with(at(1.0, 0.0), 2, false);
    let _out_of_range = harness.world.spawn(at(150.0, 0.0), 1);

    harness.input.press(&agent, InputKey::Activate);
    harness.tick();

    assert_eq!(harness.pool(&agent), vec![near, far, bare]);
}

#[test]
fn single_representative_mode_dedups_pool() {
    let mut harness = Harness::new(SelectionConfig {
        one_per_category: true,
        ..SelectionConfig::default()
    });
    let agent = harness.agent(at(0.0, 0.0));
    let a_far = harness.world.spawn(at(50.0, 0.0), 1);
    let b_near = harness.world.spawn(at(5.0, 0.0), 2);
    let a_near = harness.world.spawn(at(10.0, 0.0), 1);
    let _b_far = harness.world.spawn(at(60.0, 0.0), 2);
    let _a_mid = harness.world.spawn(at(30.0, 0.0), 1);

    harness.input.press(&agent, InputKey::Activate);
    harness.tick();

    let pool = harness.pool(&agent);
    assert_eq!(pool, vec![b_near, a_near]);
    assert!(!pool.contains(&a_far));
}

#[test]
fn cursor_reference_ranks_from_cursor() {
    let mut harness = Harness::new(SelectionConfig {
        reference: ReferenceMode::Cursor,
        ..SelectionConfig::default()
    });
    let agent = harness.agent(at(0.0, 0.0));
    let by_agent = harness.world.spawn(at(5.0, 0.0), 1);
    let by_cursor = harness.world.spawn(at(200.0, 0.0), 1);
    harness
        .controller
        .with_session_mut(&agent, |session| session.set_cursor(Some(at(195.0, 0.0))));

    harness.input.press(&agent, InputKey::Activate);
    harness.tick();

    assert_eq!(harness.pool(&agent), vec![by_cursor, by_agent]);
}

#[test]
fn cursor_mode_without_cursor_falls_back_to_agent() {
    let mut harness = Harness::new(SelectionConfig {
        reference: ReferenceMode::Cursor,
        ..SelectionConfig::default()
    });
    let agent = harness.agent(at(0.0, 0.0));
    let far = harness.world.spawn(at(200.0, 0.0), 1);
    let near = harness.world.spawn(at(5.0, 0.0), 1);

    harness.input.press(&agent, InputKey::Activate);
    harness.tick();

    assert_eq!(harness.pool(&agent), vec![near, far]);
}
