use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn in_bounds(world: &World, entity: &Entity) -> bool {
    entity.x < world.width() && entity.y < world.height()
}

#[test]
fn test_first_advance_spawns_entity_in_bounds() {
    let world = World::new(500, 500);
    assert!(world.get("a").is_none());

    let entity = world.advance("a");

    assert!(in_bounds(&world, &entity));
    assert_eq!(world.get("a"), Some(entity));
    assert_eq!(world.len(), 1);
}

#[test]
fn test_second_advance_moves_one_unit_along_new_heading() {
    let world = World::new(500, 500);

    let first = world.advance("a");
    let second = world.advance("a");

    assert!(in_bounds(&world, &second));

    // Replaying the chosen heading's delta from the first position must land
    // exactly on the second position.
    let (dx, dy) = second.heading.delta();
    let expected_x = (i64::from(first.x) + dx).rem_euclid(500) as u32;
    let expected_y = (i64::from(first.y) + dy).rem_euclid(500) as u32;
    assert_eq!((second.x, second.y), (expected_x, expected_y));

    // Exactly one axis changed
    assert!((first.x != second.x) ^ (first.y != second.y));
}

#[test]
fn test_coordinates_never_leave_grid() {
    // A tiny grid forces constant wrapping in every direction.
    let world = World::new(3, 2);
    let mut rng = StdRng::seed_from_u64(99);

    for round in 0..20_000 {
        let id = format!("entity_{}", round % 7);
        let entity = world.advance_with(&id, &mut rng);
        assert!(in_bounds(&world, &entity), "out of bounds: {:?}", entity);
    }
}

#[test]
fn test_single_cell_world() {
    let world = World::new(1, 1);
    for _ in 0..100 {
        let entity = world.advance("solo");
        assert_eq!((entity.x, entity.y), (0, 0));
    }
}

#[test]
fn test_zero_dimensions_are_clamped() {
    let world = World::new(0, 0);
    assert_eq!(world.width(), 1);
    assert_eq!(world.height(), 1);
    let entity = world.advance("a");
    assert!(in_bounds(&world, &entity));
}

#[test]
fn test_turn_distribution_matches_weights() {
    let world = World::new(500, 500);
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 100_000;

    let mut previous = world.advance_with("walker", &mut rng).heading;
    // Index = quarter turns clockwise relative to the previous heading
    let mut counts = [0u32; 4];
    for _ in 0..trials {
        let next = world.advance_with("walker", &mut rng).heading;
        let relative = (next as i32 - previous as i32).rem_euclid(4) as usize;
        counts[relative] += 1;
        previous = next;
    }

    let share = |n: u32| f64::from(n) / f64::from(trials);
    // keep, right (+1), reverse (+2), left (-1 == +3)
    assert!((share(counts[0]) - 0.70).abs() < 0.01, "keep {:?}", counts);
    assert!((share(counts[1]) - 0.10).abs() < 0.01, "right {:?}", counts);
    assert!((share(counts[2]) - 0.10).abs() < 0.01, "reverse {:?}", counts);
    assert!((share(counts[3]) - 0.10).abs() < 0.01, "left {:?}", counts);
}

#[test]
fn test_remove_prunes_entity() {
    let world = World::new(500, 500);
    world.advance("a");
    world.advance("b");

    assert!(world.remove("a").is_some());
    assert!(world.remove("a").is_none());
    assert_eq!(world.len(), 1);
    assert!(world.get("b").is_some());
}

#[test]
fn test_concurrent_advances_lose_no_updates() {
    let world = Arc::new(World::new(500, 500));
    let mut handles = vec![];

    // Each thread drives its own entity; a second step after spawn must always
    // see the spawned entity, so every thread ends with exactly one entity.
    for i in 0..10 {
        let world_clone = Arc::clone(&world);
        handles.push(thread::spawn(move || {
            let id = format!("entity_{}", i);
            for _ in 0..500 {
                let entity = world_clone.advance(&id);
                assert!(entity.x < 500 && entity.y < 500);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(world.len(), 10);
}

#[test]
fn test_concurrent_advances_on_shared_entity() {
    let world = Arc::new(World::new(50, 50));
    let mut handles = vec![];

    for _ in 0..8 {
        let world_clone = Arc::clone(&world);
        handles.push(thread::spawn(move || {
            for _ in 0..1_000 {
                world_clone.advance("shared");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let entity = world.get("shared").unwrap();
    assert!(entity.x < 50 && entity.y < 50);
    assert_eq!(world.len(), 1);
}
