use std::collections::HashSet;

use tidewrap_core::{Direction, EntityId, Position};
use tidewrap_system_navigation::{first_safe, unsafe_moves, AxisOrder, Navigator};
use tidewrap_world::GameMap;

fn empty_map(width: i32, height: i32) -> GameMap {
    GameMap::new(width, height).expect("map")
}

#[test]
fn wraparound_candidates_pick_the_one_step_direction() {
    let map = empty_map(10, 10);
    let source = Position::new(0, 0);
    let destination = Position::new(9, 0);
    let mut orders = HashSet::new();

    for seed in 0..64 {
        let mut navigator = Navigator::seeded(seed);
        let candidates = navigator.candidate_directions(&map, source, destination);

        assert!(
            candidates.contains(&Direction::West),
            "seed {seed} produced {candidates:?}"
        );
        assert!(candidates.contains(&Direction::Still));
        let _ = orders.insert(candidates);
    }

    assert_eq!(
        orders,
        HashSet::from([
            [Direction::West, Direction::Still],
            [Direction::Still, Direction::West],
        ]),
        "both axis orders should appear across repeated calls"
    );
}

#[test]
fn candidates_always_shorten_the_distance() {
    let map = empty_map(7, 5);
    let mut navigator = Navigator::seeded(11);

    for source in map.torus().positions() {
        for destination in map.torus().positions() {
            let before = map.distance(source, destination);
            for direction in navigator.candidate_directions(&map, source, destination) {
                if direction == Direction::Still {
                    continue;
                }
                let after = map.distance(source.offset(direction), destination);
                assert_eq!(
                    after + 1,
                    before,
                    "{direction:?} from {source} did not approach {destination}"
                );
            }
        }
    }
}

#[test]
fn navigate_takes_a_free_single_step() {
    let map = empty_map(5, 5);
    for seed in 0..16 {
        let mut navigator = Navigator::seeded(seed);
        let direction = navigator.navigate(&map, Position::new(2, 2), Position::new(2, 1));
        assert_eq!(direction, Direction::North);
    }
}

#[test]
fn navigate_holds_when_every_candidate_is_blocked() {
    let mut map = empty_map(6, 6);
    let source = Position::new(1, 1);
    let destination = Position::new(3, 3);
    map.mark_occupied(Position::new(2, 1), EntityId::new(1));
    map.mark_occupied(Position::new(1, 2), EntityId::new(2));

    for seed in 0..16 {
        let mut navigator = Navigator::seeded(seed);
        assert_eq!(
            navigator.navigate(&map, source, destination),
            Direction::Still
        );
    }
}

#[test]
fn navigate_falls_back_to_the_other_candidate() {
    let mut map = empty_map(6, 6);
    let source = Position::new(1, 1);
    let destination = Position::new(3, 3);
    map.mark_occupied(Position::new(2, 1), EntityId::new(1));

    for seed in 0..16 {
        let mut navigator = Navigator::seeded(seed);
        assert_eq!(
            navigator.navigate(&map, source, destination),
            Direction::South
        );
    }
}

#[test]
fn blocked_check_uses_the_wrapped_target_cell() {
    let mut map = empty_map(4, 4);
    let source = Position::new(0, 0);
    map.mark_occupied(Position::new(3, 0), EntityId::new(5));

    let candidates = unsafe_moves(
        map.torus(),
        source,
        Position::new(3, 3),
        AxisOrder::HorizontalFirst,
    );
    assert_eq!(candidates, [Direction::West, Direction::North]);
    assert_eq!(first_safe(&map, source, candidates), Direction::North);
}

#[test]
fn aligned_destination_holds_when_its_only_move_is_blocked() {
    let mut map = empty_map(5, 5);
    let source = Position::new(1, 1);
    map.mark_occupied(Position::new(2, 1), EntityId::new(3));

    let candidates = unsafe_moves(
        map.torus(),
        source,
        Position::new(3, 1),
        AxisOrder::HorizontalFirst,
    );
    assert_eq!(candidates, [Direction::East, Direction::Still]);
    assert_eq!(first_safe(&map, source, candidates), Direction::Still);
}

#[test]
fn leading_still_candidate_yields_to_a_free_move() {
    let map = empty_map(5, 5);
    let source = Position::new(1, 1);
    let destination = Position::new(3, 1);
    assert!(!map.at(source).is_occupied());

    let candidates = unsafe_moves(map.torus(), source, destination, AxisOrder::VerticalFirst);
    assert_eq!(candidates, [Direction::Still, Direction::East]);
    assert_eq!(first_safe(&map, source, candidates), Direction::East);

    for seed in 0..16 {
        let mut navigator = Navigator::seeded(seed);
        assert_eq!(
            navigator.navigate(&map, source, destination),
            Direction::East
        );
    }
}
