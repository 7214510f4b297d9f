#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-step navigation over the toroidal map.
//!
//! The navigator proposes at most two directions that shorten the wraparound
//! distance to a destination and returns the first one whose target cell is
//! not marked occupied. It never plans further than one step, does not reserve
//! the cell it picks, and does not coordinate with other callers in the same
//! turn: two ships deciding from the same occupancy snapshot can still pick
//! the same cell.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tidewrap_core::{Direction, Position};
use tidewrap_world::{GameMap, Torus};
use tracing::trace;

/// Which axis a pair of candidate directions tries first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrder {
    /// East/west before north/south.
    HorizontalFirst,
    /// North/south before east/west.
    VerticalFirst,
}

impl AxisOrder {
    /// Picks an order with a fair coin.
    pub fn flip<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if rng.gen_bool(0.5) {
            Self::HorizontalFirst
        } else {
            Self::VerticalFirst
        }
    }
}

/// Directions that shorten the distance from `source` to `destination`,
/// ignoring occupancy.
///
/// Each axis contributes the direction along the shorter way around the
/// torus, or [`Direction::Still`] when source and destination already share
/// that coordinate. An exact tie goes east on the x axis and south on the y
/// axis. Both entries are always present.
#[must_use]
pub fn unsafe_moves(
    torus: &Torus,
    source: Position,
    destination: Position,
    order: AxisOrder,
) -> [Direction; 2] {
    let source = torus.normalize(source);
    let destination = torus.normalize(destination);

    let horizontal = axis_direction(
        source.x(),
        destination.x(),
        torus.width(),
        Direction::West,
        Direction::East,
    );
    let vertical = axis_direction(
        source.y(),
        destination.y(),
        torus.height(),
        Direction::North,
        Direction::South,
    );

    match order {
        AxisOrder::HorizontalFirst => [horizontal, vertical],
        AxisOrder::VerticalFirst => [vertical, horizontal],
    }
}

fn axis_direction(
    from: i32,
    to: i32,
    extent: i32,
    decreasing: Direction,
    increasing: Direction,
) -> Direction {
    if from == to {
        return Direction::Still;
    }

    let direct = from.abs_diff(to);
    let wrapped = extent.unsigned_abs() - direct;
    let (increasing_steps, decreasing_steps) = if from < to {
        (direct, wrapped)
    } else {
        (wrapped, direct)
    };

    if decreasing_steps < increasing_steps {
        decreasing
    } else {
        increasing
    }
}

/// Greedy single-step navigator with an injected randomness source.
#[derive(Debug)]
pub struct Navigator<R = ChaCha8Rng> {
    rng: R,
}

impl Navigator<ChaCha8Rng> {
    /// Creates a navigator whose axis order is reproducible from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R> Navigator<R>
where
    R: Rng,
{
    /// Creates a navigator drawing its coin flips from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Candidate directions toward `destination` in a freshly flipped order.
    pub fn candidate_directions(
        &mut self,
        map: &GameMap,
        source: Position,
        destination: Position,
    ) -> [Direction; 2] {
        let order = AxisOrder::flip(&mut self.rng);
        unsafe_moves(map.torus(), source, destination, order)
    }

    /// First candidate move whose target cell is unoccupied, or
    /// [`Direction::Still`] when every candidate is blocked.
    pub fn navigate(
        &mut self,
        map: &GameMap,
        source: Position,
        destination: Position,
    ) -> Direction {
        let candidates = self.candidate_directions(map, source, destination);
        let chosen = first_safe(map, source, candidates);
        if chosen == Direction::Still && map.normalize(source) != map.normalize(destination) {
            trace!(%source, %destination, ?candidates, "no safe step, holding position");
        }
        chosen
    }
}

/// First moving direction in `candidates` whose target cell is not occupied.
///
/// A `Still` candidate only means its axis is already aligned. It is never
/// picked over a free move, and it is the fallback when every move is blocked.
#[must_use]
pub fn first_safe(map: &GameMap, source: Position, candidates: [Direction; 2]) -> Direction {
    candidates
        .into_iter()
        .filter(|direction| *direction != Direction::Still)
        .find(|direction| !map.at_wrapped(source.offset(*direction)).is_occupied())
        .unwrap_or(Direction::Still)
}
