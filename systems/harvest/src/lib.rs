#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference harvesting system that turns map state into ship orders.
//!
//! The caller must have applied the turn's halite updates and marked every
//! known ship on the map before calling [`Harvest::handle`]. Ships are then
//! processed in identifier order and each committed move updates occupancy
//! immediately, so later ships in the same turn see the cells already
//! claimed.

use std::collections::BTreeSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tidewrap_core::{Command, Direction, EntityId, GameConstants, Player, Position, Ship};
use tidewrap_system_navigation::Navigator;
use tidewrap_world::{query, GameMap};
use tracing::debug;

/// Occupancy marker for the ship a spawn order will place on the shipyard.
const UNBORN_SHIP: EntityId = EntityId::new(u32::MAX);

/// Configuration parameters required to construct the harvesting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    search_radius: u32,
    minimum_cell_halite: u32,
    spawn_turn_limit_percent: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `search_radius` bounds the scan for richer cells, ships keep mining a
    /// cell while it holds at least `minimum_cell_halite`, and spawning stops
    /// once `spawn_turn_limit_percent` of the game has elapsed.
    #[must_use]
    pub const fn new(
        search_radius: u32,
        minimum_cell_halite: u32,
        spawn_turn_limit_percent: u32,
    ) -> Self {
        Self {
            search_radius,
            minimum_cell_halite,
            spawn_turn_limit_percent,
        }
    }

    /// Radius of the richest-cell scan.
    #[must_use]
    pub const fn search_radius(&self) -> u32 {
        self.search_radius
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(8, 100, 50)
    }
}

/// Why a ship received its order this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Intent {
    Unload(Position),
    Mine,
    Stranded,
    Seek(Position),
    Idle,
}

/// Pure system that emits one order per owned ship plus optional spawns.
#[derive(Debug)]
pub struct Harvest<R = ChaCha8Rng> {
    config: Config,
    navigator: Navigator<R>,
    returning: BTreeSet<EntityId>,
}

impl Harvest<ChaCha8Rng> {
    /// Creates a harvesting system with a seeded navigator.
    #[must_use]
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::new(config, Navigator::seeded(seed))
    }
}

impl<R> Harvest<R>
where
    R: Rng,
{
    /// Creates a harvesting system that steers with the provided navigator.
    #[must_use]
    pub fn new(config: Config, navigator: Navigator<R>) -> Self {
        Self {
            config,
            navigator,
            returning: BTreeSet::new(),
        }
    }

    /// Ships currently heading back to a drop point.
    pub fn returning(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.returning.iter().copied()
    }

    /// Emits orders for the player's ships and decides whether to spawn.
    pub fn handle(
        &mut self,
        map: &mut GameMap,
        turn: u32,
        me: &Player,
        constants: &GameConstants,
        out: &mut Vec<Command>,
    ) {
        self.returning
            .retain(|id| me.ships.iter().any(|ship| ship.id == *id));

        let mut ordered: Vec<&Ship> = me.ships.iter().collect();
        ordered.sort_by_key(|ship| ship.id);

        for ship in ordered {
            let intent = self.select_intent(map, me, ship, constants);
            let direction = match intent {
                Intent::Unload(target) | Intent::Seek(target) => {
                    self.navigator.navigate(map, ship.position, target)
                }
                Intent::Mine | Intent::Stranded | Intent::Idle => Direction::Still,
            };

            commit_move(map, ship, direction);
            debug!(ship = ship.id.get(), ?intent, %direction, "ship order");
            out.push(ship.move_toward(direction));
        }

        if self.should_spawn(map, turn, me, constants) {
            let shipyard = me.shipyard.position;
            debug!(turn, halite = me.halite, "spawning ship");
            out.push(me.shipyard.spawn());
            map.mark_occupied(shipyard, UNBORN_SHIP);
        }
    }

    fn select_intent(
        &mut self,
        map: &GameMap,
        me: &Player,
        ship: &Ship,
        constants: &GameConstants,
    ) -> Intent {
        let cell = map.at_wrapped(ship.position);

        if ship.is_full(constants) {
            let _ = self.returning.insert(ship.id);
        }
        if me.drop_points().any(|point| map.normalize(point) == cell.position()) {
            let _ = self.returning.remove(&ship.id);
        }

        let move_cost = cell.halite() / constants.move_cost_ratio.max(1);
        if ship.halite < move_cost {
            return Intent::Stranded;
        }

        if self.returning.contains(&ship.id) {
            if let Some(home) = query::nearest(map, ship.position, me.drop_points()) {
                return Intent::Unload(home);
            }
        }

        if cell.halite() >= self.config.minimum_cell_halite {
            return Intent::Mine;
        }

        query::cells_by_halite(map, ship.position, self.config.search_radius)
            .into_iter()
            .find(|candidate| {
                candidate.position() != cell.position()
                    && !candidate.is_occupied()
                    && candidate.halite() > cell.halite()
            })
            .map_or(Intent::Idle, |candidate| Intent::Seek(candidate.position()))
    }

    fn should_spawn(
        &self,
        map: &GameMap,
        turn: u32,
        me: &Player,
        constants: &GameConstants,
    ) -> bool {
        let last_spawn_turn = u64::from(constants.max_turns)
            * u64::from(self.config.spawn_turn_limit_percent)
            / 100;

        u64::from(turn) <= last_spawn_turn
            && me.halite >= constants.ship_cost
            && !map.at_wrapped(me.shipyard.position).is_occupied()
    }
}

/// Moves the ship's occupancy marker to the cell it will occupy next turn.
fn commit_move(map: &mut GameMap, ship: &Ship, direction: Direction) {
    if direction != Direction::Still {
        map.vacate(ship.position);
    }
    map.mark_occupied(ship.position.offset(direction), ship.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewrap_core::PlayerId;

    #[test]
    fn default_config_scans_eight_cells() {
        assert_eq!(Config::default().search_radius(), 8);
    }

    #[test]
    fn spawn_window_closes_after_configured_share_of_game() {
        let map = GameMap::new(4, 4).expect("map");
        let harvest = Harvest::seeded(Config::new(2, 50, 25), 1);
        let mut me = Player::new(PlayerId::new(0), Position::new(1, 1));
        me.halite = 5_000;
        let constants = GameConstants {
            max_turns: 400,
            ..GameConstants::default()
        };

        assert!(harvest.should_spawn(&map, 100, &me, &constants));
        assert!(!harvest.should_spawn(&map, 101, &me, &constants));
    }

    #[test]
    fn committing_a_move_transfers_the_marker() {
        let mut map = GameMap::new(4, 4).expect("map");
        let ship = Ship {
            id: EntityId::new(2),
            owner: PlayerId::new(0),
            position: Position::new(3, 3),
            halite: 0,
        };
        map.mark_occupied(ship.position, ship.id);

        commit_move(&mut map, &ship, Direction::East);

        assert!(!map.at(Position::new(3, 3)).is_occupied());
        assert_eq!(map.at(Position::new(0, 3)).occupant(), Some(ship.id));
    }
}
