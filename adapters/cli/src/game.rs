//! Turn-by-turn game state assembled from decoded transport frames.

use tidewrap_core::{Command, GameConstants, Player, PlayerId, Structure};
use tidewrap_system_harvest::Harvest;
use tidewrap_world::{self as world, GameMap};

use crate::transport::{GameStart, TransportError, TurnFrame};

/// Authoritative view of the match as seen by this bot.
#[derive(Debug)]
pub(crate) struct Game {
    pub(crate) constants: GameConstants,
    pub(crate) turn: u32,
    pub(crate) map: GameMap,
    my_id: PlayerId,
    players: Vec<Player>,
}

impl Game {
    /// Builds the initial state and records every shipyard on the map.
    pub(crate) fn new(start: GameStart) -> Self {
        let GameStart {
            constants,
            my_id,
            players,
            mut map,
        } = start;

        for player in &players {
            map.place_structure(player.shipyard.position, Structure::Shipyard(player.id));
        }

        Self {
            constants,
            turn: 0,
            map,
            my_id,
            players,
        }
    }

    /// Runs the harvesting system for this bot's player.
    ///
    /// Returns false when the game start never announced our own player.
    pub(crate) fn decide(&mut self, harvest: &mut Harvest, out: &mut Vec<Command>) -> bool {
        let Some(me) = self.players.iter().find(|player| player.id == self.my_id) else {
            return false;
        };

        harvest.handle(&mut self.map, self.turn, me, &self.constants, out);
        true
    }

    /// Number of players announced at game start.
    pub(crate) fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Applies a turn frame: entity catalog, halite deltas, then occupancy.
    ///
    /// A frame naming an unannounced player is rejected before anything
    /// changes.
    ///
    /// Every ship of every player is marked on the map before this returns,
    /// so navigation queries see the complete occupancy for the turn.
    pub(crate) fn update(&mut self, frame: TurnFrame) -> Result<(), TransportError> {
        if let Some(unknown) = frame
            .players
            .iter()
            .find(|section| !self.players.iter().any(|player| player.id == section.id))
        {
            return Err(TransportError::UnknownPlayer(unknown.id.get()));
        }
        world::apply(&mut self.map, &frame.updates)?;
        self.turn = frame.turn;

        for section in frame.players {
            let player = self
                .players
                .iter_mut()
                .find(|player| player.id == section.id)
                .ok_or(TransportError::UnknownPlayer(section.id.get()))?;
            player.halite = section.halite;
            player.ships = section.ships;
            player.ships.sort_by_key(|ship| ship.id);
            player.dropoffs = section.dropoffs;
            player.dropoffs.sort_by_key(|dropoff| dropoff.id);
        }

        for player in &self.players {
            for dropoff in &player.dropoffs {
                self.map
                    .place_structure(dropoff.position, Structure::Dropoff(dropoff.id));
            }
            for ship in &player.ships {
                self.map.mark_occupied(ship.position, ship.id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::PlayerFrame;
    use tidewrap_system_harvest::Config;
    use tidewrap_core::{Dropoff, EntityId, Position, Ship};
    use tidewrap_world::CellUpdate;

    fn start() -> GameStart {
        GameStart {
            constants: GameConstants::default(),
            my_id: PlayerId::new(1),
            players: vec![
                Player::new(PlayerId::new(0), Position::new(0, 0)),
                Player::new(PlayerId::new(1), Position::new(3, 3)),
            ],
            map: GameMap::new(5, 5).expect("map"),
        }
    }

    #[test]
    fn shipyards_are_recorded_at_game_start() {
        let game = Game::new(start());
        assert!(game.map.at(Position::new(3, 3)).has_structure());
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn update_marks_every_ship_and_dropoff() {
        let mut game = Game::new(start());
        let enemy_ship = Ship {
            id: EntityId::new(4),
            owner: PlayerId::new(0),
            position: Position::new(1, 0),
            halite: 0,
        };
        game.update(TurnFrame {
            turn: 2,
            players: vec![PlayerFrame {
                id: PlayerId::new(0),
                halite: 10,
                ships: vec![enemy_ship],
                dropoffs: vec![Dropoff {
                    id: EntityId::new(6),
                    owner: PlayerId::new(0),
                    position: Position::new(4, 4),
                }],
            }],
            updates: vec![CellUpdate {
                position: Position::new(2, 2),
                halite: 55,
            }],
        })
        .expect("update");

        assert_eq!(game.turn, 2);
        assert_eq!(game.map.at(Position::new(1, 0)).occupant(), Some(enemy_ship.id));
        assert!(game.map.at(Position::new(4, 4)).has_structure());
        assert_eq!(game.map.at(Position::new(2, 2)).halite(), 55);
    }

    #[test]
    fn decide_spawns_for_our_player_only() {
        let mut game = Game::new(start());
        game.update(TurnFrame {
            turn: 1,
            players: vec![PlayerFrame {
                id: PlayerId::new(1),
                halite: 1000,
                ships: Vec::new(),
                dropoffs: Vec::new(),
            }],
            updates: Vec::new(),
        })
        .expect("update");

        let mut harvest = Harvest::seeded(Config::default(), 9);
        let mut commands = Vec::new();
        assert!(game.decide(&mut harvest, &mut commands));
        assert_eq!(commands, vec![Command::Spawn]);
        assert!(game.map.at(Position::new(3, 3)).is_occupied());
    }

    #[test]
    fn unknown_player_is_rejected() {
        let mut game = Game::new(start());
        let error = game
            .update(TurnFrame {
                turn: 1,
                players: vec![PlayerFrame {
                    id: PlayerId::new(9),
                    halite: 0,
                    ships: Vec::new(),
                    dropoffs: Vec::new(),
                }],
                updates: Vec::new(),
            })
            .expect_err("unknown player");
        assert_eq!(error.to_string(), "turn frame references unknown player 9");
    }

    #[test]
    fn rejected_frame_leaves_state_untouched() {
        let mut game = Game::new(start());
        game.map.mark_occupied(Position::new(1, 1), EntityId::new(2));

        let error = game
            .update(TurnFrame {
                turn: 4,
                players: vec![
                    PlayerFrame {
                        id: PlayerId::new(0),
                        halite: 777,
                        ships: Vec::new(),
                        dropoffs: Vec::new(),
                    },
                    PlayerFrame {
                        id: PlayerId::new(9),
                        halite: 0,
                        ships: Vec::new(),
                        dropoffs: Vec::new(),
                    },
                ],
                updates: vec![CellUpdate {
                    position: Position::new(2, 2),
                    halite: 55,
                }],
            })
            .expect_err("unknown player");

        assert!(matches!(error, TransportError::UnknownPlayer(9)));
        assert_eq!(game.turn, 0);
        assert_eq!(game.players[0].halite, 0);
        assert_eq!(game.map.at(Position::new(2, 2)).halite(), 0);
        assert!(game.map.at(Position::new(1, 1)).is_occupied());
    }
}
