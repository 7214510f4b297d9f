//! Decoding of the transport's line-oriented integer stream.
//!
//! The game start opens with one JSON line of rule constants. Everything after
//! it is whitespace separated integers, so the reader hands out tokens without
//! caring where the line breaks fall.

use std::{collections::VecDeque, io::BufRead, str::FromStr};

use thiserror::Error;
use tidewrap_core::{Dropoff, EntityId, GameConstants, Player, PlayerId, Position, Ship};
use tidewrap_world::{CellUpdate, GameMap, MapError};

/// Upper bound on the room reserved up front for a count read from the input.
const MAX_PREALLOCATED: usize = 4096;

/// Errors that can occur while decoding transport input.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    /// Reading from the underlying stream failed.
    #[error("could not read transport input: {0}")]
    Io(#[from] std::io::Error),
    /// The constants line was not valid JSON.
    #[error("could not parse game constants: {0}")]
    Constants(#[from] serde_json::Error),
    /// The stream ended in the middle of a frame.
    #[error("input ended while reading {expected}")]
    UnexpectedEof {
        /// Field the decoder was waiting for.
        expected: &'static str,
    },
    /// A token could not be parsed as the expected field.
    #[error("could not parse {expected} from '{token}'")]
    InvalidToken {
        /// Field the decoder was waiting for.
        expected: &'static str,
        /// Raw token received instead.
        token: String,
    },
    /// A turn frame referenced a player the game start never announced.
    #[error("turn frame references unknown player {0}")]
    UnknownPlayer(u32),
    /// The decoded map description was rejected.
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Whitespace token reader over a buffered input stream.
pub(crate) struct TokenReader<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R> TokenReader<R>
where
    R: BufRead,
{
    /// Wraps a buffered stream.
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Reads the next raw line, bypassing tokenisation.
    fn line(&mut self, expected: &'static str) -> Result<String, TransportError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TransportError::UnexpectedEof { expected });
        }
        Ok(line)
    }

    /// Returns true once the stream holds no further tokens.
    pub(crate) fn is_exhausted(&mut self) -> Result<bool, TransportError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(true);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(false)
    }

    /// Parses the next token as `T`.
    pub(crate) fn next<T>(&mut self, expected: &'static str) -> Result<T, TransportError>
    where
        T: FromStr,
    {
        if self.is_exhausted()? {
            return Err(TransportError::UnexpectedEof { expected });
        }

        let token = self
            .pending
            .pop_front()
            .ok_or(TransportError::UnexpectedEof { expected })?;
        token
            .parse()
            .map_err(|_| TransportError::InvalidToken { expected, token })
    }

    fn position(&mut self) -> Result<Position, TransportError> {
        let x = self.next("x coordinate")?;
        let y = self.next("y coordinate")?;
        Ok(Position::new(x, y))
    }
}

/// Everything announced before the first turn.
#[derive(Debug)]
pub(crate) struct GameStart {
    pub(crate) constants: GameConstants,
    pub(crate) my_id: PlayerId,
    pub(crate) players: Vec<Player>,
    pub(crate) map: GameMap,
}

/// Per-player section of a turn frame.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PlayerFrame {
    pub(crate) id: PlayerId,
    pub(crate) halite: u32,
    pub(crate) ships: Vec<Ship>,
    pub(crate) dropoffs: Vec<Dropoff>,
}

/// Everything announced at the start of a turn.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TurnFrame {
    pub(crate) turn: u32,
    pub(crate) players: Vec<PlayerFrame>,
    pub(crate) updates: Vec<CellUpdate>,
}

/// Decodes the game start: constants, players, shipyards and initial halite.
pub(crate) fn read_game_start<R>(reader: &mut TokenReader<R>) -> Result<GameStart, TransportError>
where
    R: BufRead,
{
    let constants: GameConstants = serde_json::from_str(reader.line("game constants")?.trim())?;

    let player_count: usize = reader.next("player count")?;
    let my_id = PlayerId::new(reader.next("own player id")?);

    let mut players = Vec::with_capacity(player_count.min(MAX_PREALLOCATED));
    for _ in 0..player_count {
        let id = PlayerId::new(reader.next("player id")?);
        let shipyard = reader.position()?;
        players.push(Player::new(id, shipyard));
    }

    let width: i32 = reader.next("map width")?;
    let height: i32 = reader.next("map height")?;
    let cell_count = usize::try_from(width.max(0))
        .unwrap_or(0)
        .saturating_mul(usize::try_from(height.max(0)).unwrap_or(0));
    let mut halite = Vec::with_capacity(cell_count.min(MAX_PREALLOCATED));
    for _ in 0..cell_count {
        halite.push(reader.next("cell halite")?);
    }
    let map = GameMap::from_halite(width, height, halite)?;

    Ok(GameStart {
        constants,
        my_id,
        players,
        map,
    })
}

/// Decodes one turn frame, or returns `None` when the stream has ended.
pub(crate) fn read_turn<R>(
    reader: &mut TokenReader<R>,
    player_count: usize,
) -> Result<Option<TurnFrame>, TransportError>
where
    R: BufRead,
{
    if reader.is_exhausted()? {
        return Ok(None);
    }

    let turn = reader.next("turn number")?;

    let mut players = Vec::with_capacity(player_count.min(MAX_PREALLOCATED));
    for _ in 0..player_count {
        let id = PlayerId::new(reader.next("player id")?);
        let ship_count: usize = reader.next("ship count")?;
        let dropoff_count: usize = reader.next("dropoff count")?;
        let halite = reader.next("player halite")?;

        let mut ships = Vec::with_capacity(ship_count.min(MAX_PREALLOCATED));
        for _ in 0..ship_count {
            let ship_id = EntityId::new(reader.next("ship id")?);
            let position = reader.position()?;
            let cargo = reader.next("ship halite")?;
            ships.push(Ship {
                id: ship_id,
                owner: id,
                position,
                halite: cargo,
            });
        }

        let mut dropoffs = Vec::with_capacity(dropoff_count.min(MAX_PREALLOCATED));
        for _ in 0..dropoff_count {
            let dropoff_id = EntityId::new(reader.next("dropoff id")?);
            let position = reader.position()?;
            dropoffs.push(Dropoff {
                id: dropoff_id,
                owner: id,
                position,
            });
        }

        players.push(PlayerFrame {
            id,
            halite,
            ships,
            dropoffs,
        });
    }

    let update_count: usize = reader.next("cell update count")?;
    let mut updates = Vec::with_capacity(update_count.min(MAX_PREALLOCATED));
    for _ in 0..update_count {
        let position = reader.position()?;
        let halite = reader.next("cell halite")?;
        updates.push(CellUpdate { position, halite });
    }

    Ok(Some(TurnFrame {
        turn,
        players,
        updates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_START: &str = "{\"MAX_HALITE\": 1000, \"NEW_ENTITY_ENERGY_COST\": 1000}\n\
        2 1\n\
        0 1 1\n\
        1 2 2\n\
        3 3\n\
        1 2 3\n\
        4 5 6\n\
        7 8 9\n";

    #[test]
    fn decodes_game_start() {
        let mut reader = TokenReader::new(GAME_START.as_bytes());
        let start = read_game_start(&mut reader).expect("game start decodes");

        assert_eq!(start.my_id, PlayerId::new(1));
        assert_eq!(start.constants.max_halite, 1000);
        assert_eq!(start.players.len(), 2);
        assert_eq!(start.players[1].shipyard.position, Position::new(2, 2));
        assert_eq!(start.map.width(), 3);
        assert_eq!(start.map.at(Position::new(2, 1)).halite(), 6);
        assert!(read_turn(&mut reader, 2).expect("eof").is_none());
    }

    #[test]
    fn decodes_turn_frame() {
        let input = "5\n0 1 1 2500\n7 3 4 120\n2 0 0\n1 0 0 0\n1\n3 4 77\n";
        let mut reader = TokenReader::new(input.as_bytes());
        let frame = read_turn(&mut reader, 2)
            .expect("turn decodes")
            .expect("frame present");

        assert_eq!(frame.turn, 5);
        assert_eq!(frame.players[0].halite, 2500);
        assert_eq!(
            frame.players[0].ships,
            vec![Ship {
                id: EntityId::new(7),
                owner: PlayerId::new(0),
                position: Position::new(3, 4),
                halite: 120,
            }]
        );
        assert_eq!(frame.players[0].dropoffs[0].position, Position::new(0, 0));
        assert!(frame.players[1].ships.is_empty());
        assert_eq!(
            frame.updates,
            vec![CellUpdate {
                position: Position::new(3, 4),
                halite: 77,
            }]
        );
    }

    #[test]
    fn truncated_turn_reports_missing_field() {
        let mut reader = TokenReader::new("5\n0 1 0 10\n7 3".as_bytes());
        let error = read_turn(&mut reader, 1).expect_err("truncated frame");
        assert_eq!(error.to_string(), "input ended while reading y coordinate");
    }

    #[test]
    fn malformed_token_names_the_field() {
        let mut reader = TokenReader::new("five\n".as_bytes());
        let error = read_turn(&mut reader, 1).expect_err("bad turn number");
        assert!(matches!(
            error,
            TransportError::InvalidToken {
                expected: "turn number",
                ..
            }
        ));
    }

    #[test]
    fn oversized_ship_count_runs_out_of_input() {
        let mut reader = TokenReader::new("5\n0 18446744073709551615 0 10\n".as_bytes());
        let error = read_turn(&mut reader, 1).expect_err("count exceeds input");
        assert!(matches!(
            error,
            TransportError::UnexpectedEof {
                expected: "ship id"
            }
        ));
    }

    #[test]
    fn oversized_map_runs_out_of_input() {
        let input = "{}\n1 0\n0 0 0\n65536 65536\n1 2 3\n";
        let mut reader = TokenReader::new(input.as_bytes());
        let error = read_game_start(&mut reader).expect_err("map exceeds input");
        assert!(matches!(
            error,
            TransportError::UnexpectedEof {
                expected: "cell halite"
            }
        ));
    }

    #[test]
    fn map_size_mismatch_is_rejected() {
        let input = "{}\n1 0\n0 0 0\n2 2\n1 2 3\n";
        let mut reader = TokenReader::new(input.as_bytes());
        let error = read_game_start(&mut reader).expect_err("short map");
        assert!(matches!(error, TransportError::UnexpectedEof { .. }));
    }
}
