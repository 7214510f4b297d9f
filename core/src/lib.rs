#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tidewrap engine.
//!
//! This crate defines the value types that connect the transport adapter, the
//! authoritative game map, and pure systems. Adapters decode turn input into
//! [`Position`] and entity records, systems reason about [`Direction`] values,
//! and every decision leaves the engine as a [`Command`] whose `Display`
//! rendering is the exact text the transport expects.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name reported to the transport when the bot registers.
pub const DEFAULT_BOT_NAME: &str = "tidewrap";

/// Location on the toroidal grid expressed as raw column and row values.
///
/// Positions carry no bounds of their own. They only become meaningful once a
/// map reduces them into its canonical range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column component of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row component of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position reached by taking one step in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos{{x={},y={}}}", self.x, self.y)
    }
}

/// Single-step movement choices available to a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
    /// Remaining on the current cell.
    Still,
}

impl Direction {
    /// The four directions that actually change a ship's cell.
    pub const ALL_CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Column and row delta applied by the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Still => (0, 0),
        }
    }

    /// Character used for the direction on the wire.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::North => 'n',
            Self::South => 's',
            Self::East => 'e',
            Self::West => 'w',
            Self::Still => 'o',
        }
    }

    /// Parses a wire character back into a direction.
    pub fn from_char(value: char) -> Result<Self, DirectionError> {
        match value {
            'n' => Ok(Self::North),
            's' => Ok(Self::South),
            'e' => Ok(Self::East),
            'w' => Ok(Self::West),
            'o' => Ok(Self::Still),
            other => Err(DirectionError::InvalidDirection(other)),
        }
    }

    /// Direction that undoes this one. `Still` inverts to itself.
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Still => Self::Still,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Failures raised while converting raw values into directions.
///
/// The direction set is closed, so hitting this error means a caller handed
/// the engine a value that never came from [`Direction::as_char`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DirectionError {
    /// The character does not name any known direction.
    #[error("invalid direction '{0}'")]
    InvalidDirection(char),
}

/// Unique identifier assigned to a ship or dropoff by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a player by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Instructions emitted to the transport at the end of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Moves a ship one step, or keeps it in place with [`Direction::Still`].
    Move {
        /// Ship receiving the order.
        ship: EntityId,
        /// Direction of travel.
        direction: Direction,
    },
    /// Builds a new ship at the player's shipyard.
    Spawn,
    /// Converts a ship into a dropoff on its current cell.
    ConstructDropoff {
        /// Ship consumed by the conversion.
        ship: EntityId,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { ship, direction } => write!(f, "m {} {}", ship.get(), direction),
            Self::Spawn => write!(f, "g"),
            Self::ConstructDropoff { ship } => write!(f, "c {}", ship.get()),
        }
    }
}

/// Structure anchored to a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Structure {
    /// A player's home shipyard.
    Shipyard(PlayerId),
    /// A dropoff built from a converted ship.
    Dropoff(EntityId),
}

/// Snapshot of a ship as reported by the transport for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ship {
    /// Identifier assigned to the ship.
    pub id: EntityId,
    /// Player that owns the ship.
    pub owner: PlayerId,
    /// Cell the ship currently occupies.
    pub position: Position,
    /// Halite carried in the ship's hold.
    pub halite: u32,
}

impl Ship {
    /// Reports whether the hold has reached the configured capacity.
    ///
    /// Cargo never exceeds `max_halite`, so a hold at exactly the cap is full
    /// rather than waiting for a strictly larger value that cannot occur.
    #[must_use]
    pub fn is_full(&self, constants: &GameConstants) -> bool {
        self.halite >= constants.max_halite
    }

    /// Builds a move order for this ship.
    #[must_use]
    pub const fn move_toward(&self, direction: Direction) -> Command {
        Command::Move {
            ship: self.id,
            direction,
        }
    }

    /// Builds an order that keeps the ship on its cell.
    #[must_use]
    pub const fn stay_still(&self) -> Command {
        self.move_toward(Direction::Still)
    }

    /// Builds an order converting the ship into a dropoff.
    #[must_use]
    pub const fn make_dropoff(&self) -> Command {
        Command::ConstructDropoff { ship: self.id }
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship{{id={},{},halite={}}}",
            self.id.get(),
            self.position,
            self.halite
        )
    }
}

/// Dropoff owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dropoff {
    /// Identifier assigned to the dropoff.
    pub id: EntityId,
    /// Player that owns the dropoff.
    pub owner: PlayerId,
    /// Cell the dropoff stands on.
    pub position: Position,
}

/// Home shipyard of a player. Shipyards have no entity identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shipyard {
    /// Player that owns the shipyard.
    pub owner: PlayerId,
    /// Cell the shipyard stands on.
    pub position: Position,
}

impl Shipyard {
    /// Builds a spawn order for this shipyard.
    #[must_use]
    pub const fn spawn(&self) -> Command {
        Command::Spawn
    }
}

/// Everything known about a single player during a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Identifier assigned to the player.
    pub id: PlayerId,
    /// Home shipyard of the player.
    pub shipyard: Shipyard,
    /// Banked halite available for spending.
    pub halite: u32,
    /// Ships owned by the player, ordered by identifier.
    pub ships: Vec<Ship>,
    /// Dropoffs owned by the player, ordered by identifier.
    pub dropoffs: Vec<Dropoff>,
}

impl Player {
    /// Creates a player that owns only its shipyard.
    #[must_use]
    pub fn new(id: PlayerId, shipyard_position: Position) -> Self {
        Self {
            id,
            shipyard: Shipyard {
                owner: id,
                position: shipyard_position,
            },
            halite: 0,
            ships: Vec::new(),
            dropoffs: Vec::new(),
        }
    }

    /// Cells where the player's ships can unload halite.
    pub fn drop_points(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.shipyard.position)
            .chain(self.dropoffs.iter().map(|dropoff| dropoff.position))
    }
}

/// Rule constants announced by the transport before the first turn.
///
/// Missing keys fall back to the standard game values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    /// Maximum halite a single ship can carry.
    #[serde(rename = "MAX_HALITE")]
    pub max_halite: u32,
    /// Cost of spawning a ship.
    #[serde(rename = "NEW_ENTITY_ENERGY_COST")]
    pub ship_cost: u32,
    /// Cost of converting a ship into a dropoff.
    #[serde(rename = "DROPOFF_COST")]
    pub dropoff_cost: u32,
    /// Number of turns in the game.
    #[serde(rename = "MAX_TURNS")]
    pub max_turns: u32,
    /// Ships mine `1 / extract_ratio` of their cell each turn they stay.
    #[serde(rename = "EXTRACT_RATIO")]
    pub extract_ratio: u32,
    /// Leaving a cell costs `1 / move_cost_ratio` of its halite.
    #[serde(rename = "MOVE_COST_RATIO")]
    pub move_cost_ratio: u32,
}

impl Default for GameConstants {
    fn default() -> Self {
        Self {
            max_halite: 1000,
            ship_cost: 1000,
            dropoff_cost: 4000,
            max_turns: 400,
            extract_ratio: 4,
            move_cost_ratio: 10,
        }
    }
}
