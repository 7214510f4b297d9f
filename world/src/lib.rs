#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game map state for Tidewrap.
//!
//! The map is rebuilt once at game start from the transport's initial halite
//! values and then mutated once per turn through [`apply`], which clears the
//! transient occupancy markers and writes the turn's halite deltas. Callers
//! re-populate occupancy from the entity catalog before any navigation query
//! runs in that turn.

mod torus;

use thiserror::Error;
use tidewrap_core::{EntityId, Position, Structure};

pub use torus::Torus;

/// Failures raised while building or updating the map.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// One of the dimensions was zero or negative.
    #[error("map dimensions must be positive, got {width}x{height}")]
    EmptyDimension {
        /// Requested column count.
        width: i32,
        /// Requested row count.
        height: i32,
    },
    /// The initial halite values did not cover every cell exactly once.
    #[error("expected {expected} initial halite values, got {actual}")]
    CellCountMismatch {
        /// Number of cells in the map.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// An update addressed a cell outside the canonical range.
    #[error("position {position} lies outside the map")]
    OutOfBounds {
        /// Offending position.
        position: Position,
    },
}

/// A single grid cell with its halite and transient markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapCell {
    position: Position,
    halite: u32,
    occupant: Option<EntityId>,
    structure: Option<Structure>,
}

impl MapCell {
    const fn vacant(position: Position, halite: u32) -> Self {
        Self {
            position,
            halite,
            occupant: None,
            structure: None,
        }
    }

    /// Canonical position of the cell.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Halite currently stored in the cell.
    #[must_use]
    pub const fn halite(&self) -> u32 {
        self.halite
    }

    /// Ship marked on the cell for the current turn, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    /// Structure standing on the cell, if any.
    #[must_use]
    pub const fn structure(&self) -> Option<Structure> {
        self.structure
    }

    /// True when neither a ship nor a structure is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none() && self.structure.is_none()
    }

    /// True when a ship has been marked on the cell this turn.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// True when a shipyard or dropoff stands on the cell.
    #[must_use]
    pub const fn has_structure(&self) -> bool {
        self.structure.is_some()
    }
}

/// Halite overwrite for one cell, as announced by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellUpdate {
    /// Cell receiving the new value. Must already lie inside the map.
    pub position: Position,
    /// Halite stored in the cell after the update.
    pub halite: u32,
}

/// Dense row-major store of every cell on the toroidal grid.
#[derive(Clone, Debug)]
pub struct GameMap {
    torus: Torus,
    cells: Vec<MapCell>,
}

impl GameMap {
    /// Creates an empty map with every cell at zero halite.
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        let torus = Torus::new(width, height)?;
        let cells = torus
            .positions()
            .map(|position| MapCell::vacant(position, 0))
            .collect();
        Ok(Self { torus, cells })
    }

    /// Builds the map from initial halite values listed in row-major order.
    pub fn from_halite(width: i32, height: i32, halite: Vec<u32>) -> Result<Self, MapError> {
        let torus = Torus::new(width, height)?;
        if halite.len() != torus.cell_count() {
            return Err(MapError::CellCountMismatch {
                expected: torus.cell_count(),
                actual: halite.len(),
            });
        }

        let cells = torus
            .positions()
            .zip(halite)
            .map(|(position, amount)| MapCell::vacant(position, amount))
            .collect();
        Ok(Self { torus, cells })
    }

    /// Wraparound topology of the map.
    #[must_use]
    pub const fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.torus.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.torus.height()
    }

    /// Reduces a position into the map's canonical range.
    #[must_use]
    pub const fn normalize(&self, position: Position) -> Position {
        self.torus.normalize(position)
    }

    /// Toroidal Manhattan distance between two positions.
    #[must_use]
    pub fn distance(&self, source: Position, target: Position) -> u32 {
        self.torus.distance(source, target)
    }

    /// Returns the cell at an already normalized position.
    ///
    /// # Panics
    ///
    /// Panics when `position` lies outside `[0, width) x [0, height)`. Use
    /// [`GameMap::at_wrapped`] for raw positions.
    #[must_use]
    pub fn at(&self, position: Position) -> &MapCell {
        match self.torus.index(position) {
            Some(index) => &self.cells[index],
            None => panic!(
                "position {position} lies outside the {}x{} map",
                self.width(),
                self.height()
            ),
        }
    }

    /// Returns the cell at `position`, or `None` when it lies outside the map.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&MapCell> {
        self.torus
            .index(position)
            .and_then(|index| self.cells.get(index))
    }

    /// Returns the cell a raw position wraps onto.
    #[must_use]
    pub fn at_wrapped(&self, position: Position) -> &MapCell {
        self.at(self.normalize(position))
    }

    /// Every cell in row-major scan order.
    #[must_use]
    pub fn cells(&self) -> &[MapCell] {
        &self.cells
    }

    /// Sum of the halite stored across the whole map.
    #[must_use]
    pub fn total_halite(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.halite)).sum()
    }

    /// Marks the cell a ship occupies for the rest of the turn.
    pub fn mark_occupied(&mut self, position: Position, ship: EntityId) {
        self.cell_mut(position).occupant = Some(ship);
    }

    /// Clears the occupancy marker of a single cell.
    pub fn vacate(&mut self, position: Position) {
        self.cell_mut(position).occupant = None;
    }

    /// Records a structure standing on the cell.
    pub fn place_structure(&mut self, position: Position, structure: Structure) {
        self.cell_mut(position).structure = Some(structure);
    }

    /// Clears every occupancy marker.
    pub fn reset_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
    }

    /// Overwrites halite for each listed cell.
    ///
    /// Positions are not normalized. The whole batch is rejected before any
    /// cell changes if one of them lies outside the map.
    pub fn apply_resource_deltas(&mut self, updates: &[CellUpdate]) -> Result<(), MapError> {
        let indices = self.resolve_updates(updates)?;
        self.write_resolved(&indices, updates);
        Ok(())
    }

    fn write_resolved(&mut self, indices: &[usize], updates: &[CellUpdate]) {
        for (&index, update) in indices.iter().zip(updates) {
            self.cells[index].halite = update.halite;
        }
    }

    fn resolve_updates(&self, updates: &[CellUpdate]) -> Result<Vec<usize>, MapError> {
        updates
            .iter()
            .map(|update| {
                self.torus
                    .index(update.position)
                    .ok_or(MapError::OutOfBounds {
                        position: update.position,
                    })
            })
            .collect()
    }

    fn cell_mut(&mut self, position: Position) -> &mut MapCell {
        let normalized = self.normalize(position);
        match self.torus.index(normalized) {
            Some(index) => &mut self.cells[index],
            None => unreachable!("normalized position {normalized} escaped the map"),
        }
    }
}

/// Starts a new turn: clears occupancy, then writes the turn's halite deltas.
///
/// The updates are validated first, so a rejected batch leaves the map
/// exactly as it was, occupancy included.
pub fn apply(map: &mut GameMap, updates: &[CellUpdate]) -> Result<(), MapError> {
    let indices = map.resolve_updates(updates)?;
    map.reset_occupancy();
    map.write_resolved(&indices, updates);
    Ok(())
}

/// Query functions that provide read-only access to the map.
pub mod query {
    use tidewrap_core::Position;

    use super::{GameMap, MapCell};

    /// Collects every cell within `radius` of `center`, richest first.
    ///
    /// Ties keep row-major scan order. The result is an owned copy, so later
    /// map mutations do not affect it.
    #[must_use]
    pub fn cells_by_halite(map: &GameMap, center: Position, radius: u32) -> Vec<MapCell> {
        let mut cells: Vec<MapCell> = map
            .cells()
            .iter()
            .filter(|cell| map.distance(center, cell.position()) <= radius)
            .copied()
            .collect();
        cells.sort_by(|a, b| b.halite().cmp(&a.halite()));
        cells
    }

    /// Position among `candidates` closest to `from`, first one winning ties.
    #[must_use]
    pub fn nearest<I>(map: &GameMap, from: Position, candidates: I) -> Option<Position>
    where
        I: IntoIterator<Item = Position>,
    {
        candidates
            .into_iter()
            .map(|candidate| (map.distance(from, candidate), candidate))
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate)
    }

    /// Positions of every cell currently marked as occupied.
    #[must_use]
    pub fn occupied_positions(map: &GameMap) -> Vec<Position> {
        map.cells()
            .iter()
            .filter(|cell| cell.is_occupied())
            .map(MapCell::position)
            .collect()
    }
}
