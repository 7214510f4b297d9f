//! Wraparound topology shared by the map and the navigation system.

use tidewrap_core::Position;

use crate::MapError;

/// Dimensions of a toroidal grid together with its wraparound arithmetic.
///
/// Moving off one edge re-enters from the opposite edge, so every raw
/// [`Position`] has exactly one canonical representative inside
/// `[0, width) x [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Torus {
    width: i32,
    height: i32,
}

impl Torus {
    /// Creates a topology for the provided dimensions.
    ///
    /// Both dimensions must be strictly positive.
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        if width <= 0 || height <= 0 {
            return Err(MapError::EmptyDimension { width, height });
        }

        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells covered by the topology.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(0);
        let height = usize::try_from(self.height).unwrap_or(0);
        width.saturating_mul(height)
    }

    /// Reports whether `position` already lies in the canonical range.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() >= 0
            && position.x() < self.width
            && position.y() >= 0
            && position.y() < self.height
    }

    /// Reduces a position into the canonical range using floored modulo.
    #[must_use]
    pub const fn normalize(&self, position: Position) -> Position {
        Position::new(
            position.x().rem_euclid(self.width),
            position.y().rem_euclid(self.height),
        )
    }

    /// Manhattan distance measured along the shorter way around each axis.
    #[must_use]
    pub fn distance(&self, source: Position, target: Position) -> u32 {
        let source = self.normalize(source);
        let target = self.normalize(target);
        axis_distance(source.x(), target.x(), self.width)
            + axis_distance(source.y(), target.y(), self.height)
    }

    /// Row-major index of a position, if it lies in the canonical range.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }

        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    /// Every canonical position in row-major scan order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

/// Shorter of the direct and wrapped gaps between two normalized values.
fn axis_distance(from: i32, to: i32, extent: i32) -> u32 {
    let direct = from.abs_diff(to);
    direct.min(extent.unsigned_abs() - direct)
}
