//! Board module - one player's ship layout
//!
//! The board is a `width x height` grid stored as a flat row-major vector.
//! Coordinates are `(row, col)` with row in `0..height` (top to bottom) and
//! col in `0..width` (left to right).
//!
//! A cell is empty, holds a ship identifier `1..=5`, or has been struck. A
//! struck cell no longer says which ship it belonged to; [`Board::shoot`]
//! captures the identifier before marking the cell. Sunk state is never
//! stored, it is derived by scanning for remaining unstruck cells.

use crate::errors::{PlacementError, ShotError};
use crate::pieces::{PieceCells, ShipPlacement};
use crate::types::{ShotMark, SHIP_COUNT};

/// Ship identifier, assigned `1..=SHIP_COUNT` in placement order
pub type ShipId = u8;

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Ship(ShipId),
    /// A ship cell that has been hit
    Struck,
}

/// Result of firing at a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The cell held this ship
    Hit(ShipId),
    Miss,
}

impl ShotOutcome {
    pub fn mark(self) -> ShotMark {
        match self {
            ShotOutcome::Hit(_) => ShotMark::Hit,
            ShotOutcome::Miss => ShotMark::Miss,
        }
    }
}

/// A player's own grid of ships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.is_out_of_bounds(row, col) {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at (row, col), `None` if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    pub fn is_out_of_bounds(&self, row: i32, col: i32) -> bool {
        row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width
    }

    /// Check that every cell is on the board and empty, without mutating
    ///
    /// Bounds are checked for all four cells before any overlap, so a piece
    /// that is both off the board and overlapping reports `OutOfBounds`.
    pub fn validate_placement(&self, cells: &PieceCells) -> Result<(), PlacementError> {
        if let Some(&(row, col)) = cells.iter().find(|&&(r, c)| self.is_out_of_bounds(r, c)) {
            return Err(PlacementError::OutOfBounds { row, col });
        }
        if let Some(&(row, col)) = cells
            .iter()
            .find(|&&(r, c)| self.get(r, c) != Some(Cell::Empty))
        {
            return Err(PlacementError::Overlap { row, col });
        }
        Ok(())
    }

    /// Write `ship` into all four cells
    ///
    /// Re-validates first; the board is only mutated on success.
    pub fn place(&mut self, cells: &PieceCells, ship: ShipId) -> Result<(), PlacementError> {
        self.validate_placement(cells)?;
        for &(row, col) in cells {
            if let Some(idx) = self.index(row, col) {
                self.cells[idx] = Cell::Ship(ship);
            }
        }
        Ok(())
    }

    /// Decode a wire placement and place it
    pub fn place_ship(
        &mut self,
        placement: &ShipPlacement,
        ship: ShipId,
    ) -> Result<(), PlacementError> {
        let cells = placement.cells()?;
        self.place(&cells, ship)
    }

    /// Fire at (row, col)
    ///
    /// A hit marks the cell struck; the returned outcome carries the ship
    /// identifier read before marking.
    pub fn shoot(&mut self, row: i32, col: i32) -> Result<ShotOutcome, ShotError> {
        let idx = self
            .index(row, col)
            .ok_or(ShotError::OutOfBounds { row, col })?;
        match self.cells[idx] {
            Cell::Ship(ship) => {
                self.cells[idx] = Cell::Struck;
                Ok(ShotOutcome::Hit(ship))
            }
            Cell::Empty | Cell::Struck => Ok(ShotOutcome::Miss),
        }
    }

    /// True iff no unstruck cell still holds `ship`
    pub fn is_sunk(&self, ship: ShipId) -> bool {
        !self.cells.iter().any(|&cell| cell == Cell::Ship(ship))
    }

    /// Distinct ship identifiers with at least one unstruck cell
    pub fn remaining_ship_count(&self) -> usize {
        let mut alive = [false; SHIP_COUNT + 1];
        for cell in &self.cells {
            if let Cell::Ship(ship) = *cell {
                if let Some(slot) = alive.get_mut(ship as usize) {
                    *slot = true;
                }
            }
        }
        alive.iter().filter(|&&a| a).count()
    }

    /// Cells that are not empty (ships, struck or not)
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}
