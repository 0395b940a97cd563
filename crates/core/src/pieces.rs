//! Pieces module - tetromino ship shapes and quarter-turn rotation
//!
//! Every shape is four `(row, col)` offsets relative to a reference cell at
//! `(0, 0)` in its base orientation. Rotation is a clockwise quarter turn about
//! the reference cell: `(r, c) -> (c, -r)`.

use crate::errors::PlacementError;
use crate::types::{Rotation, Shape, CELLS_PER_SHIP};

/// Offset of a single cell relative to the reference cell, as `(row, col)`
pub type CellOffset = (i32, i32);

/// Four offsets making up a shape
pub type PieceShape = [CellOffset; CELLS_PER_SHIP];

/// Absolute board cell, as `(row, col)`
pub type Coord = (i32, i32);

/// Four absolute cells occupied by a placed piece
pub type PieceCells = [Coord; CELLS_PER_SHIP];

/// Base (rotation 0) offsets for a shape
pub fn base_shape(shape: Shape) -> PieceShape {
    match shape {
        // 2x2 square extending down and right
        Shape::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        // vertical bar extending down
        Shape::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
        Shape::S => [(0, 0), (0, 1), (-1, 1), (-1, 2)],
        Shape::L => [(0, 0), (1, 0), (2, 0), (2, 1)],
        Shape::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
        Shape::J => [(0, 0), (1, 0), (2, 0), (2, -1)],
        Shape::T => [(0, 0), (0, 1), (0, 2), (1, 1)],
    }
}

/// Rotate one offset clockwise by `turns` quarter turns
///
/// Applies `(x, y) -> (y, -x)` once per turn, so the result has period 4.
pub fn rotate_offset(offset: CellOffset, turns: u32) -> CellOffset {
    let mut out = offset;
    for _ in 0..turns % 4 {
        out = (out.1, out.0.saturating_neg());
    }
    out
}

/// Offsets for a shape after rotation, still relative to the reference cell
pub fn get_shape(shape: Shape, rotation: Rotation) -> PieceShape {
    base_shape(shape).map(|offset| rotate_offset(offset, rotation.turns()))
}

/// Absolute cells covered by a piece anchored at `(ref_row, ref_col)`
///
/// Pure and total: cells may fall outside any board, bounds are the board's
/// concern. Translation saturates at the `i32` limits, which no board reaches.
pub fn coordinates_for(shape: Shape, rotation: Rotation, ref_row: i32, ref_col: i32) -> PieceCells {
    get_shape(shape, rotation)
        .map(|(dr, dc)| (ref_row.saturating_add(dr), ref_col.saturating_add(dc)))
}

/// A ship placement as decoded from an Initialize packet
///
/// Shape and rotation stay raw wire values until validated, because an out
/// of range value is a reportable error rather than a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipPlacement {
    pub shape: i32,
    pub rotation: i32,
    pub row: i32,
    pub col: i32,
}

impl ShipPlacement {
    pub fn new(shape: i32, rotation: i32, row: i32, col: i32) -> Self {
        Self {
            shape,
            rotation,
            row,
            col,
        }
    }

    /// Decode shape and rotation and compute the covered cells
    ///
    /// An unknown shape is reported before an unknown rotation.
    pub fn cells(&self) -> Result<PieceCells, PlacementError> {
        let shape = Shape::from_wire(self.shape).ok_or(PlacementError::InvalidShape(self.shape))?;
        let rotation = Rotation::from_wire(self.rotation)
            .ok_or(PlacementError::InvalidRotation(self.rotation))?;
        Ok(coordinates_for(shape, rotation, self.row, self.col))
    }
}
