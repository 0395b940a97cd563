//! Errors raised by the board, the shot history and the packet codec.
//!
//! Every error maps onto the wire code the session reports with `E <code>`.

use thiserror::Error;

use crate::types::ErrorCode;

/// Reason a piece could not be placed.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum PlacementError {
    /// Shape identifier outside `1..=7`.
    #[error("shape {0} is not a known tetromino")]
    InvalidShape(i32),
    /// Rotation outside `1..=4`.
    #[error("rotation {0} is out of range")]
    InvalidRotation(i32),
    /// At least one cell lies outside the board.
    #[error("piece leaves the board at ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },
    /// At least one cell is already occupied.
    #[error("piece overlaps an occupied cell at ({row}, {col})")]
    Overlap { row: i32, col: i32 },
}

impl PlacementError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlacementError::InvalidShape(_) => ErrorCode::ShapeOutOfRange,
            PlacementError::InvalidRotation(_) => ErrorCode::RotationOutOfRange,
            PlacementError::OutOfBounds { .. } => ErrorCode::PieceOutOfBounds,
            PlacementError::Overlap { .. } => ErrorCode::Overlap,
        }
    }
}

/// Reason a shot was rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ShotError {
    #[error("shot at ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("cell ({row}, {col}) was already targeted")]
    AlreadyTargeted { row: i32, col: i32 },
}

impl ShotError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ShotError::OutOfBounds { .. } => ErrorCode::ShotOutOfBounds,
            ShotError::AlreadyTargeted { .. } => ErrorCode::AlreadyTargeted,
        }
    }
}

/// Packet type letters the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Begin,
    Initialize,
    Shoot,
    Query,
    Forfeit,
}

/// A line that could not be decoded into a command.
///
/// `kind` is the packet type when the leading letter was recognized, so the
/// session can report a wrong-phase packet as `E 100` before looking at its
/// malformed fields.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("malformed {kind:?} packet (code {code})")]
pub struct DecodeError {
    pub kind: Option<PacketKind>,
    pub code: ErrorCode,
}

impl DecodeError {
    pub(crate) fn unknown() -> Self {
        Self {
            kind: None,
            code: ErrorCode::InvalidPacketType,
        }
    }

    pub(crate) fn malformed(kind: PacketKind, code: ErrorCode) -> Self {
        Self {
            kind: Some(kind),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_codes() {
        assert_eq!(PlacementError::InvalidShape(9).code().as_u16(), 300);
        assert_eq!(PlacementError::InvalidRotation(0).code().as_u16(), 301);
        assert_eq!(PlacementError::OutOfBounds { row: -1, col: 0 }.code().as_u16(), 302);
        assert_eq!(PlacementError::Overlap { row: 0, col: 0 }.code().as_u16(), 303);
    }

    #[test]
    fn shot_codes() {
        assert_eq!(ShotError::OutOfBounds { row: 10, col: 0 }.code().as_u16(), 400);
        assert_eq!(ShotError::AlreadyTargeted { row: 1, col: 1 }.code().as_u16(), 401);
    }

    #[test]
    fn messages_name_the_cell() {
        let err = PlacementError::Overlap { row: 2, col: 3 };
        assert_eq!(err.to_string(), "piece overlaps an occupied cell at (2, 3)");
    }
}
