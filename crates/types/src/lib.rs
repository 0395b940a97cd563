//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the server.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board model, game session, wire codec, connection plumbing).
//!
//! # Protocol Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_BOARD_DIM` | 10 | Smallest accepted board width/height |
//! | `SHIP_COUNT` | 5 | Ships each player places |
//! | `CELLS_PER_SHIP` | 4 | Every ship is a tetromino |
//! | `PIECE_FIELDS` | 4 | `shape rotation row col` per ship in an Initialize packet |
//! | `INIT_FIELDS` | 20 | Integers carried by an Initialize packet |
//! | `DEFAULT_PORT_P1` | 2201 | Player 1 listener |
//! | `DEFAULT_PORT_P2` | 2202 | Player 2 listener |
//!
//! # Wire Numbering
//!
//! Shapes and rotations are 1-based on the wire and 0-based everywhere else.
//! The conversion happens exactly once, in [`Shape::from_wire`] and
//! [`Rotation::from_wire`].
//!
//! # Examples
//!
//! ```
//! use tetromino_battleship_types::{ErrorCode, PlayerId, Rotation, Shape};
//!
//! assert_eq!(Shape::from_wire(1), Some(Shape::O));
//! assert_eq!(Shape::from_wire(8), None);
//!
//! // Wire rotation 1 is the base orientation.
//! assert_eq!(Rotation::from_wire(1), Some(Rotation::BASE));
//! assert_eq!(Rotation::from_wire(4).unwrap().turns(), 3);
//!
//! assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
//! assert_eq!(ErrorCode::Overlap.as_u16(), 303);
//! ```

use std::fmt;

/// Smallest accepted board dimension on either axis
pub const MIN_BOARD_DIM: usize = 10;

/// Default largest board dimension on either axis
pub const DEFAULT_MAX_BOARD_DIM: usize = 1000;

/// Hard limit on `width * height`, whatever the configured dimension cap
pub const MAX_BOARD_CELLS: usize = 1 << 20;

/// Number of ships each player places
pub const SHIP_COUNT: usize = 5;

/// Cells occupied by one ship (every shape is a tetromino)
pub const CELLS_PER_SHIP: usize = 4;

/// Integers describing one ship in an Initialize packet
pub const PIECE_FIELDS: usize = 4;

/// Integers carried by an Initialize packet
pub const INIT_FIELDS: usize = SHIP_COUNT * PIECE_FIELDS;

/// Default listener port for player 1
pub const DEFAULT_PORT_P1: u16 = 2201;

/// Default listener port for player 2
pub const DEFAULT_PORT_P2: u16 = 2202;

/// The seven tetromino ship shapes, in wire order
///
/// Wire identifiers are 1-based: `O = 1`, `I = 2`, `S = 3`, `L = 4`,
/// `Z = 5`, `J = 6`, `T = 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    O,
    I,
    S,
    L,
    Z,
    J,
    T,
}

impl Shape {
    /// All shapes in wire order
    pub const ALL: [Shape; 7] = [
        Shape::O,
        Shape::I,
        Shape::S,
        Shape::L,
        Shape::Z,
        Shape::J,
        Shape::T,
    ];

    /// Decode a 1-based wire identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use tetromino_battleship_types::Shape;
    ///
    /// assert_eq!(Shape::from_wire(2), Some(Shape::I));
    /// assert_eq!(Shape::from_wire(7), Some(Shape::T));
    /// assert_eq!(Shape::from_wire(0), None);
    /// ```
    pub fn from_wire(value: i32) -> Option<Self> {
        if (1..=Self::ALL.len() as i32).contains(&value) {
            Some(Self::ALL[(value - 1) as usize])
        } else {
            None
        }
    }

    /// 1-based wire identifier
    pub fn wire_id(self) -> u8 {
        match self {
            Shape::O => 1,
            Shape::I => 2,
            Shape::S => 3,
            Shape::L => 4,
            Shape::Z => 5,
            Shape::J => 6,
            Shape::T => 7,
        }
    }

    /// Single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::O => "O",
            Shape::I => "I",
            Shape::S => "S",
            Shape::L => "L",
            Shape::Z => "Z",
            Shape::J => "J",
            Shape::T => "T",
        }
    }
}

/// Clockwise quarter turns away from a shape's base orientation
///
/// Always normalized to `0..=3`, so `Rotation::new(r)` and
/// `Rotation::new(r + 4)` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u8);

impl Rotation {
    /// Base orientation (0 quarter turns)
    pub const BASE: Rotation = Rotation(0);

    /// Build from a quarter-turn count (reduced modulo 4)
    pub const fn new(turns: u32) -> Self {
        Rotation((turns % 4) as u8)
    }

    /// Decode a 1-based wire rotation (`1..=4`)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetromino_battleship_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_wire(1).map(|r| r.turns()), Some(0));
    /// assert_eq!(Rotation::from_wire(3).map(|r| r.turns()), Some(2));
    /// assert_eq!(Rotation::from_wire(5), None);
    /// ```
    pub fn from_wire(value: i32) -> Option<Self> {
        if (1..=4).contains(&value) {
            Some(Rotation((value - 1) as u8))
        } else {
            None
        }
    }

    /// Quarter turns in `0..=3`
    pub fn turns(self) -> u32 {
        self.0 as u32
    }

    /// Rotate one more quarter turn clockwise
    pub fn rotate_cw(self) -> Self {
        Rotation::new(self.0 as u32 + 1)
    }

    /// 1-based wire value
    pub fn wire_id(self) -> u8 {
        self.0 + 1
    }
}

/// One of the two seats in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Both players, player 1 first
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The other player
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index for per-player arrays (0 or 1)
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// 1-based seat number used in logs
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Result recorded for a fired shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotMark {
    Hit,
    Miss,
}

impl ShotMark {
    /// Wire letter (`H` or `M`)
    pub fn as_char(self) -> char {
        match self {
            ShotMark::Hit => 'H',
            ShotMark::Miss => 'M',
        }
    }
}

/// Numeric error codes sent as `E <code>`
///
/// Variants are declared in ascending numeric order, so the derived `Ord`
/// agrees with the numeric order of [`ErrorCode::as_u16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Packet type not accepted in the current phase
    InvalidPacketType = 100,
    /// Initialize packet has the wrong number of fields or non-integer fields
    InvalidInitialize = 101,
    /// Begin packet has the wrong format or dimensions below the minimum
    InvalidBegin = 200,
    /// Initialize packet ends in the middle of a piece group
    InvalidPieceFieldCount = 201,
    /// Shoot packet has the wrong format
    InvalidShoot = 202,
    /// Shape identifier outside `1..=7`
    ShapeOutOfRange = 300,
    /// Rotation outside `1..=4`
    RotationOutOfRange = 301,
    /// Piece falls outside the board
    PieceOutOfBounds = 302,
    /// Piece overlaps an already placed piece
    Overlap = 303,
    /// Shot outside the board
    ShotOutOfBounds = 400,
    /// Cell already targeted
    AlreadyTargeted = 401,
}

impl ErrorCode {
    /// Numeric wire code
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_order_matches_numeric_order() {
        let codes = [
            ErrorCode::InvalidPacketType,
            ErrorCode::InvalidInitialize,
            ErrorCode::InvalidBegin,
            ErrorCode::InvalidPieceFieldCount,
            ErrorCode::InvalidShoot,
            ErrorCode::ShapeOutOfRange,
            ErrorCode::RotationOutOfRange,
            ErrorCode::PieceOutOfBounds,
            ErrorCode::Overlap,
            ErrorCode::ShotOutOfBounds,
            ErrorCode::AlreadyTargeted,
        ];
        for pair in codes.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].as_u16() < pair[1].as_u16());
        }
    }

    #[test]
    fn shape_wire_ids_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_wire(shape.wire_id() as i32), Some(shape));
        }
        assert_eq!(Shape::from_wire(-1), None);
    }

    #[test]
    fn rotation_is_normalized() {
        assert_eq!(Rotation::new(5), Rotation::new(1));
        assert_eq!(Rotation::new(3).rotate_cw(), Rotation::BASE);
        assert_eq!(Rotation::from_wire(0), None);
        assert_eq!(Rotation::from_wire(2).unwrap().wire_id(), 2);
    }

    #[test]
    fn players_alternate() {
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.number(), 2);
        assert_eq!(PlayerId::One.to_string(), "player 1");
    }
}
