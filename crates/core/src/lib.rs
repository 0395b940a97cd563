//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the rules of tetromino battleship: ship geometry,
//! the board model, shot bookkeeping, the text packet codec and the session
//! state machine. It has **zero dependencies** on networking or I/O, making it:
//!
//! - **Deterministic**: the same packet sequence always produces the same replies
//! - **Testable**: every protocol rule is exercised without sockets
//! - **Portable**: any transport that can move lines of text can drive it
//!
//! # Module Structure
//!
//! - [`pieces`]: the seven tetromino shapes and quarter-turn rotation
//! - [`board`]: a player's ship grid with placement validation and hit/sunk tracking
//! - [`shots`]: a player's history of shots at the opponent
//! - [`protocol`]: parsing client packets and encoding server packets
//! - [`session`]: phases, turns, forfeits, and game over
//! - [`errors`]: typed errors and their wire codes
//!
//! # Game Rules
//!
//! - Player 1 proposes dimensions (both at least 10), player 2 acknowledges
//! - Each player places five tetromino ships in one atomic Initialize packet
//! - Players alternate shots, player 1 first; a Query never uses up a turn
//! - A ship is sunk when all four of its cells are hit
//! - The first player to sink all five opposing ships wins
//! - Forfeit or disconnect at any point hands the win to the other player
//!
//! # Example
//!
//! ```
//! use tetromino_battleship_core::GameSession;
//! use tetromino_battleship_types::PlayerId;
//!
//! let mut game = GameSession::default();
//! let out = game.handle_line(PlayerId::One, "B 10 10");
//! assert_eq!(out[0].response.encode(), "A");
//!
//! let out = game.handle_line(PlayerId::Two, "B\n");
//! assert_eq!(out[0].to, PlayerId::Two);
//! assert_eq!(out[0].response.encode(), "A");
//! ```

pub mod board;
pub mod errors;
pub mod pieces;
pub mod protocol;
pub mod session;
pub mod shots;

pub use tetromino_battleship_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, ShipId, ShotOutcome};
pub use errors::{DecodeError, PacketKind, PlacementError, ShotError};
pub use pieces::{coordinates_for, get_shape, rotate_offset, ShipPlacement};
pub use protocol::{parse_command, Command, Response};
pub use session::{EndReason, GameResult, GameSession, Outbound, Outbox, Phase, SessionConfig};
pub use shots::{ShotHistory, ShotRecord};
