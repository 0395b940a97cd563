//! Server module - two-player game over TCP with a text protocol
//!
//! This module connects two players to one [`GameSession`](crate::core::GameSession).
//! Each player has a dedicated listener; the first connection on each port
//! takes that seat.
//!
//! # Protocol Overview
//!
//! The server speaks a **space-delimited text protocol** over TCP:
//!
//! 1. **Connection**: player 1 connects to port 2201, player 2 to port 2202
//! 2. **Begin**: player 1 sends `B <width> <height>`, player 2 sends `B`
//! 3. **Initialize**: each player sends `I` and five ship placements
//! 4. **Play**: players alternate `S <row> <col>`; `Q` reports your own shots
//! 5. **Halt**: the server sends `H 1` to the winner and `H 0` to the loser
//!
//! `F` at any time concedes. Closing the connection is the same as `F`.
//!
//! # Environment Variables
//!
//! - `BATTLESHIP_HOST`: Bind address (default: "127.0.0.1")
//! - `BATTLESHIP_PORT1` / `BATTLESHIP_PORT2`: Player ports (default: 2201 / 2202)
//! - `BATTLESHIP_IDLE_TIMEOUT_SECS`: Forfeit the awaited player if they stay silent this long
//! - `BATTLESHIP_MAX_DIM`: Reject boards wider or taller than this (default: 1000)
//! - `BATTLESHIP_LOG_PATH`: Append every packet to this file as JSON lines
//! - `BATTLESHIP_NEWLINE`: Set to "0" to send replies without a trailing newline
//!
//! # Example Protocol Flow
//!
//! ```text
//! P1 -> Server: B 10 10           Server -> P1: A
//! P2 -> Server: B                 Server -> P2: A
//! P1 -> Server: I 2 1 0 0 ...     Server -> P1: A
//! P2 -> Server: I 1 1 5 5 ...     Server -> P2: A
//! P1 -> Server: S 0 0             Server -> P1: R 5 M
//! P2 -> Server: Q                 Server -> P2: G 5
//! P2 -> Server: F                 Server -> P2: H 0, Server -> P1: H 1
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - One reader task per connection feeds a single channel; the session loop
//!   consumes it, so only one task ever touches game state
//! - See [`framing`] for how packets are cut out of raw reads
//! - See [`server`] for the listener and session loop

pub mod framing;
pub mod runtime;
pub mod server;

pub use tetromino_battleship_core as core;
pub use tetromino_battleship_types as types;

pub use framing::PacketFramer;
pub use runtime::{run_blocking, SessionEvent};
pub use server::*;
