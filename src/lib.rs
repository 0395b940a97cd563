//! Tetromino battleship (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetromino_battleship::{types,core,server}`
//! so binaries and integration tests share one import path.

pub use tetromino_battleship_core as core;
pub use tetromino_battleship_server as server;
pub use tetromino_battleship_types as types;
