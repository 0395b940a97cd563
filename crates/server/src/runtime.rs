//! Server runtime integration.
//!
//! Event types exchanged between the connection tasks and the session loop,
//! and a blocking entrypoint for the synchronous binary.

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::core::GameResult;
use crate::server::{run_server, ServerConfig};
use crate::types::PlayerId;

/// Event delivered to the session loop by a connection's reader task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One framed packet, without its terminator
    Packet { player: PlayerId, line: String },
    /// The player's stream hit end-of-stream or a read error
    Disconnected { player: PlayerId },
}

impl SessionEvent {
    pub fn player(&self) -> PlayerId {
        match self {
            SessionEvent::Packet { player, .. } | SessionEvent::Disconnected { player } => *player,
        }
    }
}

/// Run one full game on a fresh tokio runtime, blocking the caller.
pub fn run_blocking(config: ServerConfig) -> anyhow::Result<GameResult> {
    let rt = Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(run_server(config, None))
}
