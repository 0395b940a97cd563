//! Game server runner (default binary).
//!
//! Plays exactly one game between the first client on each player port, then
//! exits. Configuration comes from `BATTLESHIP_*` environment variables and
//! log filtering from `RUST_LOG`.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetromino_battleship::server::{check_tcp_listen_available, run_blocking, ServerConfig};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("tetromino_battleship=info,tetromino_battleship_server=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env();

    // Fail fast with a readable error before spawning anything.
    for port in [config.port1, config.port2] {
        check_tcp_listen_available(&config.host, port)
            .with_context(|| format!("port {} on {} is not available", port, config.host))?;
    }

    let result = run_blocking(config)?;
    info!(
        winner = result.winner.number(),
        reason = ?result.reason,
        "session finished"
    );
    Ok(())
}
