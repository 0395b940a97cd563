//! TCP server for the game
//!
//! Binds one listener per player, accepts exactly one connection on each and
//! drives a single session to completion. Uses tokio for async networking.
//!
//! Every connection gets a reader task and a writer task. Readers frame
//! packets and push them into one bounded channel; the session loop is the
//! only consumer, so session state is never shared between tasks.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::core::{GameResult, GameSession, Outbox, Response, SessionConfig};
use crate::framing::{PacketFramer, MAX_PACKET_LEN};
use crate::runtime::SessionEvent;
use crate::types::{PlayerId, DEFAULT_MAX_BOARD_DIM, DEFAULT_PORT_P1, DEFAULT_PORT_P2};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port1: u16,
    pub port2: u16,
    /// Silence from the awaited player longer than this is a forfeit
    pub idle_timeout: Option<Duration>,
    /// Largest accepted board width/height
    pub max_dimension: usize,
    /// Append every packet in both directions to this file as JSON lines
    pub log_path: Option<String>,
    /// Terminate replies with `\n`
    pub newline: bool,
    /// Capacity of the reader -> session channel
    pub max_pending_events: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port1: DEFAULT_PORT_P1,
            port2: DEFAULT_PORT_P2,
            idle_timeout: None,
            max_dimension: DEFAULT_MAX_BOARD_DIM,
            log_path: None,
            newline: true,
            max_pending_events: 16,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("BATTLESHIP_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port1 = env_parse("BATTLESHIP_PORT1").unwrap_or(defaults.port1);
        let port2 = env_parse("BATTLESHIP_PORT2").unwrap_or(defaults.port2);

        let idle_timeout = env_parse::<u64>("BATTLESHIP_IDLE_TIMEOUT_SECS")
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let max_dimension = env_parse("BATTLESHIP_MAX_DIM").unwrap_or(defaults.max_dimension);

        let log_path = env::var("BATTLESHIP_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let newline = env::var("BATTLESHIP_NEWLINE")
            .map(|v| !(v.trim() == "0" || v.trim().eq_ignore_ascii_case("false")))
            .unwrap_or(defaults.newline);

        let max_pending_events =
            env_parse("BATTLESHIP_MAX_PENDING").unwrap_or(defaults.max_pending_events);

        Self {
            host,
            port1,
            port2,
            idle_timeout,
            max_dimension,
            log_path,
            newline,
            max_pending_events,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_dimension: self.max_dimension,
        }
    }
}

/// Check that `host:port` can be bound right now
pub fn check_tcp_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    std::net::TcpListener::bind((host, port)).map(drop)
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    In,
    Out,
}

/// One line of the wire log
#[derive(Debug, Clone, Serialize)]
struct WireRecord {
    ts: u64,
    player: u8,
    dir: Direction,
    line: String,
}

type WireLog = Option<mpsc::UnboundedSender<WireRecord>>;

fn log_wire(wire_log: &WireLog, player: PlayerId, dir: Direction, line: &str) {
    if let Some(tx) = wire_log.as_ref() {
        let _ = tx.send(WireRecord {
            ts: current_timestamp_ms(),
            player: player.number(),
            dir,
            line: line.to_string(),
        });
    }
}

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<WireRecord> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(%path, error = %e, "wire log disabled");
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(256);
        while let Some(rec) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &rec).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Bind both listeners, accept player 1 then player 2, and play one game
///
/// `ready_tx` receives the two bound addresses once both listeners are up.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<(SocketAddr, SocketAddr)>>,
) -> anyhow::Result<GameResult> {
    let listener1 = TcpListener::bind((config.host.as_str(), config.port1))
        .await
        .with_context(|| format!("failed to bind {}:{} for player 1", config.host, config.port1))?;
    let listener2 = TcpListener::bind((config.host.as_str(), config.port2))
        .await
        .with_context(|| format!("failed to bind {}:{} for player 2", config.host, config.port2))?;
    let addr1 = listener1.local_addr()?;
    let addr2 = listener2.local_addr()?;
    info!(%addr1, %addr2, "listening for players");
    if let Some(tx) = ready_tx {
        let _ = tx.send((addr1, addr2));
    }

    info!("waiting for player 1");
    let (stream1, peer1) = listener1
        .accept()
        .await
        .context("accept failed for player 1")?;
    info!(%peer1, "player 1 connected");

    info!("waiting for player 2");
    let (stream2, peer2) = listener2
        .accept()
        .await
        .context("accept failed for player 2")?;
    info!(%peer2, "player 2 connected");

    // exactly two players per process
    drop(listener1);
    drop(listener2);

    let _ = stream1.set_nodelay(true);
    let _ = stream2.set_nodelay(true);

    run_session(&config, stream1, stream2).await
}

/// Drive one session over two already-connected duplex streams
pub async fn run_session<A, B>(
    config: &ServerConfig,
    player1: A,
    player2: B,
) -> anyhow::Result<GameResult>
where
    A: AsyncRead + AsyncWrite + Send + 'static,
    B: AsyncRead + AsyncWrite + Send + 'static,
{
    let wire_log: WireLog = config.log_path.clone().map(spawn_wire_log);
    let (event_tx, mut event_rx) =
        mpsc::channel::<SessionEvent>(config.max_pending_events.max(1));

    let connections = [
        Connection::spawn(
            PlayerId::One,
            player1,
            event_tx.clone(),
            wire_log.clone(),
            config.newline,
        ),
        Connection::spawn(
            PlayerId::Two,
            player2,
            event_tx,
            wire_log.clone(),
            config.newline,
        ),
    ];
    drop(wire_log);

    let mut session = GameSession::new(config.session_config());
    let mut phase = session.phase();
    // only the awaited player's packets push the deadline back
    let mut deadline = config.idle_timeout.map(|limit| Instant::now() + limit);

    while !session.is_over() {
        let next = match deadline {
            Some(at) => tokio::time::timeout_at(at, event_rx.recv()).await.ok(),
            None => Some(event_rx.recv().await),
        };
        let awaited = session.awaiting();
        if let (Some(Some(SessionEvent::Packet { player, .. })), Some(limit)) =
            (&next, config.idle_timeout)
        {
            if awaited == Some(*player) {
                deadline = Some(Instant::now() + limit);
            }
        }

        let out = match next {
            None => {
                warn!(awaiting = ?session.awaiting(), "idle timeout");
                session.handle_timeout()
            }
            // every reader is gone
            Some(None) => break,
            Some(Some(SessionEvent::Packet { player, line })) => {
                debug!(player = player.number(), %line, "packet");
                session.handle_line(player, &line)
            }
            Some(Some(SessionEvent::Disconnected { player })) => {
                info!(player = player.number(), "disconnected");
                session.handle_disconnect(player)
            }
        };
        dispatch(&connections, out);

        if session.phase() != phase {
            phase = session.phase();
            info!(?phase, "phase changed");
        }
        if session.awaiting() != awaited {
            deadline = config.idle_timeout.map(|limit| Instant::now() + limit);
        }
    }

    for conn in connections {
        conn.close().await;
    }

    let result = session
        .result()
        .ok_or_else(|| anyhow!("both players left before the game started"))?;
    info!(
        winner = result.winner.number(),
        reason = ?result.reason,
        "game over"
    );
    Ok(result)
}

fn dispatch(connections: &[Connection; 2], out: Outbox) {
    for msg in out {
        if let Response::Error(code) = msg.response {
            warn!(player = msg.to.number(), code = code.as_u16(), "rejected packet");
        }
        connections[msg.to.index()].send(msg.response.encode());
    }
}

/// Reader and writer tasks for one player
struct Connection {
    out_tx: mpsc::UnboundedSender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Connection {
    fn spawn<S>(
        player: PlayerId,
        stream: S,
        events: mpsc::Sender<SessionEvent>,
        wire_log: WireLog,
        newline: bool,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();

        let reader = tokio::spawn(read_packets(player, read_half, events, wire_log.clone()));
        let writer = tokio::spawn(write_packets(player, write_half, out_rx, wire_log, newline));

        Self {
            out_tx,
            reader,
            writer,
        }
    }

    fn send(&self, line: String) {
        let _ = self.out_tx.send(line);
    }

    /// Stop reading, then let the writer flush what is queued
    async fn close(self) {
        self.reader.abort();
        drop(self.out_tx);
        let _ = self.writer.await;
    }
}

async fn read_packets<R>(
    player: PlayerId,
    mut reader: R,
    events: mpsc::Sender<SessionEvent>,
    wire_log: WireLog,
) where
    R: AsyncRead + Unpin,
{
    let mut framer = PacketFramer::new();
    let mut buf = vec![0u8; MAX_PACKET_LEN];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(player = player.number(), error = %e, "read failed");
                break;
            }
        };

        for line in framer.push(&buf[..n]) {
            log_wire(&wire_log, player, Direction::In, &line);
            if events
                .send(SessionEvent::Packet { player, line })
                .await
                .is_err()
            {
                return;
            }
        }
    }

    if let Some(line) = framer.finish() {
        log_wire(&wire_log, player, Direction::In, &line);
        if events
            .send(SessionEvent::Packet { player, line })
            .await
            .is_err()
        {
            return;
        }
    }
    let _ = events.send(SessionEvent::Disconnected { player }).await;
}

async fn write_packets<W>(
    player: PlayerId,
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<String>,
    wire_log: WireLog,
    newline: bool,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
        if newline && writer.write_all(b"\n").await.is_err() {
            break;
        }
        if writer.flush().await.is_err() {
            break;
        }
        log_wire(&wire_log, player, Direction::Out, &line);
    }
    let _ = writer.shutdown().await;
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
