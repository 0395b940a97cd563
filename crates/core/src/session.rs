//! Game session - the phase/turn state machine
//!
//! A session owns both players' boards and shot histories and is driven one
//! event at a time: a decoded packet from a player, a disconnect, or an idle
//! timeout. Each event returns the packets to send, addressed per player.
//! Nothing here performs I/O, so the whole protocol is testable without
//! sockets.
//!
//! Phases run in order with no skipping:
//!
//! ```text
//! AwaitBeginP1 -> AwaitBeginP2 -> AwaitInitP1 -> AwaitInitP2 -> Turn(p) -> Draining -> GameOver
//! ```
//!
//! `Draining` is entered when a shot sinks the opponent's last ship: the
//! shooter has already received `H 1`, and the loser receives `H 0` once
//! their next packet (or disconnect) arrives. Forfeits, disconnects and
//! timeouts jump straight to `GameOver`.

use arrayvec::ArrayVec;

use crate::board::{Board, ShotOutcome};
use crate::errors::{DecodeError, PacketKind};
use crate::pieces::ShipPlacement;
use crate::protocol::{parse_command, Command, Response};
use crate::shots::ShotHistory;
use crate::types::{
    ErrorCode, PlayerId, DEFAULT_MAX_BOARD_DIM, MAX_BOARD_CELLS, MIN_BOARD_DIM, SHIP_COUNT,
};

/// Where the session is in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitBeginP1,
    AwaitBeginP2,
    AwaitInitP1,
    AwaitInitP2,
    Turn(PlayerId),
    /// Winner known; waiting for the loser's next packet before `H 0`
    Draining { loser: PlayerId },
    GameOver,
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    AllShipsSunk,
    Forfeit,
    Disconnect,
    Timeout,
}

/// Final outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: PlayerId,
    pub reason: EndReason,
}

impl GameResult {
    pub fn loser(&self) -> PlayerId {
        self.winner.opponent()
    }
}

/// A packet addressed to one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: PlayerId,
    pub response: Response,
}

/// Packets produced by a single event
pub type Outbox = ArrayVec<Outbound, 4>;

/// Session tuning
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Largest accepted width/height
    pub max_dimension: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_BOARD_DIM,
        }
    }
}

/// Per-player state, allocated once dimensions are agreed
#[derive(Debug, Clone)]
struct PlayerState {
    /// This player's own ships, fired upon by the opponent
    board: Board,
    /// This player's shots at the opponent
    shots: ShotHistory,
    /// Cached count of this player's ships still afloat
    remaining: usize,
}

impl PlayerState {
    fn new(width: usize, height: usize) -> Self {
        Self {
            board: Board::new(width, height),
            shots: ShotHistory::new(width, height),
            remaining: 0,
        }
    }
}

/// One two-player game
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    phase: Phase,
    dimensions: Option<(usize, usize)>,
    players: Option<[PlayerState; 2]>,
    result: Option<GameResult>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: Phase::AwaitBeginP1,
            dimensions: None,
            players: None,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once nothing more will be sent to either player
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Agreed `(width, height)`, once player 1's Begin was accepted
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }

    /// The player whose packet the current phase waits for
    pub fn awaiting(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::AwaitBeginP1 | Phase::AwaitInitP1 => Some(PlayerId::One),
            Phase::AwaitBeginP2 | Phase::AwaitInitP2 => Some(PlayerId::Two),
            Phase::Turn(p) => Some(p),
            Phase::Draining { loser } => Some(loser),
            Phase::GameOver => None,
        }
    }

    /// A player's own board (released at game over)
    pub fn board(&self, player: PlayerId) -> Option<&Board> {
        self.players.as_ref().map(|p| &p[player.index()].board)
    }

    /// A player's record of shots at the opponent (released at game over)
    pub fn shots(&self, player: PlayerId) -> Option<&ShotHistory> {
        self.players.as_ref().map(|p| &p[player.index()].shots)
    }

    /// Cached count of a player's ships still afloat
    pub fn remaining_ships(&self, player: PlayerId) -> Option<usize> {
        self.players.as_ref().map(|p| p[player.index()].remaining)
    }

    /// Decode a raw packet from `from` and apply it
    pub fn handle_line(&mut self, from: PlayerId, line: &str) -> Outbox {
        self.handle(from, parse_command(line))
    }

    /// Apply a decoded (or undecodable) packet from `from`
    pub fn handle(&mut self, from: PlayerId, packet: Result<Command, DecodeError>) -> Outbox {
        let mut out = Outbox::new();

        match self.phase {
            Phase::GameOver => return out,
            Phase::Draining { loser } => {
                if from == loser {
                    out.push(halt(loser, false));
                    self.finish();
                }
                return out;
            }
            _ => {}
        }

        if let Ok(Command::Forfeit) = packet {
            return self.end_early(from, EndReason::Forfeit);
        }

        if self.awaiting() != Some(from) {
            out.push(error(from, ErrorCode::InvalidPacketType));
            return out;
        }

        let command = match packet {
            Ok(command) if self.expects(command.kind()) => command,
            Ok(_) => {
                out.push(error(from, ErrorCode::InvalidPacketType));
                return out;
            }
            Err(DecodeError {
                kind: Some(kind),
                code,
            }) if self.expects(kind) => {
                out.push(error(from, code));
                return out;
            }
            Err(_) => {
                out.push(error(from, ErrorCode::InvalidPacketType));
                return out;
            }
        };

        match (self.phase, command) {
            (Phase::AwaitBeginP1, Command::Begin { width, height }) => {
                out.push(self.begin(width, height));
            }
            (Phase::AwaitBeginP2, Command::BeginAck) => {
                self.phase = Phase::AwaitInitP1;
                out.push(ack(PlayerId::Two));
            }
            // bare ack from player 1, or dimensions from player 2
            (Phase::AwaitBeginP1 | Phase::AwaitBeginP2, _) => {
                out.push(error(from, ErrorCode::InvalidBegin));
            }
            (Phase::AwaitInitP1 | Phase::AwaitInitP2, Command::Initialize(placements)) => {
                out.push(self.initialize(from, &placements));
            }
            (Phase::Turn(_), Command::Query) => {
                out.push(self.query(from));
            }
            (Phase::Turn(_), Command::Shoot { row, col }) => {
                self.shoot(from, row, col, &mut out);
            }
            _ => out.push(error(from, ErrorCode::InvalidPacketType)),
        }
        out
    }

    /// A player's connection closed
    pub fn handle_disconnect(&mut self, who: PlayerId) -> Outbox {
        match self.phase {
            Phase::GameOver => Outbox::new(),
            Phase::Draining { loser } => {
                if who == loser {
                    self.finish();
                }
                Outbox::new()
            }
            _ => {
                let mut out = Outbox::new();
                out.push(halt(who.opponent(), true));
                self.conclude(who.opponent(), EndReason::Disconnect);
                out
            }
        }
    }

    /// The awaited player stayed silent too long
    pub fn handle_timeout(&mut self) -> Outbox {
        match self.phase {
            Phase::GameOver => Outbox::new(),
            Phase::Draining { loser } => {
                let mut out = Outbox::new();
                out.push(halt(loser, false));
                self.finish();
                out
            }
            _ => match self.awaiting() {
                Some(idle) => self.end_early(idle, EndReason::Timeout),
                None => Outbox::new(),
            },
        }
    }

    fn expects(&self, kind: PacketKind) -> bool {
        match self.phase {
            Phase::AwaitBeginP1 | Phase::AwaitBeginP2 => kind == PacketKind::Begin,
            Phase::AwaitInitP1 | Phase::AwaitInitP2 => kind == PacketKind::Initialize,
            Phase::Turn(_) => matches!(kind, PacketKind::Shoot | PacketKind::Query),
            Phase::Draining { .. } | Phase::GameOver => false,
        }
    }

    fn begin(&mut self, width: i32, height: i32) -> Outbound {
        let min = MIN_BOARD_DIM as i32;
        if width < min || height < min {
            return error(PlayerId::One, ErrorCode::InvalidBegin);
        }
        let (width, height) = (width as usize, height as usize);
        let max = self.config.max_dimension;
        let too_many_cells = width
            .checked_mul(height)
            .map_or(true, |cells| cells > MAX_BOARD_CELLS);
        if width > max || height > max || too_many_cells {
            return error(PlayerId::One, ErrorCode::InvalidBegin);
        }

        self.dimensions = Some((width, height));
        self.players = Some([
            PlayerState::new(width, height),
            PlayerState::new(width, height),
        ]);
        self.phase = Phase::AwaitBeginP2;
        ack(PlayerId::One)
    }

    fn initialize(&mut self, from: PlayerId, placements: &[ShipPlacement]) -> Outbound {
        let (Some((width, height)), Some(players)) = (self.dimensions, self.players.as_mut())
        else {
            return error(from, ErrorCode::InvalidPacketType);
        };

        // Pass 1: every piece against a scratch board; lowest code wins.
        let mut scratch = Board::new(width, height);
        let lowest = placements
            .iter()
            .zip(1..)
            .filter_map(|(placement, ship)| scratch.place_ship(placement, ship).err())
            .map(|e| e.code())
            .min();
        if let Some(code) = lowest {
            return error(from, code);
        }

        // Pass 2: all pieces are valid, commit them.
        let state = &mut players[from.index()];
        for (placement, ship) in placements.iter().zip(1..) {
            if let Err(e) = state.board.place_ship(placement, ship) {
                state.board.clear();
                return error(from, e.code());
            }
        }
        state.remaining = state.board.remaining_ship_count();
        debug_assert_eq!(state.remaining, SHIP_COUNT);

        self.phase = match from {
            PlayerId::One => Phase::AwaitInitP2,
            PlayerId::Two => Phase::Turn(PlayerId::One),
        };
        ack(from)
    }

    fn query(&self, from: PlayerId) -> Outbound {
        let Some(players) = self.players.as_ref() else {
            return error(from, ErrorCode::InvalidPacketType);
        };
        Outbound {
            to: from,
            response: Response::QueryResult {
                remaining: players[from.opponent().index()].remaining,
                shots: players[from.index()].shots.summarize(),
            },
        }
    }

    fn shoot(&mut self, from: PlayerId, row: i32, col: i32, out: &mut Outbox) {
        let Some(players) = self.players.as_mut() else {
            out.push(error(from, ErrorCode::InvalidPacketType));
            return;
        };
        let (shooter, target) = match from {
            PlayerId::One => {
                let [a, b] = players;
                (a, b)
            }
            PlayerId::Two => {
                let [a, b] = players;
                (b, a)
            }
        };

        if let Err(e) = shooter.shots.check(row, col) {
            out.push(error(from, e.code()));
            return;
        }
        let outcome = match target.board.shoot(row, col) {
            Ok(outcome) => outcome,
            Err(e) => {
                out.push(error(from, e.code()));
                return;
            }
        };
        if let Err(e) = shooter.shots.record(row, col, outcome.mark()) {
            out.push(error(from, e.code()));
            return;
        }

        if let ShotOutcome::Hit(ship) = outcome {
            if target.board.is_sunk(ship) {
                target.remaining = target.remaining.saturating_sub(1);
            }
        }
        debug_assert_eq!(target.remaining, target.board.remaining_ship_count());

        let remaining = target.remaining;
        out.push(Outbound {
            to: from,
            response: Response::ShotResult {
                remaining,
                mark: outcome.mark(),
            },
        });

        if remaining == 0 {
            out.push(halt(from, true));
            self.result = Some(GameResult {
                winner: from,
                reason: EndReason::AllShipsSunk,
            });
            self.phase = Phase::Draining {
                loser: from.opponent(),
            };
        } else {
            self.phase = Phase::Turn(from.opponent());
        }
    }

    /// `loser` leaves before the game is decided by shots
    fn end_early(&mut self, loser: PlayerId, reason: EndReason) -> Outbox {
        let mut out = Outbox::new();
        out.push(halt(loser, false));
        out.push(halt(loser.opponent(), true));
        self.conclude(loser.opponent(), reason);
        out
    }

    fn conclude(&mut self, winner: PlayerId, reason: EndReason) {
        self.result = Some(GameResult { winner, reason });
        self.finish();
    }

    /// Enter `GameOver` and release both boards and shot histories
    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.players = None;
    }
}

fn ack(to: PlayerId) -> Outbound {
    Outbound {
        to,
        response: Response::Ack,
    }
}

fn error(to: PlayerId, code: ErrorCode) -> Outbound {
    Outbound {
        to,
        response: Response::Error(code),
    }
}

fn halt(to: PlayerId, won: bool) -> Outbound {
    Outbound {
        to,
        response: Response::Halt { won },
    }
}
