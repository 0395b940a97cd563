//! Protocol module - line-oriented text packets
//!
//! Packets are ASCII, space-delimited, and may or may not carry a trailing
//! newline. Decoding is strict: wrong field counts, non-integer fields and
//! trailing tokens are all rejected with the error code the session reports.
//!
//! | Packet | Direction | Form |
//! |--------|-----------|------|
//! | Begin | client | `B <width> <height>` or bare `B` |
//! | Initialize | client | `I` followed by 20 integers |
//! | Shoot | client | `S <row> <col>` |
//! | Query | client | `Q` |
//! | Forfeit | client | `F` |
//! | Acknowledge | server | `A` |
//! | Error | server | `E <code>` |
//! | Shot result | server | `R <remaining> <H\|M>` |
//! | Query result | server | `G <remaining> (<H\|M> <row> <col>)*` |
//! | Halt | server | `H <0\|1>` |

use std::fmt;

use arrayvec::ArrayVec;

use crate::errors::{DecodeError, PacketKind};
use crate::pieces::ShipPlacement;
use crate::shots::ShotRecord;
use crate::types::{ErrorCode, ShotMark, INIT_FIELDS, PIECE_FIELDS, SHIP_COUNT};

/// A decoded client packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `B <width> <height>`: player 1 proposes dimensions
    Begin { width: i32, height: i32 },
    /// Bare `B`: player 2 accepts the dimensions
    BeginAck,
    /// `I ...`: five ship placements in packet order
    Initialize(ArrayVec<ShipPlacement, SHIP_COUNT>),
    /// `S <row> <col>`
    Shoot { row: i32, col: i32 },
    /// `Q`
    Query,
    /// `F`
    Forfeit,
}

impl Command {
    pub fn kind(&self) -> PacketKind {
        match self {
            Command::Begin { .. } | Command::BeginAck => PacketKind::Begin,
            Command::Initialize(_) => PacketKind::Initialize,
            Command::Shoot { .. } => PacketKind::Shoot,
            Command::Query => PacketKind::Query,
            Command::Forfeit => PacketKind::Forfeit,
        }
    }
}

/// Parse a single packet
///
/// Leading/trailing whitespace (including a trailing `\r\n`) is ignored.
pub fn parse_command(line: &str) -> Result<Command, DecodeError> {
    let mut tokens = line.split_ascii_whitespace();
    let kind = match tokens.next() {
        Some("B") => PacketKind::Begin,
        Some("I") => PacketKind::Initialize,
        Some("S") => PacketKind::Shoot,
        Some("Q") => PacketKind::Query,
        Some("F") => PacketKind::Forfeit,
        _ => return Err(DecodeError::unknown()),
    };
    let fields: Vec<&str> = tokens.collect();

    match kind {
        PacketKind::Begin => parse_begin(&fields),
        PacketKind::Initialize => parse_initialize(&fields),
        PacketKind::Shoot => {
            let err = DecodeError::malformed(PacketKind::Shoot, ErrorCode::InvalidShoot);
            match parse_ints(&fields).ok_or(err)?.as_slice() {
                &[row, col] => Ok(Command::Shoot { row, col }),
                _ => Err(err),
            }
        }
        PacketKind::Query => bare(&fields, kind, Command::Query),
        PacketKind::Forfeit => bare(&fields, kind, Command::Forfeit),
    }
}

fn parse_ints(fields: &[&str]) -> Option<Vec<i32>> {
    fields.iter().map(|f| f.parse::<i32>().ok()).collect()
}

fn bare(fields: &[&str], kind: PacketKind, command: Command) -> Result<Command, DecodeError> {
    if fields.is_empty() {
        Ok(command)
    } else {
        Err(DecodeError::malformed(kind, ErrorCode::InvalidPacketType))
    }
}

fn parse_begin(fields: &[&str]) -> Result<Command, DecodeError> {
    let err = DecodeError::malformed(PacketKind::Begin, ErrorCode::InvalidBegin);
    if fields.is_empty() {
        return Ok(Command::BeginAck);
    }
    match parse_ints(fields).ok_or(err)?.as_slice() {
        &[width, height] => Ok(Command::Begin { width, height }),
        _ => Err(err),
    }
}

fn parse_initialize(fields: &[&str]) -> Result<Command, DecodeError> {
    let values = parse_ints(fields).ok_or(DecodeError::malformed(
        PacketKind::Initialize,
        ErrorCode::InvalidInitialize,
    ))?;
    if values.len() % PIECE_FIELDS != 0 {
        return Err(DecodeError::malformed(
            PacketKind::Initialize,
            ErrorCode::InvalidPieceFieldCount,
        ));
    }
    if values.len() != INIT_FIELDS {
        return Err(DecodeError::malformed(
            PacketKind::Initialize,
            ErrorCode::InvalidInitialize,
        ));
    }
    let placements = values
        .chunks_exact(PIECE_FIELDS)
        .map(|group| ShipPlacement::new(group[0], group[1], group[2], group[3]))
        .collect();
    Ok(Command::Initialize(placements))
}

/// A server packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `A`
    Ack,
    /// `E <code>`
    Error(ErrorCode),
    /// `R <remaining> <H|M>`
    ShotResult { remaining: usize, mark: ShotMark },
    /// `G <remaining> (<H|M> <row> <col>)*`
    QueryResult {
        remaining: usize,
        shots: Vec<ShotRecord>,
    },
    /// `H 1` for the winner, `H 0` for the loser
    Halt { won: bool },
}

impl Response {
    /// Encode without a line terminator
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ack => write!(f, "A"),
            Response::Error(code) => write!(f, "E {}", code.as_u16()),
            Response::ShotResult { remaining, mark } => {
                write!(f, "R {} {}", remaining, mark.as_char())
            }
            Response::QueryResult { remaining, shots } => {
                write!(f, "G {}", remaining)?;
                for shot in shots {
                    write!(f, " {} {} {}", shot.mark.as_char(), shot.row, shot.col)?;
                }
                Ok(())
            }
            Response::Halt { won } => write!(f, "H {}", u8::from(*won)),
        }
    }
}
