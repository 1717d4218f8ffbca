//! UCI engine subprocess for chessclick.
//!
//! [`UciEngine`] owns one engine process and talks to it over stdin/stdout
//! from background tokio tasks. Callers drive it through the non-blocking
//! [`MoveProvider`] seam: issue a request, then poll for the reply on later
//! frames.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod process;
pub mod provider;
pub mod uci;

pub use error::EngineError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MoveRequest, ScriptedEngine};
pub use process::{EngineConfig, UciEngine};
pub use provider::MoveProvider;
pub use uci::{UciError, UciMessage};

use cozy_chess::Move;

/// Commands sent to the engine
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Uci,
    IsReady,
    NewGame,
    SetPosition { fen: String, moves: Vec<Move> },
    SetOption { name: String, value: Option<String> },
    Go(GoParams),
    Stop,
    Quit,
}

/// Parameters for the "go" command
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub movetime: Option<u64>, // Move time in milliseconds
}

/// Events received from the engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Identified(String),
    Ready,
    /// `None` when the engine reports it has no move (`bestmove (none)`).
    BestMove(Option<Move>),
    Info(EngineInfo),
    Error(String),
}

/// Engine analysis information
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    pub depth: Option<u8>,
    pub seldepth: Option<u8>,
    pub time_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    pub pv: Vec<Move>, // Principal variation
    pub multipv: Option<u8>,
    pub currmove: Option<Move>,
    pub hashfull: Option<u16>,
    pub nps: Option<u64>,
}

impl EngineInfo {
    /// True when the line carries search progress worth showing.
    pub fn has_progress(&self) -> bool {
        self.depth.is_some() || self.score.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i8), // Negative for being mated
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "{:+.2}", f64::from(*cp) / 100.0),
            Score::Mate(n) if *n < 0 => write!(f, "-M{}", n.unsigned_abs()),
            Score::Mate(n) => write!(f, "M{}", n),
        }
    }
}
