//! Rules oracle for chessclick: a thin, project-owned layer over cozy-chess.

pub mod converters;
pub mod fen;
pub mod game;
pub mod outcome;
pub mod types;
pub mod uci;

pub use converters::*;
pub use fen::{FenError, STARTING_FEN};
pub use game::{Game, GameError, HistoryEntry, StartPosition};
pub use outcome::{GameResult, GameStatus, Termination};
pub use types::{PieceColor, PieceKind};
pub use uci::{convert_uci_castling_to_cozy, format_uci_move};

// Board coordinates and moves are cozy-chess types throughout the workspace.
pub use cozy_chess::{File, Move, Piece, Rank, Square};
