use cozy_chess::{Board, Color, GameStatus as BoardStatus, Move, Piece, Rank, Square};
use std::collections::HashMap;

use crate::converters::{file_to_char, rank_to_char};
use crate::outcome::{insufficient_material, GameResult, GameStatus, Termination};
use crate::types::{PieceColor, PieceKind};
use crate::uci::convert_uci_castling_to_cozy;

/// Number of occurrences of one position that ends the game.
const FIVEFOLD: u8 = 5;

/// Plies without a capture or pawn move that end the game.
const SEVENTY_FIVE_MOVE_PLIES: u16 = 150;

/// Main game state wrapper around cozy-chess Board
#[derive(Debug, Clone)]
pub struct Game {
    position: Board,
    history: Vec<HistoryEntry>,
    repetitions: HashMap<u64, u8>,
    // cozy-chess stops counting at 100.
    halfmove_clock: u16,
    start_position: StartPosition,
}

/// Record of one applied half-move.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mv: Move,
    pub piece: PieceKind,
    pub piece_color: PieceColor,
    pub captured: Option<PieceKind>,
    pub san: String,
    pub fen: String,
}

/// Starting position of the game
#[derive(Debug, Clone)]
pub enum StartPosition {
    Standard,
    Fen(String),
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        Self::with_position(Board::default(), 0, StartPosition::Standard)
    }

    /// Create a game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let (position, halfmove_clock) = crate::fen::parse_fen_with_clock(fen)?;
        Ok(Self::with_position(
            position,
            halfmove_clock,
            StartPosition::Fen(fen.trim().to_string()),
        ))
    }

    fn with_position(
        position: Board,
        halfmove_clock: u16,
        start_position: StartPosition,
    ) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(position.hash(), 1);
        Self {
            position,
            history: Vec::new(),
            repetitions,
            halfmove_clock,
            start_position,
        }
    }

    /// Get the current board position
    pub fn position(&self) -> &Board {
        &self.position
    }

    pub fn start_position(&self) -> &StartPosition {
        &self.start_position
    }

    /// Get the move history
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Get the side to move
    pub fn side_to_move(&self) -> PieceColor {
        self.position.side_to_move().into()
    }

    /// Color of the piece on `square`, if any.
    pub fn piece_owner(&self, square: Square) -> Option<PieceColor> {
        self.position.color_on(square).map(PieceColor::from)
    }

    pub fn piece_at(&self, square: Square) -> Option<(PieceKind, PieceColor)> {
        let piece = self.position.piece_on(square)?;
        let color = self.position.color_on(square)?;
        Some((piece.into(), color.into()))
    }

    /// Get all legal moves for the current position
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.position.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Build the move meant by a source and destination square.
    ///
    /// A king stepping two files is rewritten to cozy-chess castling notation
    /// and a pawn reaching the last rank promotes to a queen. The result is not
    /// checked for legality.
    pub fn resolve_move(&self, from: Square, to: Square) -> Move {
        let moving_piece = self.position.piece_on(from);
        let mv = Move {
            from,
            to,
            promotion: None,
        };
        let mv = convert_uci_castling_to_cozy(mv, moving_piece, &self.legal_moves());

        if moving_piece == Some(Piece::Pawn) && matches!(to.rank(), Rank::First | Rank::Eighth) {
            return Move {
                promotion: Some(Piece::Queen),
                ..mv
            };
        }
        mv
    }

    /// Rewrite a move in standard UCI notation into the form cozy-chess plays.
    pub fn normalize_uci_move(&self, mv: Move) -> Move {
        convert_uci_castling_to_cozy(mv, self.position.piece_on(mv.from), &self.legal_moves())
    }

    /// Apply a legal move, recording it in the history.
    pub fn apply(&mut self, mv: Move) -> Result<HistoryEntry, GameError> {
        if !self.is_legal(mv) {
            return Err(GameError::IllegalMove);
        }

        let piece = self
            .position
            .piece_on(mv.from)
            .ok_or(GameError::IllegalMove)?;
        let piece_color = self
            .position
            .color_on(mv.from)
            .ok_or(GameError::IllegalMove)?;
        let captured = self.captured_piece(mv, piece, piece_color);

        let mut san = generate_san(&self.position, mv, piece);

        self.position
            .try_play(mv)
            .map_err(|_| GameError::IllegalMove)?;

        match self.position.status() {
            BoardStatus::Won => san.push('#'),
            _ if !self.position.checkers().is_empty() => san.push('+'),
            _ => {}
        }

        *self.repetitions.entry(self.position.hash()).or_insert(0) += 1;
        self.halfmove_clock = if piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        let entry = HistoryEntry {
            mv,
            piece: piece.into(),
            piece_color: piece_color.into(),
            captured: captured.map(PieceKind::from),
            san,
            fen: self.to_fen(),
        };
        self.history.push(entry.clone());

        Ok(entry)
    }

    fn captured_piece(&self, mv: Move, piece: Piece, color: Color) -> Option<Piece> {
        match self.position.color_on(mv.to) {
            Some(target) if target != color => self.position.piece_on(mv.to),
            Some(_) => None, // castling: king onto own rook
            None if piece == Piece::Pawn && mv.from.file() != mv.to.file() => Some(Piece::Pawn),
            None => None,
        }
    }

    /// Current status, including draws cozy-chess does not report itself.
    pub fn status(&self) -> GameStatus {
        match self.result() {
            Some(result) => GameStatus::Over(result),
            None => GameStatus::InProgress,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_over()
    }

    /// Result of the game, or `None` while it is still in progress.
    pub fn result(&self) -> Option<GameResult> {
        match self.position.status() {
            BoardStatus::Won => {
                let loser: PieceColor = self.position.side_to_move().into();
                return Some(GameResult::win(loser.opponent(), Termination::Checkmate));
            }
            // cozy-chess also reports the fifty-move rule as drawn; that
            // draw is only claimable, so just stalemate ends the game here.
            BoardStatus::Drawn if self.legal_moves().is_empty() => {
                return Some(GameResult::draw(Termination::Stalemate));
            }
            BoardStatus::Drawn | BoardStatus::Ongoing => {}
        }

        if insufficient_material(&self.position) {
            return Some(GameResult::draw(Termination::InsufficientMaterial));
        }
        if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
            return Some(GameResult::draw(Termination::SeventyFiveMoveRule));
        }
        if self.repetition_count() >= FIVEFOLD {
            return Some(GameResult::draw(Termination::FivefoldRepetition));
        }
        None
    }

    /// How often the current position has occurred in this game.
    pub fn repetition_count(&self) -> u8 {
        self.repetitions
            .get(&self.position.hash())
            .copied()
            .unwrap_or(0)
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Export position to FEN string
    pub fn to_fen(&self) -> String {
        crate::fen::format_fen_with_clock(&self.position, self.halfmove_clock)
    }
}

/// Generate simplified SAN notation for a move (check marks are added by the caller)
fn generate_san(board: &Board, mv: Move, piece: Piece) -> String {
    if piece == Piece::King && board.color_on(mv.to) == board.color_on(mv.from) {
        return if mv.to.file() as usize > mv.from.file() as usize {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();
    let is_capture = board.piece_on(mv.to).is_some()
        || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    // Piece prefix (except pawns)
    match piece {
        Piece::Pawn => {
            // Pawn captures include the file
            if is_capture {
                san.push(file_to_char(mv.from.file()));
            }
        }
        other => san.push(PieceKind::from(other).to_char_upper()),
    }

    if is_capture {
        san.push('x');
    }

    san.push(file_to_char(mv.to.file()));
    san.push(rank_to_char(mv.to.rank()));

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(PieceKind::from(promo).to_char_upper());
    }

    san
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move")]
    IllegalMove,
    #[error("FEN parse error: {0}")]
    FenError(#[from] crate::fen::FenError),
}
