//! Game status and result types.

use cozy_chess::{Board, Piece, Square};

use crate::types::PieceColor;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
}

impl Termination {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::InsufficientMaterial => "insufficient material",
            Self::SeventyFiveMoveRule => "seventy-five-move rule",
            Self::FivefoldRepetition => "fivefold repetition",
        }
    }
}

/// Final result of a finished game. `winner` is `None` for draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Option<PieceColor>,
    pub termination: Termination,
}

impl GameResult {
    pub fn win(winner: PieceColor, termination: Termination) -> Self {
        Self {
            winner: Some(winner),
            termination,
        }
    }

    pub fn draw(termination: Termination) -> Self {
        Self {
            winner: None,
            termination,
        }
    }

    /// PGN result code.
    pub fn code(&self) -> &'static str {
        match self.winner {
            Some(PieceColor::White) => "1-0",
            Some(PieceColor::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.termination.describe())
    }
}

/// Whether play continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Over(GameResult),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Over(_))
    }
}

/// Dead positions where neither side can ever mate.
pub(crate) fn insufficient_material(board: &Board) -> bool {
    let heavy =
        board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if !heavy.is_empty() {
        return false;
    }

    let knights = board.pieces(Piece::Knight);
    let bishops = board.pieces(Piece::Bishop);
    if knights.len() + bishops.len() <= 1 {
        return true;
    }
    if !knights.is_empty() {
        return false;
    }

    let mut shades = bishops.into_iter().map(square_shade);
    match shades.next() {
        Some(first) => shades.all(|shade| shade == first),
        None => true,
    }
}

fn square_shade(sq: Square) -> usize {
    (sq.file() as usize + sq.rank() as usize) % 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    #[test]
    fn result_codes() {
        assert_eq!(
            GameResult::win(PieceColor::White, Termination::Checkmate).code(),
            "1-0"
        );
        assert_eq!(
            GameResult::win(PieceColor::Black, Termination::Checkmate).code(),
            "0-1"
        );
        assert_eq!(GameResult::draw(Termination::Stalemate).code(), "1/2-1/2");
        assert_eq!(
            GameResult::draw(Termination::Stalemate).to_string(),
            "1/2-1/2 (stalemate)"
        );
    }

    #[test]
    fn bare_kings_and_single_minor_are_dead() {
        assert!(insufficient_material(&board("8/8/8/4k3/8/8/8/4K3 w - - 0 1")));
        assert!(insufficient_material(&board("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1")));
        assert!(insufficient_material(&board("8/8/8/4k3/8/8/8/1N2K3 b - - 0 1")));
    }

    #[test]
    fn same_shade_bishops_are_dead_opposite_are_not() {
        // c1 and f8 are both dark squares.
        assert!(insufficient_material(&board("5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1")));
        // c1 dark, c8 light.
        assert!(!insufficient_material(&board("2b5/8/8/4k3/8/8/8/2B1K3 w - - 0 1")));
    }

    #[test]
    fn pawns_or_two_knights_keep_material() {
        assert!(!insufficient_material(&board("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1")));
        assert!(!insufficient_material(&board("8/8/8/4k3/8/8/8/1N2KN2 w - - 0 1")));
    }
}
