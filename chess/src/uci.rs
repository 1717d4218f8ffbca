//! UCI (Universal Chess Interface) move notation helpers

use cozy_chess::{File, Move, Piece, Rank, Square};

use crate::converters::{format_piece, format_square};

/// Convert UCI castling notation to cozy_chess notation
///
/// UCI uses standard notation (king moves 2 squares): e1g1, e1c1, e8g8, e8c8
/// cozy_chess uses king-to-rook notation: e1h1, e1a1, e8h8, e8a8
///
/// Only king moves are converted, and only when the converted move appears in
/// `legal_moves`. Everything else is returned unchanged.
pub fn convert_uci_castling_to_cozy(
    mv: Move,
    moving_piece: Option<Piece>,
    legal_moves: &[Move],
) -> Move {
    if moving_piece != Some(Piece::King) || mv.promotion.is_some() {
        return mv;
    }

    let is_e_file = matches!(mv.from.file(), File::E);
    let same_rank = mv.from.rank() == mv.to.rank();
    if !is_e_file || !same_rank {
        return mv;
    }

    let target_square = match (mv.from.rank(), mv.to.file()) {
        (Rank::First, File::G) => Square::new(File::H, Rank::First), // e1g1 → e1h1 (white kingside)
        (Rank::First, File::C) => Square::new(File::A, Rank::First), // e1c1 → e1a1 (white queenside)
        (Rank::Eighth, File::G) => Square::new(File::H, Rank::Eighth), // e8g8 → e8h8 (black kingside)
        (Rank::Eighth, File::C) => Square::new(File::A, Rank::Eighth), // e8c8 → e8a8 (black queenside)
        _ => return mv,
    };

    let converted = Move {
        from: mv.from,
        to: target_square,
        promotion: None,
    };

    if legal_moves.contains(&converted) {
        converted
    } else {
        mv
    }
}

/// Format a move in UCI notation (e.g., "e2e4", "e7e8q")
pub fn format_uci_move(mv: Move) -> String {
    let mut s = format!("{}{}", format_square(mv.from), format_square(mv.to));
    if let Some(promo) = mv.promotion {
        s.push(format_piece(promo));
    }
    s
}
