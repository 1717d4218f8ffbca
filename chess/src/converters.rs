//! Text conversions for squares, pieces and moves.

use cozy_chess::{File, Move, Piece, Rank, Square};

pub fn file_to_char(file: File) -> char {
    match file {
        File::A => 'a',
        File::B => 'b',
        File::C => 'c',
        File::D => 'd',
        File::E => 'e',
        File::F => 'f',
        File::G => 'g',
        File::H => 'h',
    }
}

pub fn rank_to_char(rank: Rank) -> char {
    match rank {
        Rank::First => '1',
        Rank::Second => '2',
        Rank::Third => '3',
        Rank::Fourth => '4',
        Rank::Fifth => '5',
        Rank::Sixth => '6',
        Rank::Seventh => '7',
        Rank::Eighth => '8',
    }
}

fn char_to_file(c: char) -> Option<File> {
    match c {
        'a' => Some(File::A),
        'b' => Some(File::B),
        'c' => Some(File::C),
        'd' => Some(File::D),
        'e' => Some(File::E),
        'f' => Some(File::F),
        'g' => Some(File::G),
        'h' => Some(File::H),
        _ => None,
    }
}

fn char_to_rank(c: char) -> Option<Rank> {
    match c {
        '1' => Some(Rank::First),
        '2' => Some(Rank::Second),
        '3' => Some(Rank::Third),
        '4' => Some(Rank::Fourth),
        '5' => Some(Rank::Fifth),
        '6' => Some(Rank::Sixth),
        '7' => Some(Rank::Seventh),
        '8' => Some(Rank::Eighth),
        _ => None,
    }
}

/// Format a square in algebraic notation (e.g. "e4").
pub fn format_square(sq: Square) -> String {
    format!("{}{}", file_to_char(sq.file()), rank_to_char(sq.rank()))
}

/// Parse a square in algebraic notation. Returns `None` on anything else.
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = char_to_file(chars.next()?)?;
    let rank = char_to_rank(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some(Square::new(file, rank))
}

/// Lowercase promotion letter used in UCI move text.
pub fn format_piece(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

fn parse_promotion(c: char) -> Option<Piece> {
    match c {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}

/// Parse a move in UCI long algebraic notation (`e2e4`, `e7e8q`).
pub fn parse_uci_move(s: &str) -> Option<Move> {
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        return None;
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    let promotion = match s[4..].chars().next() {
        Some(c) => Some(parse_promotion(c)?),
        None => None,
    };
    Some(Move {
        from,
        to,
        promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_uci_move_never_panics(s in "\\PC{0,8}") {
            let _ = parse_uci_move(&s);
        }

        #[test]
        fn well_formed_moves_parse(from in 0usize..64, to in 0usize..64) {
            let text = format!("{}{}", format_square(Square::index(from)), format_square(Square::index(to)));
            let mv = parse_uci_move(&text).unwrap();
            prop_assert_eq!(mv.from, Square::index(from));
            prop_assert_eq!(mv.to, Square::index(to));
            prop_assert_eq!(mv.promotion, None);
        }
    }

    #[test]
    fn square_text_round_trip() {
        for idx in 0..64 {
            let sq = Square::index(idx);
            assert_eq!(parse_square(&format_square(sq)), Some(sq));
        }
    }

    #[test]
    fn parse_square_rejects_garbage() {
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("a1x"), None);
        assert_eq!(parse_square(""), None);
    }

    #[test]
    fn parse_uci_move_with_promotion() {
        let mv = parse_uci_move("e7e8q").unwrap();
        assert_eq!(mv.from, Square::new(File::E, Rank::Seventh));
        assert_eq!(mv.to, Square::new(File::E, Rank::Eighth));
        assert_eq!(mv.promotion, Some(Piece::Queen));
    }

    #[test]
    fn parse_uci_move_rejects_bad_promotion_and_null_move() {
        assert!(parse_uci_move("e7e8k").is_none());
        assert!(parse_uci_move("0000").is_none());
        assert!(parse_uci_move("(none)").is_none());
    }
}
