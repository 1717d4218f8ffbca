use cozy_chess::Board;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Highest halfmove clock cozy-chess accepts in a FEN.
const BOARD_CLOCK_LIMIT: u16 = 100;

/// Index of the halfmove clock among the FEN fields.
const CLOCK_FIELD: usize = 4;

/// Parse a FEN string into a Board
pub fn parse_fen(fen: &str) -> Result<Board, FenError> {
    let fen = fen.trim();
    if fen.is_empty() {
        return Err(FenError::Empty);
    }
    fen.parse()
        .map_err(|_| FenError::InvalidFormat(fen.to_string()))
}

/// Format a Board as a FEN string
pub fn format_fen(board: &Board) -> String {
    board.to_string()
}

/// Parse a FEN, keeping halfmove clocks above 100.
///
/// The board gets a clock capped at 100; the clock as written is returned
/// alongside it.
pub(crate) fn parse_fen_with_clock(fen: &str) -> Result<(Board, u16), FenError> {
    let capped = BOARD_CLOCK_LIMIT.to_string();
    let mut fields: Vec<&str> = fen.split_whitespace().collect();
    let written = fields
        .get(CLOCK_FIELD)
        .and_then(|field| field.parse::<u16>().ok());

    if written.is_some_and(|clock| clock > BOARD_CLOCK_LIMIT) {
        fields[CLOCK_FIELD] = &capped;
    }

    let board = parse_fen(&fields.join(" "))?;
    let clock = written.unwrap_or_else(|| u16::from(board.halfmove_clock()));
    Ok((board, clock))
}

/// Format a board as FEN with `clock` in the halfmove field.
pub(crate) fn format_fen_with_clock(board: &Board, clock: u16) -> String {
    let mut fields: Vec<String> = format_fen(board)
        .split(' ')
        .map(str::to_string)
        .collect();
    if let Some(field) = fields.get_mut(CLOCK_FIELD) {
        *field = clock.to_string();
    }
    fields.join(" ")
}

#[derive(Debug, thiserror::Error)]
pub enum FenError {
    #[error("Empty FEN string")]
    Empty,
    #[error("Invalid FEN: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_fen_matches_default_board() {
        let board = parse_fen(STARTING_FEN).unwrap();
        assert_eq!(format_fen(&board), format_fen(&Board::default()));
        assert_eq!(format_fen(&board), STARTING_FEN);
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(matches!(parse_fen("   "), Err(FenError::Empty)));
        assert!(matches!(
            parse_fen("not a fen"),
            Err(FenError::InvalidFormat(_))
        ));
    }

    #[test]
    fn clock_above_board_limit_survives_a_round_trip() {
        let fen = "8/8/8/4k3/8/8/8/R3K3 w - - 120 80";
        let (board, clock) = parse_fen_with_clock(fen).unwrap();
        assert_eq!(clock, 120);
        assert_eq!(board.halfmove_clock(), 100);
        assert_eq!(format_fen_with_clock(&board, clock), fen);
    }

    #[test]
    fn clock_within_limit_is_taken_from_the_board() {
        let (_, clock) = parse_fen_with_clock("8/8/8/4k3/8/8/8/R3K3 w - - 37 80").unwrap();
        assert_eq!(clock, 37);
        let (_, clock) = parse_fen_with_clock(STARTING_FEN).unwrap();
        assert_eq!(clock, 0);
    }
}
