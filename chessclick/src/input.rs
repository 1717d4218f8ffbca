//! Click-to-move input: turns two clicks into one attempted move.

use chess::{Move, PieceColor, Square};

/// Pending selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed(Square),
}

/// What a single click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Input was disabled, or the click did not select an own piece.
    Ignored,
    Selected(Square),
    Rejected { from: Square, to: Square },
    Applied(Move),
}

#[derive(Debug, Default)]
pub struct InputStateMachine {
    selection: Selection,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_square(&self) -> Option<Square> {
        match self.selection {
            Selection::Idle => None,
            Selection::Armed(square) => Some(square),
        }
    }

    /// Feed one click.
    ///
    /// `owner` is the color of the piece on `square`, `actor` the side allowed
    /// to act. On the second click `attempt` is called with the source and
    /// destination and returns the move it applied, if any. The selection is
    /// cleared afterwards whatever the result.
    pub fn click<F>(
        &mut self,
        square: Square,
        owner: Option<PieceColor>,
        actor: PieceColor,
        attempt: F,
    ) -> ClickOutcome
    where
        F: FnOnce(Square, Square) -> Option<Move>,
    {
        match self.selection {
            Selection::Idle if owner == Some(actor) => {
                self.selection = Selection::Armed(square);
                ClickOutcome::Selected(square)
            }
            Selection::Idle => ClickOutcome::Ignored,
            Selection::Armed(from) => {
                let outcome = match attempt(from, square) {
                    Some(mv) => ClickOutcome::Applied(mv),
                    None => ClickOutcome::Rejected { from, to: square },
                };
                self.selection = Selection::Idle;
                outcome
            }
        }
    }

    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::parse_square;

    fn sq(s: &str) -> Square {
        parse_square(s).unwrap()
    }

    fn never(_: Square, _: Square) -> Option<Move> {
        panic!("no move should be attempted")
    }

    #[test]
    fn own_piece_arms() {
        let mut input = InputStateMachine::new();
        let outcome = input.click(sq("e2"), Some(PieceColor::White), PieceColor::White, never);
        assert_eq!(outcome, ClickOutcome::Selected(sq("e2")));
        assert_eq!(input.selection(), Selection::Armed(sq("e2")));
        assert_eq!(input.selected_square(), Some(sq("e2")));
    }

    #[test]
    fn empty_or_enemy_square_stays_idle() {
        let mut input = InputStateMachine::new();
        assert_eq!(
            input.click(sq("e4"), None, PieceColor::White, never),
            ClickOutcome::Ignored
        );
        assert_eq!(
            input.click(sq("e7"), Some(PieceColor::Black), PieceColor::White, never),
            ClickOutcome::Ignored
        );
        assert_eq!(input.selection(), Selection::Idle);
    }

    #[test]
    fn second_click_attempts_and_resets() {
        let mut input = InputStateMachine::new();
        input.click(sq("e2"), Some(PieceColor::White), PieceColor::White, never);

        let mut attempted = None;
        let outcome = input.click(sq("e5"), None, PieceColor::White, |from, to| {
            attempted = Some((from, to));
            None
        });
        assert_eq!(attempted, Some((sq("e2"), sq("e5"))));
        assert_eq!(
            outcome,
            ClickOutcome::Rejected {
                from: sq("e2"),
                to: sq("e5")
            }
        );
        assert_eq!(input.selection(), Selection::Idle);
    }

    #[test]
    fn clicking_the_armed_square_again_is_just_a_rejected_attempt() {
        let mut input = InputStateMachine::new();
        input.click(sq("g1"), Some(PieceColor::White), PieceColor::White, never);
        let outcome = input.click(sq("g1"), Some(PieceColor::White), PieceColor::White, |_, _| None);
        assert_eq!(
            outcome,
            ClickOutcome::Rejected {
                from: sq("g1"),
                to: sq("g1")
            }
        );
        assert_eq!(input.selection(), Selection::Idle);
    }

    #[test]
    fn applied_move_is_reported() {
        let mut input = InputStateMachine::new();
        input.click(sq("e2"), Some(PieceColor::White), PieceColor::White, never);
        let mv = Move {
            from: sq("e2"),
            to: sq("e4"),
            promotion: None,
        };
        let outcome = input.click(sq("e4"), None, PieceColor::White, |_, _| Some(mv));
        assert_eq!(outcome, ClickOutcome::Applied(mv));
        assert_eq!(input.selection(), Selection::Idle);
    }
}
