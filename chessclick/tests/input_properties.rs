use std::time::Duration;

use chess::{Game, Move, PieceColor, Square};
use chessclick::{ClickOutcome, InputStateMachine, Selection, TurnCoordinator, TurnPhase};
use engine::ScriptedEngine;
use proptest::prelude::*;

fn owner_strategy() -> impl Strategy<Value = Option<PieceColor>> {
    prop_oneof![
        Just(None),
        Just(Some(PieceColor::White)),
        Just(Some(PieceColor::Black)),
    ]
}

proptest! {
    #[test]
    fn second_click_always_returns_to_idle(
        first in 0usize..64,
        second in 0usize..64,
        second_owner in owner_strategy(),
        accept in any::<bool>(),
    ) {
        let mut input = InputStateMachine::new();
        let from = Square::index(first);
        let to = Square::index(second);

        prop_assert_eq!(
            input.click(from, Some(PieceColor::White), PieceColor::White, |_, _| None),
            ClickOutcome::Selected(from)
        );

        let outcome = input.click(to, second_owner, PieceColor::White, |f, t| {
            accept.then_some(Move { from: f, to: t, promotion: None })
        });
        prop_assert_eq!(input.selection(), Selection::Idle);
        prop_assert!(matches!(
            outcome,
            ClickOutcome::Applied(_) | ClickOutcome::Rejected { .. }
        ), "unexpected outcome: {:?}", outcome);
    }

    #[test]
    fn idle_only_arms_on_own_piece(idx in 0usize..64, owner in owner_strategy()) {
        let mut input = InputStateMachine::new();
        let square = Square::index(idx);
        input.click(square, owner, PieceColor::Black, |_, _| None);
        let expected = if owner == Some(PieceColor::Black) {
            Selection::Armed(square)
        } else {
            Selection::Idle
        };
        prop_assert_eq!(input.selection(), expected);
    }

    #[test]
    fn clicks_outside_human_turn_change_nothing(clicks in prop::collection::vec(0usize..64, 1..20)) {
        // Engine to move and silent: every click must be ignored.
        let engine = ScriptedEngine::new().with_silence();
        let mut c = TurnCoordinator::new(Game::new(), engine, PieceColor::Black, Duration::from_secs(1));
        let fen = c.game().to_fen();
        for idx in clicks {
            prop_assert_eq!(c.handle_click(Square::index(idx)), ClickOutcome::Ignored);
        }
        prop_assert_eq!(c.game().to_fen(), fen);
        prop_assert_eq!(c.selection(), Selection::Idle);
        prop_assert_eq!(c.phase(), &TurnPhase::AwaitEngine);
    }

    #[test]
    fn random_clicks_keep_coordinator_consistent(clicks in prop::collection::vec(0usize..64, 1..40)) {
        let engine = ScriptedEngine::new().with_silence();
        let mut c = TurnCoordinator::new(Game::new(), engine, PieceColor::White, Duration::from_secs(1));
        for idx in clicks {
            let phase_before = c.phase().clone();
            let outcome = c.handle_click(Square::index(idx));
            match outcome {
                ClickOutcome::Applied(_) => {
                    prop_assert_eq!(c.phase(), &TurnPhase::AwaitEngine);
                    prop_assert_eq!(c.game().history().len(), 1);
                }
                _ if phase_before != TurnPhase::AwaitHuman => {
                    prop_assert_eq!(outcome, ClickOutcome::Ignored);
                }
                _ => {
                    prop_assert_eq!(c.phase(), &TurnPhase::AwaitHuman);
                }
            }
        }
        prop_assert!(c.engine().requests().len() <= 1);
    }
}
