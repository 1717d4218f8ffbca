//! Turn sequencing between the human (mouse) and the engine.

use std::time::Duration;

use chess::{format_uci_move, Game, GameResult, Move, PieceColor, Square};
use engine::{EngineError, EngineInfo, MoveProvider};

use crate::input::{ClickOutcome, InputStateMachine, Selection};

/// Whose move the coordinator is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitHuman,
    AwaitEngine,
    /// The last engine request failed; the board is unchanged. Recover with
    /// [`TurnCoordinator::retry_engine`].
    EngineFailed(String),
    /// Terminal. All further input is discarded.
    GameOver(GameResult),
}

/// Owns the game, the click state and the engine, and alternates turns.
pub struct TurnCoordinator<E> {
    game: Game,
    engine: E,
    input: InputStateMachine,
    human_side: PieceColor,
    budget: Duration,
    phase: TurnPhase,
    last_move: Option<Move>,
}

impl<E: MoveProvider> TurnCoordinator<E> {
    /// Start coordinating `game`. If the engine is to move first its request is
    /// issued immediately.
    pub fn new(game: Game, engine: E, human_side: PieceColor, budget: Duration) -> Self {
        let mut coordinator = Self {
            game,
            engine,
            input: InputStateMachine::new(),
            human_side,
            budget,
            phase: TurnPhase::AwaitHuman,
            last_move: None,
        };
        coordinator.settle();
        coordinator
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn selection(&self) -> Selection {
        self.input.selection()
    }

    pub fn human_side(&self) -> PieceColor {
        self.human_side
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn result(&self) -> Option<GameResult> {
        match &self.phase {
            TurnPhase::GameOver(result) => Some(*result),
            _ => None,
        }
    }

    /// Search progress while the engine is thinking.
    pub fn engine_info(&self) -> Option<&EngineInfo> {
        match self.phase {
            TurnPhase::AwaitEngine => self.engine.latest_info(),
            _ => None,
        }
    }

    /// Whether clicks are currently processed.
    pub fn accepts_input(&self) -> bool {
        self.phase == TurnPhase::AwaitHuman && self.game.side_to_move() == self.human_side
    }

    /// Feed a click on `square`. Ignored unless it is the human's turn.
    pub fn handle_click(&mut self, square: Square) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Ignored;
        }

        let owner = self.game.piece_owner(square);
        let game = &mut self.game;
        let outcome = self
            .input
            .click(square, owner, self.human_side, |from, to| {
                let mv = game.resolve_move(from, to);
                match game.apply(mv) {
                    Ok(entry) => {
                        tracing::info!(san = %entry.san, "Human played {}", format_uci_move(mv));
                        Some(mv)
                    }
                    Err(e) => {
                        tracing::debug!("Rejected {}: {}", format_uci_move(mv), e);
                        None
                    }
                }
            });

        if let ClickOutcome::Applied(mv) = outcome {
            self.last_move = Some(mv);
            self.settle();
        }
        outcome
    }

    /// Check for the engine's reply. Returns the move if one was applied.
    /// A reply the rules reject counts as an engine failure.
    pub fn poll_engine(&mut self) -> Option<Move> {
        if self.phase != TurnPhase::AwaitEngine {
            return None;
        }

        match self.engine.poll_move()? {
            Ok(reply) => {
                let mv = self.game.normalize_uci_move(reply);
                match self.game.apply(mv) {
                    Ok(entry) => {
                        tracing::info!(san = %entry.san, "Engine played {}", format_uci_move(reply));
                        self.last_move = Some(mv);
                        self.settle();
                        Some(mv)
                    }
                    Err(_) => {
                        self.fail(format!(
                            "engine played illegal move {}",
                            format_uci_move(reply)
                        ));
                        None
                    }
                }
            }
            Err(e) => {
                self.fail_engine(e);
                None
            }
        }
    }

    /// Re-issue the engine request after a failure. Returns false when there
    /// is nothing to retry.
    pub fn retry_engine(&mut self) -> bool {
        if !matches!(self.phase, TurnPhase::EngineFailed(_)) {
            return false;
        }
        tracing::info!("Retrying engine request");
        self.request_engine_move();
        true
    }

    /// Hand back the engine, e.g. to shut it down.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Decide the next phase after a move has been applied (or at start).
    fn settle(&mut self) {
        if let Some(result) = self.game.result() {
            self.finish(result);
        } else if self.game.side_to_move() == self.human_side {
            self.phase = TurnPhase::AwaitHuman;
        } else {
            self.request_engine_move();
        }
    }

    fn request_engine_move(&mut self) {
        let fen = self.game.to_fen();
        match self.engine.request_move(&fen, self.budget) {
            Ok(()) => self.phase = TurnPhase::AwaitEngine,
            Err(e) => self.fail_engine(e),
        }
    }

    fn fail_engine(&mut self, error: EngineError) {
        self.fail(error.to_string());
    }

    fn fail(&mut self, reason: String) {
        tracing::error!("Engine move failed: {}", reason);
        self.phase = TurnPhase::EngineFailed(reason);
    }

    fn finish(&mut self, result: GameResult) {
        if matches!(self.phase, TurnPhase::GameOver(_)) {
            return;
        }
        tracing::info!("Game over: {}", result);
        self.input.reset();
        self.phase = TurnPhase::GameOver(result);
    }
}
