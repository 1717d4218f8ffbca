use std::time::Duration;

use cozy_chess::Move;

use crate::{EngineError, EngineInfo};

/// Request/response seam between the game loop and a move source.
///
/// Both calls return immediately. A caller issues one request with
/// [`request_move`](MoveProvider::request_move) and then calls
/// [`poll_move`](MoveProvider::poll_move) once per frame until it yields
/// `Some`. Moves are reported in the engine's own notation; callers normalise
/// them against their board.
pub trait MoveProvider {
    /// Start searching `fen` for about `budget`.
    fn request_move(&mut self, fen: &str, budget: Duration) -> Result<(), EngineError>;

    /// `None` while the search is still running or no request is outstanding.
    fn poll_move(&mut self) -> Option<Result<Move, EngineError>>;

    /// Whether a request is outstanding.
    fn is_thinking(&self) -> bool;

    /// Most recent search progress for the outstanding request.
    fn latest_info(&self) -> Option<&EngineInfo> {
        None
    }
}
