//! Scripted [`MoveProvider`] for tests - only compiled in test mode or with the mock feature

use std::collections::VecDeque;
use std::time::Duration;

use cozy_chess::Move;

use crate::{EngineError, EngineInfo, MoveProvider};

/// One recorded `request_move` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub fen: String,
    pub budget: Duration,
}

#[derive(Debug, Clone)]
enum Script {
    Move(Move),
    NoMove,
    Fail(String),
    RefuseRequest(String),
    Silent,
    MissDeadline,
}

/// Engine stand-in that answers requests from a queue of scripted replies.
///
/// Each request consumes one scripted reply. Replies are delivered on the
/// first `poll_move` after the request. Running out of script refuses the
/// request with [`EngineError::Closed`].
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: VecDeque<Script>,
    requests: Vec<MoveRequest>,
    pending: Option<Script>,
    info: Option<EngineInfo>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with a move given in UCI notation.
    pub fn with_move(mut self, uci: &str) -> Self {
        let mv = chess::parse_uci_move(uci)
            .unwrap_or_else(|| panic!("scripted move '{}' is not UCI", uci));
        self.script.push_back(Script::Move(mv));
        self
    }

    /// Reply with `bestmove (none)`.
    pub fn with_no_move(mut self) -> Self {
        self.script.push_back(Script::NoMove);
        self
    }

    /// Accept the request, then fail while searching.
    pub fn with_failure(mut self, reason: &str) -> Self {
        self.script.push_back(Script::Fail(reason.to_string()));
        self
    }

    /// Refuse the request outright.
    pub fn with_request_failure(mut self, reason: &str) -> Self {
        self.script
            .push_back(Script::RefuseRequest(reason.to_string()));
        self
    }

    /// Accept the request and never answer.
    pub fn with_silence(mut self) -> Self {
        self.script.push_back(Script::Silent);
        self
    }

    /// Accept the request, then fail as if its deadline had passed.
    pub fn with_timeout(mut self) -> Self {
        self.script.push_back(Script::MissDeadline);
        self
    }

    /// Search info reported while thinking.
    pub fn with_info(mut self, info: EngineInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Every request received, in order.
    pub fn requests(&self) -> &[MoveRequest] {
        &self.requests
    }

    pub fn remaining_replies(&self) -> usize {
        self.script.len()
    }
}

impl MoveProvider for ScriptedEngine {
    fn request_move(&mut self, fen: &str, budget: Duration) -> Result<(), EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::Busy);
        }
        self.requests.push(MoveRequest {
            fen: fen.to_string(),
            budget,
        });
        match self.script.pop_front() {
            None => Err(EngineError::Closed),
            Some(Script::RefuseRequest(reason)) => Err(EngineError::Disconnected(reason)),
            Some(reply) => {
                self.pending = Some(reply);
                Ok(())
            }
        }
    }

    fn poll_move(&mut self) -> Option<Result<Move, EngineError>> {
        match self.pending.take()? {
            Script::Move(mv) => Some(Ok(mv)),
            Script::NoMove => Some(Err(EngineError::NoMove)),
            Script::Fail(reason) => Some(Err(EngineError::Disconnected(reason))),
            Script::Silent => {
                self.pending = Some(Script::Silent);
                None
            }
            Script::MissDeadline => {
                let budget = self.requests.last().map_or(Duration::ZERO, |r| r.budget);
                Some(Err(EngineError::Timeout(budget)))
            }
            Script::RefuseRequest(_) => None,
        }
    }

    fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    fn latest_info(&self) -> Option<&EngineInfo> {
        if self.pending.is_some() {
            self.info.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_in_order_and_records_requests() {
        let mut engine = ScriptedEngine::new()
            .with_move("e7e5")
            .with_failure("crashed");

        assert!(engine.poll_move().is_none());

        engine
            .request_move("fen-a", Duration::from_secs(1))
            .unwrap();
        assert!(engine.is_thinking());
        let mv = engine.poll_move().unwrap().unwrap();
        assert_eq!(chess::format_uci_move(mv), "e7e5");
        assert!(!engine.is_thinking());

        engine
            .request_move("fen-b", Duration::from_secs(1))
            .unwrap();
        assert!(matches!(
            engine.poll_move(),
            Some(Err(EngineError::Disconnected(_)))
        ));

        assert!(matches!(
            engine.request_move("fen-c", Duration::from_secs(1)),
            Err(EngineError::Closed)
        ));
        let fens: Vec<&str> = engine.requests().iter().map(|r| r.fen.as_str()).collect();
        assert_eq!(fens, vec!["fen-a", "fen-b", "fen-c"]);
    }

    #[test]
    fn missed_deadline_reports_the_budget() {
        let mut engine = ScriptedEngine::new().with_timeout();
        engine
            .request_move("fen", Duration::from_millis(300))
            .unwrap();
        assert!(matches!(
            engine.poll_move(),
            Some(Err(EngineError::Timeout(limit))) if limit == Duration::from_millis(300)
        ));
        assert!(!engine.is_thinking());
    }

    #[test]
    fn silent_engine_stays_busy() {
        let mut engine = ScriptedEngine::new().with_silence();
        engine.request_move("fen", Duration::from_secs(1)).unwrap();
        assert!(engine.poll_move().is_none());
        assert!(engine.poll_move().is_none());
        assert!(engine.is_thinking());
        assert!(matches!(
            engine.request_move("fen", Duration::from_secs(1)),
            Err(EngineError::Busy)
        ));
    }
}
