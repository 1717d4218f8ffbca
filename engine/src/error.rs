use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No UCI engine found (looked for stockfish in common locations and $PATH)")]
    NotFound,
    #[error("Failed to spawn engine at {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Engine handshake failed: {0}")]
    Handshake(String),
    #[error("Engine connection closed")]
    Closed,
    #[error("Engine disconnected: {0}")]
    Disconnected(String),
    #[error("Engine did not reply within {0:?}")]
    Timeout(Duration),
    #[error("Engine returned no move")]
    NoMove,
    #[error("Engine is already searching")]
    Busy,
}
