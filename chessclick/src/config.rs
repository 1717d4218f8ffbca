//! Runtime configuration.
//!
//! Every setting can be given as a command-line flag or a `CHESSCLICK_*`
//! environment variable, and otherwise falls back to a compile-time default.
//! Flags win over the environment.

use std::path::PathBuf;
use std::time::Duration;

use chess::{Game, PieceColor};
use clap::Parser;
use engine::EngineConfig;

/// Default engine think time per move (in milliseconds).
const DEFAULT_MOVETIME_MS: u64 = 1000;

/// Default frame-rate ceiling.
const DEFAULT_FPS: u32 = 15;

/// Default piece image directory.
const DEFAULT_ASSETS_DIR: &str = "assets/pieces";

/// Default log directory.
const DEFAULT_LOG_DIR: &str = "logs";

const MAX_FPS: u32 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Command-line flags. Unset flags fall through to the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "chessclick", version, about = "Play chess against a UCI engine with the mouse")]
pub struct Cli {
    /// Path to the UCI engine executable (default: search for stockfish)
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Extra argument passed to the engine (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG")]
    pub engine_args: Vec<String>,

    /// Directory holding the twelve piece images
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Engine think time per move in milliseconds
    #[arg(long = "movetime-ms", value_name = "MS")]
    pub movetime_ms: Option<u64>,

    /// Frame-rate ceiling
    #[arg(long)]
    pub fps: Option<u32>,

    /// Side played with the mouse: white or black
    #[arg(long, value_name = "SIDE")]
    pub human: Option<String>,

    /// Engine skill level (0-20)
    #[arg(long)]
    pub skill: Option<u8>,

    /// Engine search threads
    #[arg(long)]
    pub threads: Option<u32>,

    /// Engine hash table size in MB
    #[arg(long = "hash-mb", value_name = "MB")]
    pub hash_mb: Option<u32>,

    /// Start from this FEN instead of the initial position
    #[arg(long)]
    pub fen: Option<String>,

    /// Directory for log files
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub assets_dir: PathBuf,
    pub movetime: Duration,
    pub fps: u32,
    pub human_side: PieceColor,
    pub start_fen: Option<String>,
    pub log_dir: PathBuf,
}

impl Config {
    /// Read flags from the process arguments and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(Cli::parse(), |name| std::env::var(name).ok())
    }

    /// Merge `cli` with variables looked up through `env`.
    pub fn resolve<F>(cli: Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let movetime_ms = match cli.movetime_ms {
            Some(ms) => ms,
            None => parse_env(&env, "CHESSCLICK_MOVETIME_MS")?.unwrap_or(DEFAULT_MOVETIME_MS),
        };
        if movetime_ms == 0 {
            return Err(invalid("movetime", "0", "must be at least 1 ms"));
        }

        let fps = match cli.fps {
            Some(fps) => fps,
            None => parse_env(&env, "CHESSCLICK_FPS")?.unwrap_or(DEFAULT_FPS),
        };
        if fps == 0 || fps > MAX_FPS {
            return Err(invalid(
                "fps",
                &fps.to_string(),
                &format!("must be between 1 and {}", MAX_FPS),
            ));
        }

        let human_side = match cli.human.or_else(|| env("CHESSCLICK_HUMAN")) {
            Some(side) => side
                .parse::<PieceColor>()
                .map_err(|reason| invalid("human", &side, &reason))?,
            None => PieceColor::White,
        };

        let start_fen = cli.fen.or_else(|| env("CHESSCLICK_FEN"));
        if let Some(fen) = &start_fen {
            Game::from_fen(fen).map_err(|e| invalid("fen", fen, &e.to_string()))?;
        }

        let mut engine = EngineConfig {
            path: cli
                .engine
                .or_else(|| env("CHESSCLICK_ENGINE").map(PathBuf::from)),
            args: cli.engine_args,
            ..EngineConfig::default()
        };
        engine.skill_level = match cli.skill {
            Some(skill) => Some(skill),
            None => parse_env(&env, "CHESSCLICK_SKILL")?,
        };
        engine.threads = match cli.threads {
            Some(threads) => Some(threads),
            None => parse_env(&env, "CHESSCLICK_THREADS")?,
        };
        engine.hash_mb = match cli.hash_mb {
            Some(mb) => Some(mb),
            None => parse_env(&env, "CHESSCLICK_HASH_MB")?,
        };

        let assets_dir = cli
            .assets
            .or_else(|| env("CHESSCLICK_ASSETS").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
        let log_dir = cli
            .log_dir
            .or_else(|| env("CHESSCLICK_LOG_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self {
            engine,
            assets_dir,
            movetime: Duration::from_millis(movetime_ms),
            fps,
            human_side,
            start_fen,
            log_dir,
        })
    }

    /// Time between frames at the configured frame rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

fn parse_env<T, F>(env: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(name, &raw, &e.to_string())),
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::resolve(Cli::default(), env_from(&[])).unwrap();
        assert_eq!(config.movetime, Duration::from_millis(1000));
        assert_eq!(config.fps, 15);
        assert_eq!(config.human_side, PieceColor::White);
        assert_eq!(config.assets_dir, PathBuf::from("assets/pieces"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert!(config.engine.path.is_none());
        assert!(config.start_fen.is_none());
        assert_eq!(config.frame_interval(), Duration::from_millis(66));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = env_from(&[
            ("CHESSCLICK_MOVETIME_MS", "250"),
            ("CHESSCLICK_HUMAN", "black"),
            ("CHESSCLICK_ENGINE", "/opt/sf"),
            ("CHESSCLICK_SKILL", "5"),
        ]);
        let config = Config::resolve(Cli::default(), env).unwrap();
        assert_eq!(config.movetime, Duration::from_millis(250));
        assert_eq!(config.human_side, PieceColor::Black);
        assert_eq!(config.engine.path, Some(PathBuf::from("/opt/sf")));
        assert_eq!(config.engine.skill_level, Some(5));
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from(["chessclick", "--movetime-ms", "300", "--human", "w"]);
        let env = env_from(&[
            ("CHESSCLICK_MOVETIME_MS", "250"),
            ("CHESSCLICK_HUMAN", "black"),
        ]);
        let config = Config::resolve(cli, env).unwrap();
        assert_eq!(config.movetime, Duration::from_millis(300));
        assert_eq!(config.human_side, PieceColor::White);
    }

    #[test]
    fn engine_args_are_collected() {
        let cli = Cli::parse_from([
            "chessclick",
            "--engine",
            "/bin/sh",
            "--engine-arg",
            "fake.sh",
            "--engine-arg",
            "-q",
        ]);
        let config = Config::resolve(cli, env_from(&[])).unwrap();
        assert_eq!(config.engine.args, vec!["fake.sh", "-q"]);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_env = [
            ("CHESSCLICK_MOVETIME_MS", "soon"),
            ("CHESSCLICK_MOVETIME_MS", "0"),
            ("CHESSCLICK_FPS", "0"),
            ("CHESSCLICK_FPS", "1000"),
            ("CHESSCLICK_HUMAN", "green"),
            ("CHESSCLICK_FEN", "not a fen"),
        ];
        for pair in bad_env {
            let result = Config::resolve(Cli::default(), env_from(&[pair]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { .. })),
                "{:?} should be rejected",
                pair
            );
        }
    }
}
