//! Mouse-driven terminal chessboard played against a UCI engine.

pub mod assets;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod ui;

pub use assets::{asset_key, AssetError, AssetTable, Sprite};
pub use config::{Cli, Config, ConfigError};
pub use coordinator::{TurnCoordinator, TurnPhase};
pub use geometry::BoardGeometry;
pub use input::{ClickOutcome, InputStateMachine, Selection};
