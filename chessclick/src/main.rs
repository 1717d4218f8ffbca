use anyhow::Context;
use chess::Game;
use chessclick::{logging, ui, AssetTable, BoardGeometry, Config, TurnCoordinator};
use engine::UciEngine;

/// Board origin on screen, inside the frame border.
const BOARD_ORIGIN: (u16, u16) = (1, 1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let _guard = logging::init_tracing(&config.log_dir)?;
    tracing::info!("chessclick starting up");

    let defaults = BoardGeometry::default();
    let geometry = BoardGeometry::new(
        BOARD_ORIGIN.0,
        BOARD_ORIGIN.1,
        defaults.square_width,
        defaults.square_height,
    );
    let (sprite_w, sprite_h) = geometry.sprite_size();
    let assets = AssetTable::load(&config.assets_dir, sprite_w, sprite_h)
        .with_context(|| format!("Failed to load piece images from {:?}", config.assets_dir))?;

    let game = match &config.start_fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let engine = UciEngine::spawn(config.engine.clone())
        .await
        .context("Failed to start chess engine")?;
    println!(
        "chessclick - playing {} against {}",
        config.human_side,
        engine.name().unwrap_or("engine")
    );
    println!("Debug logs: {}/chessclick.YYYY-MM-DD", config.log_dir.display());

    let mut coordinator =
        TurnCoordinator::new(game, engine, config.human_side, config.movetime);
    let run = ui::run_app(&mut coordinator, &assets, geometry, config.frame_interval()).await;

    let result = coordinator.result();
    coordinator.into_engine().shutdown().await;
    run?;

    match result {
        Some(result) => println!("Game over: {}", result),
        None => println!("Game abandoned"),
    }
    tracing::info!("chessclick shutting down");
    Ok(())
}
