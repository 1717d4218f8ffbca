use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine::MoveProvider;
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use super::board::BoardWidget;
use super::events::{handle_event, LoopAction};
use super::status::status_line;
use crate::assets::AssetTable;
use crate::coordinator::TurnCoordinator;
use crate::geometry::BoardGeometry;
use crate::input::Selection;

/// Take over the terminal, run the game loop, and restore the terminal.
pub async fn run_app<E: MoveProvider>(
    coordinator: &mut TurnCoordinator<E>,
    assets: &AssetTable,
    geometry: BoardGeometry,
    frame_interval: Duration,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        disable_raw_mode()?;
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui_loop(&mut terminal, coordinator, assets, geometry, frame_interval).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_ui_loop<B: Backend, E: MoveProvider>(
    terminal: &mut Terminal<B>,
    coordinator: &mut TurnCoordinator<E>,
    assets: &AssetTable,
    geometry: BoardGeometry,
    frame_interval: Duration,
) -> anyhow::Result<()> {
    let mut term_events = EventStream::new();

    // Frame-rate ceiling. Input wakes the loop immediately via select!.
    let mut frame_tick = tokio::time::interval(frame_interval);
    frame_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        coordinator.poll_engine();
        terminal.draw(|frame| draw(frame, coordinator, assets, geometry))?;

        let term_event = tokio::select! {
            biased;

            maybe_event = term_events.next() => {
                match maybe_event {
                    Some(Ok(ev)) => Some(ev),
                    Some(Err(e)) => {
                        tracing::warn!("Terminal event error: {}", e);
                        None
                    }
                    None => {
                        tracing::info!("Terminal event stream ended");
                        return Ok(());
                    }
                }
            }

            _ = frame_tick.tick() => None,
        };

        if let Some(event) = term_event {
            if handle_event(&event, coordinator, &geometry) == LoopAction::Quit {
                tracing::info!("Quit requested");
                return Ok(());
            }
        }
    }
}

fn draw<E: MoveProvider>(
    frame: &mut Frame,
    coordinator: &TurnCoordinator<E>,
    assets: &AssetTable,
    geometry: BoardGeometry,
) {
    let screen = frame.area();
    let board = geometry.area();

    let frame_rect = Rect::new(
        board.x.saturating_sub(1),
        board.y.saturating_sub(1),
        board.width + 2,
        board.height + 2,
    )
    .intersection(screen);
    let block = Block::default()
        .title(" chessclick ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, frame_rect);

    let selected = match coordinator.selection() {
        Selection::Armed(square) => Some(square),
        Selection::Idle => None,
    };
    frame.render_widget(
        BoardWidget {
            game: coordinator.game(),
            assets,
            geometry,
            selected,
            last_move: coordinator.last_move(),
        },
        board.intersection(screen),
    );

    let status_rect = Rect::new(screen.x, frame_rect.bottom(), screen.width, 1).intersection(screen);
    frame.render_widget(Paragraph::new(status_line(coordinator)), status_rect);
}
