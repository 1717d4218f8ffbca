use engine::MoveProvider;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::coordinator::{TurnCoordinator, TurnPhase};
use crate::input::Selection;

/// One-line summary of the game state.
pub fn status_text<E: MoveProvider>(coordinator: &TurnCoordinator<E>) -> String {
    match coordinator.phase() {
        TurnPhase::AwaitHuman => {
            let side = coordinator.game().side_to_move();
            match coordinator.selection() {
                Selection::Armed(square) => format!(
                    "{} to move - {} selected",
                    side,
                    chess::format_square(square)
                ),
                Selection::Idle => format!("{} to move - click a piece", side),
            }
        }
        TurnPhase::AwaitEngine => {
            let mut text = "Engine thinking...".to_string();
            if let Some(info) = coordinator.engine_info().filter(|i| i.has_progress()) {
                if let Some(depth) = info.depth {
                    text.push_str(&format!(" depth {}", depth));
                }
                if let Some(score) = info.score {
                    text.push_str(&format!(" score {}", score));
                }
            }
            text
        }
        TurnPhase::EngineFailed(reason) => {
            format!("Engine failed: {} - press r to retry", reason)
        }
        TurnPhase::GameOver(result) => format!("Game over: {}", result),
    }
}

pub fn status_line<E: MoveProvider>(coordinator: &TurnCoordinator<E>) -> Line<'static> {
    let style = match coordinator.phase() {
        TurnPhase::AwaitHuman => Style::default().fg(Color::White),
        TurnPhase::AwaitEngine => Style::default().fg(Color::Cyan),
        TurnPhase::EngineFailed(_) => Style::default().fg(Color::Red),
        TurnPhase::GameOver(_) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    };
    Line::from(vec![
        Span::styled(status_text(coordinator), style),
        Span::styled("   q quit", Style::default().fg(Color::DarkGray)),
    ])
}
