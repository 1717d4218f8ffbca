use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use engine::MoveProvider;

use crate::coordinator::TurnCoordinator;
use crate::geometry::BoardGeometry;

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Quit,
}

pub fn handle_event<E: MoveProvider>(
    event: &Event,
    coordinator: &mut TurnCoordinator<E>,
    geometry: &BoardGeometry,
) -> LoopAction {
    match event {
        Event::Key(key) => handle_key(key, coordinator),
        Event::Mouse(mouse) => {
            handle_mouse(mouse, coordinator, geometry);
            LoopAction::Continue
        }
        _ => LoopAction::Continue,
    }
}

fn handle_key<E: MoveProvider>(key: &KeyEvent, coordinator: &mut TurnCoordinator<E>) -> LoopAction {
    if key.kind != KeyEventKind::Press {
        return LoopAction::Continue;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => LoopAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => LoopAction::Quit,
        KeyCode::Char('r') => {
            coordinator.retry_engine();
            LoopAction::Continue
        }
        _ => LoopAction::Continue,
    }
}

fn handle_mouse<E: MoveProvider>(
    mouse: &MouseEvent,
    coordinator: &mut TurnCoordinator<E>,
    geometry: &BoardGeometry,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    match geometry.square_at(mouse.column, mouse.row) {
        Some(square) => {
            let outcome = coordinator.handle_click(square);
            tracing::debug!(
                "Click at ({}, {}) on {}: {:?}",
                mouse.column,
                mouse.row,
                chess::format_square(square),
                outcome
            );
        }
        None => tracing::trace!("Click at ({}, {}) off the board", mouse.column, mouse.row),
    }
}
