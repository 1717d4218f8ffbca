//! Terminal front end: board widget, status line, input dispatch and the
//! frame loop.

pub mod board;
pub mod events;
pub mod render_loop;
pub mod status;

pub use events::{handle_event, LoopAction};
pub use render_loop::run_app;
