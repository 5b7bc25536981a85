//! Interactive chat session: terminal setup, the event loop, and key handling.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::{run_chat, UiEvent};
