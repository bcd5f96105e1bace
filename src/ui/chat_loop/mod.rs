//! Interactive chat loop.
//!
//! The loop owns the [`ChatCoordinator`](crate::core::coordinator::ChatCoordinator)
//! and the [`ChatView`](crate::ui::view::ChatView). Key presses, coordinator
//! completions and spawned UI work all arrive as messages that the loop
//! applies one at a time, so neither is ever touched from another task.

mod event_loop;
mod lifecycle;
mod session;

pub use event_loop::{run_chat, ChatOptions};
pub use session::{ChatSession, LoopControl, UiAction};
