//! Terminal UI layer for the chat companion.
//!
//! - [`chat_loop`]: the interaction loop that routes input through
//!   [`crate::commands`] and applies coordinator completions.
//! - [`view`] and [`renderer`]: what is shown and how it is drawn;
//!   [`text_wrapping`] breaks transcript lines to the panel width.
//! - [`settings`] and [`picker`]: the model/name overlay.
//! - [`presenter`]: the capability the command layer and callbacks use to
//!   update the view.
//!
//! This layer only presents state; [`crate::core`] owns the conversation.

pub mod chat_loop;
pub mod picker;
pub mod presenter;
pub mod renderer;
pub mod settings;
pub mod text_wrapping;
pub mod view;
