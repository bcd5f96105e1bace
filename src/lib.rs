//! Companion is a terminal chat window for a model served by a local Ollama
//! instance.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the session identity, the backend
//!   capability and the coordinator that ties them together.
//! - [`ui`] renders the terminal interface and runs the interactive loop.
//! - [`commands`] implements slash-command parsing and execution.
//! - [`api`] defines the Ollama wire payloads.
//!
//! The binary routes through [`cli::main`], which resolves the model and
//! hands a ready [`core::coordinator::ChatCoordinator`] to
//! [`ui::chat_loop::run_chat`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
