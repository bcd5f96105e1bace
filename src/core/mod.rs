pub mod backend;
pub mod config;
pub mod conversation;
pub mod coordinator;
pub mod dispatch;
pub mod message;
pub mod prompt;
pub mod startup;
