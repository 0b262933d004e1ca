//! Intake Assist — conversation-state controller for a voice intake assistant.

pub mod actions;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod profile;
pub mod rooms;
pub mod server;
pub mod store;
