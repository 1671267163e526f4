//! Command handlers and terminal rendering for the `insight` binary.

pub mod commands;
pub mod render;
