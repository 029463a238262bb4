//! CLI commands

pub mod graph;
pub mod impact;
pub mod init;
