//! Subcommand implementations.

pub mod build;
pub mod init;
pub mod render;
pub mod theme;
