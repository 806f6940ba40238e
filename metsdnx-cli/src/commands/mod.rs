//! CLI subcommands.

pub mod common;
pub mod dir;
pub mod file;
pub mod json;
