//! CLI commands

pub mod add;
pub mod list;
pub mod update;
pub mod utils;
