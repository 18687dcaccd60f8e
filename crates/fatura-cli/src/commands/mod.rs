//! Subcommands of the `fatura` binary.

pub mod classify;
pub mod config;
pub mod pipeline;
pub mod process;
pub mod status;
pub mod templates;
