//! Logcat silencer CLI library.
//!
//! This crate provides the CLI interface and the stdin/stdout driver for the
//! stream gate.

mod cli;
mod config;
pub mod filter;

pub use cli::Cli;
pub use config::Config;
