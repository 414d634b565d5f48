//! avg CLI library.
//!
//! This crate provides the command-line interface for avg: argument
//! definitions, configuration loading and the command implementations.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
