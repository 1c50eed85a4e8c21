//! CLI tool for inspecting network endpoints.
//!
//! Provides commands for:
//! - Parsing an address and showing its family, canonical form and hash
//! - Comparing two `addr:port` endpoints
//! - Dumping the native socket-address layout (Unix)

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
