//! MCP Git - a Model Context Protocol server exposing two tools:
//!
//! - `get_git_log`: commit history of a local repository, read through the `git` binary
//! - `push_kimai_entries`: forwards time entries to a Kimai instance, one request per entry

pub mod config;
pub mod error;
pub mod git;
pub mod kimai;
pub mod mcp;
pub mod models;

pub use error::{AppError, Result};
