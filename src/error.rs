//! Application error types and protocol error mapping.
//!
//! Defines `AppError` for every condition that aborts a whole tool call and
//! classifies each variant into exactly one JSON-RPC error code, so the
//! dispatcher never forwards an unclassified native error.
//!
//! Error mappings:
//! - `UnknownOperation` → -32601 (method not found)
//! - `InvalidParams` → -32602
//! - everything else → -32603 (internal error)
//!
//! Per-entry timesheet failures are not errors here; they are recorded as
//! `SubmissionOutcome`s and never abort a push.

use thiserror::Error;

use crate::mcp::jsonrpc::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not a Git repository: {0}")]
    NotAGitRepository(String),

    #[error("Command failed: {0}")]
    CommandExecution(String),

    #[error("Command output exceeded {limit} bytes")]
    OutputTooLarge { limit: usize },

    #[error("{what} timed out after {secs}s")]
    Timeout { what: String, secs: u64 },

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i64 {
        match self {
            AppError::UnknownOperation(_) => METHOD_NOT_FOUND,
            AppError::InvalidParams(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        }
    }

    /// Message surfaced to the caller, prefixed with the tool that failed.
    ///
    /// Unknown tools and bad arguments are reported as-is since no tool ran.
    pub fn message_for(&self, tool: &str) -> String {
        match self {
            AppError::UnknownOperation(_) | AppError::InvalidParams(_) => self.to_string(),
            _ => format!("{} failed: {}", tool, self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
