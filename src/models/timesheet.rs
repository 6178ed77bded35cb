use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One Kimai timesheet record, sent as-is in the POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub begin: String,
    pub end: String,
    pub project: i64,
    pub activity: i64,
    pub description: String,
}

/// Arguments of `push_kimai_entries`.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEntriesRequest {
    pub entries: Vec<TimeEntry>,
}

/// The fields of a created timesheet we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct TimesheetResponse {
    pub id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeDetail {
    /// Remote-assigned identifier
    Created(String),
    /// Non-success status; the parsed error body
    Rejected { status: u16, body: Value },
    /// Transport or decoding failure
    Exception(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// One-based position in the submitted list
    pub index: usize,
    pub detail: OutcomeDetail,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.detail, OutcomeDetail::Created(_))
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            OutcomeDetail::Created(id) => write!(f, "Entry {}: ✅ Success - ID {}", self.index, id),
            OutcomeDetail::Rejected { body, .. } => {
                write!(f, "Entry {}: ❌ Failed - {}", self.index, body)
            }
            OutcomeDetail::Exception(message) => {
                write!(f, "Entry {}: ❌ Exception - {}", self.index, message)
            }
        }
    }
}
