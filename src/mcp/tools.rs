//! Tool catalogue and argument decoding.
//!
//! Arguments are validated into typed requests here, once, so the
//! capabilities never touch raw JSON.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::{LogQueryRequest, PushEntriesRequest, DEFAULT_LIMIT};

pub const GET_GIT_LOG: &str = "get_git_log";
pub const PUSH_KIMAI_ENTRIES: &str = "push_kimai_entries";

#[derive(Debug, Clone)]
pub enum ToolCall {
    GetGitLog(LogQueryRequest),
    PushKimaiEntries(PushEntriesRequest),
}

impl ToolCall {
    pub fn parse(name: &str, args: Value) -> Result<Self> {
        match name {
            GET_GIT_LOG => Ok(ToolCall::GetGitLog(decode(name, args)?)),
            PUSH_KIMAI_ENTRIES => Ok(ToolCall::PushKimaiEntries(decode(name, args)?)),
            other => Err(AppError::UnknownOperation(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetGitLog(_) => GET_GIT_LOG,
            ToolCall::PushKimaiEntries(_) => PUSH_KIMAI_ENTRIES,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    let args = match args {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| AppError::InvalidParams(format!("{}: {}", tool, e)))
}

pub fn tool_definitions() -> Value {
    json!([
        {
            "name": GET_GIT_LOG,
            "description": "Get git log of repository",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "repo_path": {
                        "type": "string",
                        "description": "Path to the Git repository (defaults to current directory)"
                    },
                    "number": {
                        "type": "number",
                        "description": format!("Number of commits to retrieve (default: {})", DEFAULT_LIMIT),
                        "default": DEFAULT_LIMIT
                    },
                    "author": {
                        "type": "string",
                        "description": "Filter commits by author name"
                    },
                    "since": {
                        "type": "string",
                        "description": "Show commits since date (e.g., \"2024-01-01\", \"1 week ago\")"
                    },
                    "until": {
                        "type": "string",
                        "description": "Show commits until date (e.g., \"2024-12-31\", \"yesterday\")"
                    },
                    "branch": {
                        "type": "string",
                        "description": "Branch to read (defaults to the checked-out branch)"
                    },
                    "branches": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Branches to read, one report section each, in this order"
                    }
                },
                "required": []
            }
        },
        {
            "name": PUSH_KIMAI_ENTRIES,
            "description": "Push time entries to the Kimai time-tracking API",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "entries": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "begin": { "type": "string", "description": "Start time, e.g. 2024-05-01T09:00:00" },
                                "end": { "type": "string", "description": "End time, e.g. 2024-05-01T10:30:00" },
                                "project": { "type": "integer", "description": "Kimai project id" },
                                "activity": { "type": "integer", "description": "Kimai activity id" },
                                "description": { "type": "string", "description": "What was worked on" }
                            },
                            "required": ["begin", "end", "project", "activity", "description"]
                        }
                    }
                },
                "required": ["entries"]
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_tools() {
        let defs = tool_definitions();
        let names: Vec<&str> = defs
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t.get("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names, vec![GET_GIT_LOG, PUSH_KIMAI_ENTRIES]);
    }

    #[test]
    fn unknown_tool_is_method_not_found() {
        let err = ToolCall::parse("rm_rf", json!({})).unwrap_err();
        assert!(matches!(err, AppError::UnknownOperation(ref n) if n == "rm_rf"));
    }

    #[test]
    fn null_arguments_decode_as_empty_object() {
        let call = ToolCall::parse(GET_GIT_LOG, Value::Null).unwrap();
        match call {
            ToolCall::GetGitLog(req) => assert_eq!(req.limit(), DEFAULT_LIMIT),
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn malformed_entries_are_invalid_params() {
        let err = ToolCall::parse(PUSH_KIMAI_ENTRIES, json!({ "entries": [{ "begin": "x" }] }))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidParams(_)));

        let err = ToolCall::parse(PUSH_KIMAI_ENTRIES, json!({})).unwrap_err();
        assert!(matches!(err, AppError::InvalidParams(_)));
    }
}
