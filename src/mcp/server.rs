use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::git::GitRepository;
use crate::kimai::{render_outcomes, TimesheetPusher};
use crate::mcp::jsonrpc::{
    json_rpc_error, json_rpc_response, tool_text_result, JsonRpcRequest, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::mcp::tools::{tool_definitions, ToolCall};
use crate::models::{LogQueryRequest, PushEntriesRequest};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "mcp-git";
pub const SERVER_TITLE: &str = "MCP Git";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    default_repo: PathBuf,
    git_timeout: Duration,
    pusher: TimesheetPusher,
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let pusher = TimesheetPusher::new(config.kimai, config.http_timeout)?;
        Ok(Self {
            default_repo: config.default_repo,
            git_timeout: config.git_timeout,
            pusher,
        })
    }

    /// Handles one raw frame. Returns `None` when no reply is due.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC frame");
                return Some(json_rpc_error(None, PARSE_ERROR, &format!("Parse error: {}", e)));
            }
        };

        let id = value.get("id").cloned().filter(|v| !v.is_null());
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => Some(json_rpc_error(
                id,
                INVALID_REQUEST,
                &format!("Invalid request: {}", e),
            )),
        }
    }

    pub async fn handle(&self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        debug!(method, "Handling request");

        match method {
            "initialize" => Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": MCP_VERSION,
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "title": SERVER_TITLE,
                        "version": SERVER_VERSION
                    },
                    "capabilities": { "tools": {} }
                }),
            )),
            "ping" => Some(json_rpc_response(request.id, json!({}))),
            "tools/list" => Some(json_rpc_response(
                request.id,
                json!({ "tools": tool_definitions() }),
            )),
            // Results of a tool call sent as a notification could never reach the caller.
            "tools/call" if request.is_notification() => {
                warn!("Ignoring tools/call sent without an id");
                None
            }
            "tools/call" => {
                let Some(params) = request.params.as_ref().and_then(|p| p.as_object()) else {
                    return Some(json_rpc_error(
                        request.id,
                        INVALID_PARAMS,
                        "params must be an object",
                    ));
                };
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                let args = params.get("arguments").cloned().unwrap_or(Value::Null);

                match self.call_tool(name, args).await {
                    Ok(text) => Some(json_rpc_response(request.id, tool_text_result(&text))),
                    Err(e) => {
                        warn!(tool = name, error = %e, "Tool call failed");
                        Some(json_rpc_error(request.id, e.code(), &e.message_for(name)))
                    }
                }
            }
            // Notifications (no id) never get a reply, known or not.
            _ if request.is_notification() => None,
            _ => Some(json_rpc_error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", method),
            )),
        }
    }

    pub async fn call_tool(&self, name: &str, args: Value) -> Result<String> {
        let call = ToolCall::parse(name, args)?;
        debug!(tool = call.name(), "Calling tool");
        match call {
            ToolCall::GetGitLog(request) => self.get_git_log(&request).await,
            ToolCall::PushKimaiEntries(request) => self.push_kimai_entries(&request).await,
        }
    }

    pub async fn get_git_log(&self, request: &LogQueryRequest) -> Result<String> {
        let repo = match request.repo_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => GitRepository::open(path)?,
            None => GitRepository::open(&self.default_repo)?,
        };
        repo.log_report(request, self.git_timeout).await
    }

    pub async fn push_kimai_entries(&self, request: &PushEntriesRequest) -> Result<String> {
        let outcomes = self.pusher.push(&request.entries).await?;
        Ok(render_outcomes(&outcomes))
    }
}
