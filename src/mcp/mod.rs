//! Model Context Protocol surface.
//!
//! - `jsonrpc`: request/response envelopes and error codes
//! - `tools`: tool definitions for `tools/list` and typed argument decoding
//! - `server`: method routing and tool dispatch
//! - `transport`: newline-delimited JSON-RPC over stdio

pub mod jsonrpc;
pub mod server;
pub mod tools;
pub mod transport;

pub use server::McpServer;
