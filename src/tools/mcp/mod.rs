// MCP (Model-Context-Protocol) over subprocess stdio
//
// Line-delimited JSON-RPC 2.0 against a spawned server process.

pub mod client;

pub use client::{McpSession, McpToolInfo};
