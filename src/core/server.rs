//! MCP Server Implementation
//!
//! This module contains the core MCP server implementation including:
//! - JSON-RPC 2.0 request/response structures
//! - The method router (`initialize`, `tools/list`, `tools/call`, stubs)
//! - STDIO server implementation for line-based communication
//!
//! Requests are handled strictly one at a time: a line is read, fully
//! processed (including any remote call a tool makes) and answered before the
//! next line is read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::core::config::{ApiKeyGate, Config};
use crate::core::error::ServerError;
use crate::tools::create_list::CreateListTool;
use crate::tools::map_client::{HttpTransport, MapClient, MapTransport};
use crate::tools::{Arguments, Toolbox};

/// MCP protocol revision negotiated in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error code: the line was not a valid request object.
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC error code: no such method.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC error code: the method's params could not be decoded.
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC error code: the server failed to build a response.
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// The `jsonrpc` member is accepted but not checked. A missing or `null` id
/// reads as 0.
#[derive(Deserialize, Debug)]
pub struct MCPRequest {
    /// Request ID for correlating responses
    #[serde(default)]
    pub id: Option<i64>,
    /// MCP method name (e.g., "initialize", "tools/list", "tools/call")
    #[serde(default)]
    pub method: String,
    /// Method-specific parameters. `None` when the member is absent,
    /// `Some(Value::Null)` when it is an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub params: Option<Value>,
}

/// Keeps an explicit `null` distinct from a missing member.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 response structure for MCP protocol.
///
/// Exactly one of `result` and `error` is present.
#[derive(Serialize, Debug, PartialEq)]
pub struct MCPResponse {
    /// JSON-RPC version identifier, always "2.0"
    pub jsonrpc: &'static str,
    /// Request ID from the original request
    pub id: i64,
    /// Response result, present when request succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information, present when request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

impl MCPResponse {
    pub fn success(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: i64, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(MCPError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Debug, PartialEq)]
pub struct MCPError {
    /// JSON-RPC error code (e.g., -32601 for method not found)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
}

/// `tools/call` params.
#[derive(Deserialize, Debug, Default)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// Server metadata as reported in `initialize` responses.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// The JSON-RPC router.
///
/// Owns the read-only tool catalogue and handlers; built once per process.
pub struct Server {
    info: ServerInfo,
    toolbox: Toolbox,
}

impl Server {
    /// Build a server that talks to the real map endpoint.
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        let transport = HttpTransport::new(config.map_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a server whose map tool uses the given transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn MapTransport>) -> Self {
        let client = MapClient::new(config.map_endpoint.clone(), transport);
        let create_list = CreateListTool::new(ApiKeyGate::default(), config.api_key.clone(), client);
        Self {
            info: ServerInfo {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
            },
            toolbox: Toolbox::new(create_list),
        }
    }

    /// Handle one input line.
    ///
    /// Returns `None` when nothing should be written back (notifications).
    /// A line that does not decode as a request gets a parse error with id 0.
    pub async fn handle_line(&self, line: &str) -> Option<MCPResponse> {
        match serde_json::from_str::<MCPRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "parse error");
                Some(MCPResponse::failure(0, PARSE_ERROR, "Parse error"))
            }
        }
    }

    /// Route a decoded request to its method handler.
    pub async fn handle_request(&self, request: MCPRequest) -> Option<MCPResponse> {
        let id = request.id.unwrap_or(0);
        debug!(method = %request.method, id, "dispatching request");

        let response = match request.method.as_str() {
            "initialize" => MCPResponse::success(id, self.initialize_result()),
            method if method.starts_with("notifications/") => return None,
            "tools/list" => MCPResponse::success(id, json!({ "tools": self.toolbox.catalogue() })),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "prompts/list" => MCPResponse::success(id, json!({ "prompts": [] })),
            "resources/list" => MCPResponse::success(id, json!({ "resources": [] })),
            _ => MCPResponse::failure(id, METHOD_NOT_FOUND, "Method not found"),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": true }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            }
        })
    }

    /// Handle MCP tools/call method.
    ///
    /// Missing or malformed params are a protocol error; `null` params read
    /// as an empty call (and so an unknown tool). Everything the tool itself
    /// reports, including an unknown tool name, comes back as a normal
    /// result carrying `isError`.
    async fn handle_tools_call(&self, id: i64, params: Option<Value>) -> MCPResponse {
        let params = match params {
            Some(Value::Null) => ToolCallParams::default(),
            Some(params) => match serde_json::from_value::<ToolCallParams>(params) {
                Ok(params) => params,
                Err(e) => {
                    warn!(error = %e, "invalid tools/call params");
                    return MCPResponse::failure(id, INVALID_PARAMS, "Invalid params");
                }
            },
            None => return MCPResponse::failure(id, INVALID_PARAMS, "Invalid params"),
        };

        let arguments = Arguments::from(params.arguments);
        let result = self.toolbox.call(&params.name, &arguments).await;
        debug!(tool = %params.name, is_error = result.is_error, "tool finished");

        match serde_json::to_value(&result) {
            Ok(value) => MCPResponse::success(id, value),
            Err(e) => MCPResponse::failure(id, INTERNAL_ERROR, format!("Internal error: {e}")),
        }
    }

    /// Serve requests from `reader` until it is exhausted.
    ///
    /// Each response is written as a single line and flushed immediately.
    /// Blank lines and lines that are not valid UTF-8 are malformed like any
    /// other and get a parse error. Only a failure to read input or write
    /// output ends the loop early.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = reader;
        let mut buf = Vec::with_capacity(8192);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line.trim_end_matches(['\n', '\r'])).await,
                Err(e) => {
                    warn!(error = %e, "input line is not valid UTF-8");
                    Some(MCPResponse::failure(0, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }
}

/// Write one response followed by a newline and flush.
async fn write_response<W>(writer: &mut W, response: &MCPResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Run the MCP server in STDIO mode.
///
/// Implements MCP protocol over standard input/output. The server reads
/// JSON-RPC requests line-by-line from stdin and writes responses to stdout.
/// All logging goes to stderr to avoid interfering with the JSON-RPC protocol
/// stream. Returns once stdin is closed.
pub async fn run_server_stdio(config: Config) -> Result<(), ServerError> {
    info!(
        name = %config.server_name,
        version = %config.server_version,
        map_endpoint = %config.map_endpoint,
        "MCP server starting (STDIO mode)"
    );

    let server = Server::new(&config)?;
    let stdin = BufReader::with_capacity(8192, tokio::io::stdin());
    server.run(stdin, tokio::io::stdout()).await?;

    info!("stdin closed, shutting down");
    Ok(())
}
