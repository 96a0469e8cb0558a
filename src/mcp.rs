//! MCP (Model Context Protocol) handling module
//!
//! JSON-RPC 2.0 over line-delimited stdio. Every `tools/call` runs as its own
//! task so the host can issue calls concurrently; responses go through one
//! writer in completion order.

use crate::docbase::DocBaseClient;
use crate::error::AppError;
use crate::tools::args::ToolArguments;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes
pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const REQUEST_CANCELLED: i64 = -32800;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct ServerContext {
    pub client: Arc<DocBaseClient>,
    pub tool_timeout: Duration,
    pub client_info: Option<ClientInfo>,
}

impl ServerContext {
    pub fn new(client: DocBaseClient, tool_timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            tool_timeout,
            client_info: None,
        }
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version field - required by the protocol but not accessed in code
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

impl McpRequest {
    /// Requests without an id are notifications and never get a response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// notifications/cancelled parameters
#[derive(Debug, Deserialize)]
pub struct CancelledParams {
    #[serde(rename = "requestId")]
    pub request_id: Value,
    pub reason: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP Error structure
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i64,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl McpResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.to_string(),
            }),
        }
    }
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(content)],
            is_error: false,
        }
    }

    /// A failed tool call, reported to the host as a result flagged isError
    pub fn error(err: &AppError) -> Self {
        Self {
            content: vec![ContentItem::text(err.message())],
            is_error: true,
        }
    }
}

impl ContentItem {
    /// Helper to create plain text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: content.into(),
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize MCP response to JSON string
pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Handle stdio MCP communication
pub async fn handle_stdio(context: ServerContext) -> Result<()> {
    info!("Starting docbase-mcp server on stdio");

    let (tx, mut rx) = mpsc::unbounded_channel::<McpResponse>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = rx.recv().await {
            let response_json = serialize_response(&response)?;
            debug!("Sending response: {}", response_json);
            stdout.write_all(response_json.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<(), anyhow::Error>(())
    });

    serve(AsyncBufReader::new(tokio::io::stdin()), context, tx).await?;
    writer.await??;

    info!("stdin closed, shutting down");
    Ok(())
}

/// Read requests line by line until EOF, sending every response to `tx`
pub async fn serve<R>(
    reader: R,
    mut context: ServerContext,
    tx: mpsc::UnboundedSender<McpResponse>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    // Keyed by the JSON text of the request id
    let mut in_flight: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);
        in_flight.retain(|_, handle| !handle.is_finished());

        let request = match parse_request(&line) {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let _ = tx.send(McpResponse::error(
                    None,
                    PARSE_ERROR,
                    &format!("Invalid JSON: {}", e),
                ));
                continue;
            }
        };

        match request.method.as_str() {
            "tools/call" => {
                let Some(id) = request.id.clone() else {
                    warn!("Ignoring tools/call sent as a notification");
                    continue;
                };
                let task_context = context.clone();
                let task_tx = tx.clone();
                let handle = tokio::spawn(async move {
                    let response = handle_tool_call(request, &task_context).await;
                    let _ = task_tx.send(response);
                });
                in_flight.insert(id.to_string(), handle);
            }
            "notifications/cancelled" => {
                if let Some(response) = cancel_request(request.params, &mut in_flight).await {
                    let _ = tx.send(response);
                }
            }
            _ => {
                if let Some(response) = handle_request(request, &mut context).await {
                    let _ = tx.send(response);
                }
            }
        }
    }

    // Let calls already running finish before the writer shuts down
    for (_, handle) in in_flight {
        let _ = handle.await;
    }
    Ok(())
}

/// Abort an in-flight tool call and answer it with a cancellation error.
/// A call that already sent its response is left alone.
async fn cancel_request(
    params: Option<Value>,
    in_flight: &mut HashMap<String, JoinHandle<()>>,
) -> Option<McpResponse> {
    let params: CancelledParams = serde_json::from_value(params?).ok()?;
    let handle = in_flight.remove(&params.request_id.to_string())?;
    handle.abort();
    match handle.await {
        Err(e) if e.is_cancelled() => {}
        _ => {
            debug!("Request {} completed before cancellation", params.request_id);
            return None;
        }
    }

    let reason = params.reason.unwrap_or_else(|| "cancelled by client".to_string());
    info!("Cancelled request {}: {}", params.request_id, reason);
    let err = AppError::Cancelled(reason);
    Some(McpResponse::error(Some(params.request_id), REQUEST_CANCELLED, &err.message()))
}

/// Handle a single non-tool-call MCP request; notifications yield `None`
async fn handle_request(request: McpRequest, context: &mut ServerContext) -> Option<McpResponse> {
    if request.is_notification() {
        debug!("Notification: {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request, context),
        "tools/list" => handle_tools_list(request),
        "tools/call" => handle_tool_call(request, context).await,
        "ping" => McpResponse::success(request.id, serde_json::json!({})),
        _ => McpResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            &format!("Method '{}' not found", request.method),
        ),
    };
    Some(response)
}

/// Handle tools/call method
async fn handle_tool_call(request: McpRequest, context: &ServerContext) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id,
                INVALID_PARAMS,
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    let Some(tool) = crate::tools::find(&args.name) else {
        return McpResponse::error(
            request.id,
            INVALID_PARAMS,
            &format!("Tool '{}' not found", args.name),
        );
    };

    info!("Tool call: {}", tool.name());
    let outcome = match ToolArguments::from_value(args.arguments) {
        Ok(arguments) => match timeout(context.tool_timeout, tool.call(&context.client, arguments)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AppError::Timeout(format!(
                "{} exceeded {} second deadline",
                tool.name(),
                context.tool_timeout.as_secs()
            ))),
        },
        Err(e) => Err(e),
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            debug!("Tool {} failed ({}): {}", tool.name(), e.error_code(), e);
            ToolResult::error(&e)
        }
    };

    match serde_json::to_value(result) {
        Ok(value) => McpResponse::success(request.id, value),
        Err(e) => McpResponse::error(
            request.id,
            INTERNAL_ERROR,
            &format!("Failed to encode result: {}", e),
        ),
    }
}

/// Handle tools/list method
fn handle_tools_list(request: McpRequest) -> McpResponse {
    let tools = crate::tools::build_tools_array();
    McpResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle initialize method
fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    let mut protocol_version = DEFAULT_PROTOCOL_VERSION.to_string();

    if let Some(params) = request.params {
        if let Ok(init_params) = serde_json::from_value::<InitializeParams>(params) {
            context.client_info = init_params.client_info;
            if let Some(version) = init_params.protocol_version {
                protocol_version = version;
            }
        }
    }

    info!(
        "Initialized by {} {}",
        context.get_client_name(),
        context
            .client_info
            .as_ref()
            .and_then(|i| i.version.as_deref())
            .unwrap_or("")
    );

    let result = serde_json::json!({
        "protocolVersion": protocol_version,
        "serverInfo": {
            "name": "docbase-mcp",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": {}
        }
    });
    McpResponse::success(request.id, result)
}
