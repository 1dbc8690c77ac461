//! MCP server implementation.
//!
//! The server handles the MCP protocol lifecycle:
//! 1. Initialize - exchange capabilities
//! 2. List and call tools - one request at a time, in arrival order
//! 3. Shutdown - on EOF from the client

use std::io;

use serde_json::Value;

use crate::handlers::ToolHandler;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, ToolsListResult, MCP_VERSION,
};
use crate::transport::{IncomingMessage, StdioTransport};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "atomicwork-mcp";

/// MCP server for Atomicwork tickets.
pub struct McpServer {
    handler: ToolHandler,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server around a tool handler.
    pub fn new(handler: ToolHandler) -> Self {
        Self {
            handler,
            initialized: false,
        }
    }

    /// Run the MCP server over stdin/stdout until EOF.
    pub async fn run(&mut self) -> io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    /// Serve messages from `transport` until EOF.
    ///
    /// Unparseable lines are answered with a parse error and skipped; I/O
    /// failures end the loop.
    pub async fn serve(&mut self, transport: &mut StdioTransport) -> io::Result<()> {
        tracing::info!("Starting MCP server");

        while let Some(msg) = transport.read_message()? {
            if let Some(response) = self.handle_message(msg).await {
                if let Err(e) = transport.write_response(&response) {
                    tracing::error!("Failed to write response: {}", e);
                    return Err(e);
                }
            }
        }

        tracing::info!("EOF received, MCP server stopped");
        Ok(())
    }

    /// Handle an incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> Option<JsonRpcResponse> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(req).await),
            IncomingMessage::Notification(notif) => {
                self.handle_notification(&notif.method);
                None
            }
            IncomingMessage::Malformed(reason) => Some(JsonRpcResponse::error(
                RequestId::Null,
                JsonRpcError::parse_error(&reason),
            )),
        }
    }

    /// Handle a JSON-RPC request.
    async fn handle_request(&mut self, req: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Handling request: {} (id: {:?})", req.method, req.id);

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id, req.params),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
            method => {
                tracing::warn!("Unknown method: {}", method);
                JsonRpcResponse::error(req.id, JsonRpcError::method_not_found(method))
            }
        }
    }

    /// Handle notifications (no response).
    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                tracing::info!("Client initialized");
            }
            "notifications/cancelled" => {
                tracing::debug!("Request cancelled by client");
            }
            _ => {
                tracing::debug!("Ignoring notification: {}", method);
            }
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if self.initialized {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Server already initialized"),
            );
        }

        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(init_params) => {
                    tracing::info!(
                        "Client: {} v{} (protocol: {})",
                        init_params.client_info.name,
                        init_params.client_info.version,
                        init_params.protocol_version
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to parse initialize params: {}", e);
                }
            }
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.handler.available_tools(),
        };
        JsonRpcResponse::from_serializable(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(&e.to_string()),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        tracing::info!("Calling tool: {}", params.name);

        let result = self.handler.execute(&params.name, params.arguments).await;
        JsonRpcResponse::from_serializable(id, &result)
    }
}
