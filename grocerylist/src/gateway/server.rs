//! Line-delimited JSON-RPC server for the gateway methods

use super::methods::GatewayMethods;
use super::protocol::{error_response, success_response, RpcError, RpcRequest};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Serves [`GatewayMethods`] over a reader/writer pair, one request per line
#[derive(Clone)]
pub struct GatewayServer {
    methods: Arc<GatewayMethods>,
}

impl GatewayServer {
    /// Create a server for the given method registry
    pub fn new(methods: GatewayMethods) -> Self {
        Self {
            methods: Arc::new(methods),
        }
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests from `reader`, writing responses to `writer`, until EOF
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Gateway listening with methods: {}", self.methods.names().join(", "));
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            tracing::debug!("Received request: {}", trimmed);

            if let Some(response) = self.handle_line(trimmed).await {
                let response_json = serde_json::to_string(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                tracing::debug!("Sent response: {}", response_json);
            }
        }

        tracing::debug!("EOF reached, gateway stopping");
        Ok(())
    }

    /// Handle one request line; notifications produce no response
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to parse JSON request: {}", e);
                return Some(error_response(Value::Null, RpcError::parse_error(e)));
            }
        };

        let request = match RpcRequest::from_value(value) {
            Ok(request) => request,
            Err((id, error)) => return id.map(|id| error_response(id, error)),
        };

        let result = self.methods.call(&request.method, request.params).await;
        let id = request.id?;
        Some(match result {
            Ok(result) => success_response(id, result),
            Err(error) => error_response(id, error),
        })
    }
}
