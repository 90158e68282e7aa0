use crate::config::Config;
use crate::isolation::IsolationHandler;
use crate::logging::{AccessLogFormat, AccessLogger, LogEntry};
use crate::server::response::ErrorResponse;
use crate::server::static_files::{self, StaticFileHandler};
use crate::server::wasm::WasmAssetHandler;
use anyhow::Result;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

pub struct RequestHandler {
    config: Arc<Config>,
    static_handler: StaticFileHandler,
    wasm_handler: WasmAssetHandler,
    isolation_handler: IsolationHandler,
    access_logger: Option<AccessLogger>,
}

impl RequestHandler {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let access_logger = if let Some(ref access_log_path) = config.logging.access_log {
            let format = match config.logging.access_log_format.as_str() {
                "json" => AccessLogFormat::Json,
                "common" => AccessLogFormat::CommonLog,
                _ => AccessLogFormat::Combined,
            };
            Some(AccessLogger::new(Some(access_log_path), format)?)
        } else {
            None
        };

        Ok(Self {
            static_handler: StaticFileHandler::new(),
            wasm_handler: WasmAssetHandler::new(config.clone()),
            isolation_handler: IsolationHandler::new(config.clone()),
            access_logger,
            config,
        })
    }

    pub async fn handle_request<B>(
        &self,
        req: Request<B>,
        client_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let request_id = Uuid::new_v4();
        let start_time = std::time::Instant::now();

        let method = req.method().clone();
        let uri = req.uri().clone();

        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let referer = req
            .headers()
            .get("referer")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let result = self.process_request(req).await;

        let duration = start_time.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    error = %e,
                    "Request processing failed"
                );
                let path = uri.path().to_string();
                self.isolation_handler
                    .decorate(ErrorResponse::internal_server_error().build(), &path)
            }
        };

        tracing::info!(
            request_id = %request_id,
            status = %response.status(),
            duration_ms = duration.as_millis(),
            "Request completed"
        );

        if let Some(ref access_logger) = self.access_logger {
            let content_length = response
                .headers()
                .get("content-length")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);

            let log_entry = LogEntry {
                request_id,
                remote_addr: client_addr.ip().to_string(),
                method: method.to_string(),
                uri: uri.to_string(),
                status: response.status().as_u16(),
                response_size: content_length,
                duration_ms: duration.as_millis() as f64,
                user_agent,
                referer,
                timestamp: chrono::Utc::now(),
            };

            access_logger.log(log_entry).await;
        }

        Ok(response)
    }

    async fn process_request<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>> {
        let path = req.uri().path().to_string();
        let document_root = self.config.assets.root.as_str();

        let accept_encoding = req
            .headers()
            .get("accept-encoding")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Precompressed wasm fast path first; anything it declines falls
        // through to plain static serving. GET only: the static path owns
        // the 405 policy and the header-only handling for HEAD.
        let mut response = None;
        if req.method() == Method::GET && WasmAssetHandler::is_wasm_path(&path) {
            if let Ok(asset_path) = static_files::resolve_under_root(&path, document_root) {
                response = self
                    .wasm_handler
                    .serve(&path, &accept_encoding, &asset_path)
                    .await;
            }
        }

        let response = match response {
            Some(response) => response,
            None => {
                self.static_handler
                    .serve_file(&req, document_root, &self.config.assets.index_files)
                    .await?
            }
        };

        Ok(self.isolation_handler.decorate(response, &path))
    }
}
