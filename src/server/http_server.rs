use crate::config::Config;
use crate::server::request_handler::RequestHandler;
use anyhow::{Context, Result};
use futures::future::join_all;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

pub struct HttpServer {
    config: Arc<Config>,
    handler: Arc<RequestHandler>,
}

impl HttpServer {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let handler = Arc::new(RequestHandler::new(config.clone())?);

        Ok(Self { config, handler })
    }

    pub async fn run(self) -> Result<()> {
        let addresses = self.config.listen_addresses()?;

        if addresses.is_empty() {
            return Err(anyhow::anyhow!("No listen addresses configured"));
        }

        info!("Starting wasmserve development server");

        let mut listeners = Vec::new();
        for addr in &addresses {
            let listener = TcpListener::bind(*addr)
                .await
                .with_context(|| format!("Failed to bind to {}", addr))?;
            info!("Listening on http://{}", addr);
            listeners.push(listener);
        }

        let server_tasks = listeners.into_iter().map(|listener| {
            let handler = self.handler.clone();
            let config = self.config.clone();

            tokio::spawn(async move { Self::serve_listener(listener, handler, config).await })
        });

        tokio::select! {
            results = join_all(server_tasks) => {
                for result in results {
                    if let Err(e) = result {
                        error!("Server task failed: {}", e);
                    }
                }
            }
            _ = self.wait_for_signal() => {
                info!("Received shutdown signal, stopping server");
            }
        }

        info!("Server stopped");
        Ok(())
    }

    async fn serve_listener(
        listener: TcpListener,
        handler: Arc<RequestHandler>,
        config: Arc<Config>,
    ) -> Result<()> {
        loop {
            let (stream, addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let handler = handler.clone();
            let config = config.clone();

            tokio::spawn(async move {
                if let Err(e) = Self::handle_connection(stream, addr, handler, config).await {
                    error!("Connection error from {}: {}", addr, e);
                }
            });
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        addr: std::net::SocketAddr,
        handler: Arc<RequestHandler>,
        config: Arc<Config>,
    ) -> Result<()> {
        stream.set_nodelay(config.server.tcp_nodelay)?;

        let io = TokioIo::new(stream);
        let service = hyper::service::service_fn(move |req| {
            let handler = handler.clone();
            let addr = addr;
            async move { handler.handle_request(req, addr).await }
        });

        http1::Builder::new()
            .keep_alive(config.server.keep_alive)
            .serve_connection(io, service)
            .await
            .map_err(|e| anyhow::anyhow!("HTTP connection error: {}", e))?;

        Ok(())
    }

    async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use futures::stream::StreamExt;
            let mut signals =
                Signals::new([SIGTERM, SIGINT, SIGQUIT]).expect("Failed to register signal handlers");

            while let Some(signal) = signals.next().await {
                match signal {
                    SIGTERM | SIGINT | SIGQUIT => {
                        info!("Received signal {}, initiating graceful shutdown", signal);
                        break;
                    }
                    _ => {}
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            info!("Received Ctrl-C, initiating graceful shutdown");
        }
    }
}
