use crate::config::Config;
use crate::server::wasm::WasmAssetHandler;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::sync::Arc;

#[cfg(test)]
mod tests;

pub const COOP_HEADER: &str = "cross-origin-opener-policy";
pub const COEP_HEADER: &str = "cross-origin-embedder-policy";

/// Decorates every response with the header pair browsers require before
/// exposing SharedArrayBuffer and high-resolution timers to the page, plus
/// the aggressive immutable cache policy for wasm assets.
pub struct IsolationHandler {
    config: Arc<Config>,
}

impl IsolationHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Applied unconditionally, after the body and primary headers are
    /// settled. The wasm fast path already sets cache-control inline;
    /// re-inserting the same value here keeps the fallback path (raw wasm
    /// bytes, 304s, 404s for wasm URLs) cache-consistent too.
    pub fn decorate(
        &self,
        mut response: Response<Full<Bytes>>,
        request_path: &str,
    ) -> Response<Full<Bytes>> {
        let headers = response.headers_mut();

        headers.insert(COOP_HEADER, "same-origin".parse().unwrap());
        headers.insert(COEP_HEADER, "require-corp".parse().unwrap());

        if WasmAssetHandler::is_wasm_path(request_path) {
            if let Ok(value) = self.config.assets.wasm_cache_control.parse() {
                headers.insert("cache-control", value);
            }
        }

        headers.insert(
            "server",
            concat!("wasmserve/", env!("CARGO_PKG_VERSION")).parse().unwrap(),
        );

        response
    }
}
