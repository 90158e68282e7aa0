use crate::config::Config;
use crate::server::response::ResponseBuilder;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

pub const WASM_SUFFIX: &str = ".wasm";
pub const WASM_MIME: &str = "application/wasm";

const BROTLI_SUFFIX: &str = ".br";
const GZIP_SUFFIX: &str = ".gz";

/// Serves the precompressed fast path for WebAssembly binaries: when the
/// client advertises brotli or gzip support and a matching precompressed
/// sibling (`X.wasm.br` / `X.wasm.gz`) exists next to the asset, that
/// sibling's bytes are sent as-is with the corresponding Content-Encoding.
pub struct WasmAssetHandler {
    config: Arc<Config>,
}

impl WasmAssetHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn is_wasm_path(path: &str) -> bool {
        path.ends_with(WASM_SUFFIX)
    }

    /// Attempts the precompressed fast path. Returns `None` when the
    /// request is not for a wasm asset, no acceptable sibling exists, or the
    /// sibling vanished between the existence check and the read; the caller
    /// falls through to plain static serving in all of those cases.
    pub async fn serve(
        &self,
        request_path: &str,
        accept_encoding: &str,
        asset_path: &Path,
    ) -> Option<Response<Full<Bytes>>> {
        if !Self::is_wasm_path(request_path) {
            return None;
        }

        let (sibling_path, encoding) = self.select_sibling(accept_encoding, asset_path).await?;

        let content = match fs::read(&sibling_path).await {
            Ok(content) => Bytes::from(content),
            Err(_) => return None,
        };

        debug!(
            "Serving precompressed wasm: {} ({})",
            sibling_path.display(),
            encoding
        );

        let response = ResponseBuilder::new(StatusCode::OK)
            .header("content-type", WASM_MIME)
            .header("content-encoding", encoding)
            .header_string("content-length", content.len().to_string())
            .header_string(
                "cache-control",
                self.config.assets.wasm_cache_control.clone(),
            )
            .body(content)
            .build();

        Some(response)
    }

    /// Representation choice is a raw substring check against the
    /// Accept-Encoding value, not a q-value parse; brotli always wins over
    /// gzip when both are acceptable and present on disk. Sibling presence
    /// is checked per request and never cached.
    async fn select_sibling(
        &self,
        accept_encoding: &str,
        asset_path: &Path,
    ) -> Option<(PathBuf, &'static str)> {
        if accept_encoding.contains("br") {
            let brotli_path = sibling_path(asset_path, BROTLI_SUFFIX);
            if file_exists(&brotli_path).await {
                return Some((brotli_path, "br"));
            }
        }

        if accept_encoding.contains("gzip") {
            let gzip_path = sibling_path(asset_path, GZIP_SUFFIX);
            if file_exists(&gzip_path).await {
                return Some((gzip_path, "gzip"));
            }
        }

        None
    }
}

fn sibling_path(asset_path: &Path, suffix: &str) -> PathBuf {
    let mut os_string = asset_path.as_os_str().to_os_string();
    os_string.push(suffix);
    PathBuf::from(os_string)
}

async fn file_exists(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_handler() -> WasmAssetHandler {
        WasmAssetHandler::new(Arc::new(Config::default()))
    }

    fn write_gzip(path: &Path, data: &[u8]) {
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap();
    }

    fn write_brotli(path: &Path, data: &[u8]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = brotli::CompressorWriter::new(file, 4096, 6, 22);
        writer.write_all(data).unwrap();
        writer.flush().unwrap();
    }

    #[test]
    fn test_is_wasm_path() {
        assert!(WasmAssetHandler::is_wasm_path("/game.wasm"));
        assert!(WasmAssetHandler::is_wasm_path("/nested/app.wasm"));
        assert!(!WasmAssetHandler::is_wasm_path("/game.wasm.br"));
        assert!(!WasmAssetHandler::is_wasm_path("/index.html"));
    }

    #[test]
    fn test_sibling_path_appends_suffix() {
        let path = Path::new("/tmp/assets/game.wasm");
        assert_eq!(
            sibling_path(path, ".br"),
            PathBuf::from("/tmp/assets/game.wasm.br")
        );
        assert_eq!(
            sibling_path(path, ".gz"),
            PathBuf::from("/tmp/assets/game.wasm.gz")
        );
    }

    #[tokio::test]
    async fn test_brotli_preferred_over_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("game.wasm");
        std::fs::write(&asset, b"\0asm raw").unwrap();
        write_brotli(&sibling_path(&asset, ".br"), b"\0asm raw");
        write_gzip(&sibling_path(&asset, ".gz"), b"\0asm raw");

        let handler = test_handler();
        let response = handler
            .serve("/game.wasm", "gzip, deflate, br", &asset)
            .await
            .expect("fast path should fire");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-encoding").unwrap(), "br");
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/wasm"
        );
        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_gzip_when_brotli_not_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("game.wasm");
        std::fs::write(&asset, b"\0asm raw").unwrap();
        write_brotli(&sibling_path(&asset, ".br"), b"\0asm raw");
        write_gzip(&sibling_path(&asset, ".gz"), b"\0asm raw");

        let handler = test_handler();
        let response = handler
            .serve("/game.wasm", "gzip, deflate", &asset)
            .await
            .expect("fast path should fire");

        assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
    }

    #[tokio::test]
    async fn test_gzip_fallback_when_brotli_sibling_missing() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("game.wasm");
        std::fs::write(&asset, b"\0asm raw").unwrap();
        write_gzip(&sibling_path(&asset, ".gz"), b"\0asm raw");

        let handler = test_handler();
        let response = handler
            .serve("/game.wasm", "gzip, deflate, br", &asset)
            .await
            .expect("fast path should fire");

        assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
    }

    #[tokio::test]
    async fn test_no_siblings_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("game.wasm");
        std::fs::write(&asset, b"\0asm raw").unwrap();

        let handler = test_handler();
        let response = handler
            .serve("/game.wasm", "gzip, deflate, br", &asset)
            .await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_empty_accept_encoding_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("game.wasm");
        std::fs::write(&asset, b"\0asm raw").unwrap();
        write_brotli(&sibling_path(&asset, ".br"), b"\0asm raw");
        write_gzip(&sibling_path(&asset, ".gz"), b"\0asm raw");

        let handler = test_handler();
        let response = handler.serve("/game.wasm", "", &asset).await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_non_wasm_path_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("index.html");
        std::fs::write(&asset, b"<html></html>").unwrap();

        let handler = test_handler();
        let response = handler.serve("/index.html", "gzip, br", &asset).await;

        assert!(response.is_none());
    }
}
