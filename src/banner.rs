use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// One wasm asset discovered in the root at startup, with the best
/// precompressed sibling found next to it (brotli reported in preference
/// to gzip, matching what the server will serve).
#[derive(Debug, PartialEq)]
pub struct WasmAsset {
    pub name: String,
    pub size: u64,
    pub compressed: Option<(&'static str, u64)>,
}

impl WasmAsset {
    pub fn compression_ratio(&self) -> Option<f64> {
        let (_, compressed_size) = self.compressed?;
        if self.size == 0 {
            return None;
        }
        Some((1.0 - compressed_size as f64 / self.size as f64) * 100.0)
    }
}

/// Scans the top level of the asset root for `*.wasm` files. Informational
/// only; serving never depends on this snapshot.
pub fn scan_assets(root: &Path) -> Vec<WasmAsset> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut assets = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("wasm") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let compressed = sibling_size(&path, ".br")
            .map(|size| ("brotli", size))
            .or_else(|| sibling_size(&path, ".gz").map(|size| ("gzip", size)));

        assets.push(WasmAsset {
            name,
            size: metadata.len(),
            compressed,
        });
    }

    assets.sort_by(|a, b| a.name.cmp(&b.name));
    assets
}

fn sibling_size(path: &Path, suffix: &str) -> Option<u64> {
    let mut os_string = path.as_os_str().to_os_string();
    os_string.push(suffix);
    let metadata = std::fs::metadata(os_string).ok()?;
    metadata.is_file().then(|| metadata.len())
}

pub fn print_banner(config: &Config, addresses: &[SocketAddr]) {
    println!("wasmserve development server");
    for addr in addresses {
        println!("Serving {} at http://{}", config.assets.root, addr);
    }

    let assets = scan_assets(Path::new(&config.assets.root));
    if assets.is_empty() {
        println!("No wasm assets detected under the root");
    }

    for asset in &assets {
        match (asset.compressed, asset.compression_ratio()) {
            (Some((codec, compressed_size)), Some(ratio)) => {
                println!(
                    "  {}: {:.1} KB ({}: {:.1} KB, {:.0}% smaller)",
                    asset.name,
                    asset.size as f64 / 1024.0,
                    codec,
                    compressed_size as f64 / 1024.0,
                    ratio
                );
            }
            _ => {
                println!(
                    "  {}: {:.1} KB (no precompressed sibling)",
                    asset.name,
                    asset.size as f64 / 1024.0
                );
            }
        }
    }

    println!("Cross-origin isolation headers enabled");
    println!("Press Ctrl+C to stop");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_assets(dir.path()).is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        assert!(scan_assets(Path::new("/nonexistent/assets")).is_empty());
    }

    #[test]
    fn test_scan_reports_sizes_and_brotli_preference() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("game.wasm"), vec![0u8; 2048]).unwrap();
        std::fs::write(dir.path().join("game.wasm.br"), vec![0u8; 512]).unwrap();
        std::fs::write(dir.path().join("game.wasm.gz"), vec![0u8; 1024]).unwrap();
        std::fs::write(dir.path().join("index.html"), b"<html></html>").unwrap();

        let assets = scan_assets(dir.path());
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "game.wasm");
        assert_eq!(assets[0].size, 2048);
        assert_eq!(assets[0].compressed, Some(("brotli", 512)));
        assert_eq!(assets[0].compression_ratio(), Some(75.0));
    }

    #[test]
    fn test_scan_gzip_only_sibling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.wasm"), vec![0u8; 1000]).unwrap();
        std::fs::write(dir.path().join("app.wasm.gz"), vec![0u8; 400]).unwrap();

        let assets = scan_assets(dir.path());
        assert_eq!(assets[0].compressed, Some(("gzip", 400)));
    }

    #[test]
    fn test_scan_no_sibling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.wasm"), vec![0u8; 1000]).unwrap();

        let assets = scan_assets(dir.path());
        assert_eq!(assets[0].compressed, None);
        assert_eq!(assets[0].compression_ratio(), None);
    }
}
