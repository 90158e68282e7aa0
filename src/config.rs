use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;


#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen: Vec<String>,
    pub tcp_nodelay: bool,
    pub keep_alive: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub log_level: String,
    pub access_log: Option<String>,
    pub access_log_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Directory the server resolves request paths under.
    pub root: String,
    pub index_files: Vec<String>,
    /// Cache-Control value attached to every `.wasm` response.
    pub wasm_cache_control: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: vec!["127.0.0.1:8081".to_string()],
            tcp_nodelay: true,
            keep_alive: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            access_log: None,
            access_log_format: "combined".to_string(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            index_files: vec!["index.html".to_string()],
            wasm_cache_control: "public, max-age=31536000, immutable".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_with_root_port(root: &str, port: u16) -> Self {
        let mut config = Config::default();
        config.server.listen = vec![format!("127.0.0.1:{}", port)];
        config.assets.root = root.to_string();
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.listen.is_empty() {
            return Err(anyhow::anyhow!("At least one listen address is required"));
        }

        for listen_addr in &self.server.listen {
            listen_addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid listen address: {}", listen_addr))?;
        }

        if self.assets.root.is_empty() {
            return Err(anyhow::anyhow!("assets.root must not be empty"));
        }

        if self.assets.wasm_cache_control.is_empty() {
            return Err(anyhow::anyhow!("assets.wasm_cache_control must not be empty"));
        }

        match self.logging.access_log_format.as_str() {
            "combined" | "common" | "json" => {}
            other => {
                return Err(anyhow::anyhow!("Unknown access log format: {}", other));
            }
        }

        Ok(())
    }

    pub fn listen_addresses(&self) -> Result<Vec<SocketAddr>> {
        self.server
            .listen
            .iter()
            .map(|addr| {
                addr.parse()
                    .with_context(|| format!("Invalid listen address: {}", addr))
            })
            .collect()
    }
}
