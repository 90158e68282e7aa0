pub mod banner;
pub mod config;
pub mod isolation;
pub mod logging;
pub mod manifest;
pub mod server;

// Re-export commonly used types for easier testing
pub use config::Config;
pub use server::http_server::HttpServer;
pub use server::request_handler::RequestHandler;
