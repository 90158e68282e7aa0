pub mod http_server;
pub mod request_handler;
pub mod response;
pub mod static_files;
pub mod wasm;

pub use http_server::HttpServer;
pub use request_handler::RequestHandler;
pub use response::{ErrorResponse, ResponseBuilder};
pub use static_files::StaticFileHandler;
pub use wasm::WasmAssetHandler;
