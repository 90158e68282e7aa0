#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::isolation::IsolationHandler;
    use bytes::Bytes;
    use http_body_util::Full;
    use hyper::{Response, StatusCode};
    use std::sync::Arc;

    fn test_response(status: StatusCode) -> Response<Full<Bytes>> {
        Response::builder()
            .status(status)
            .body(Full::new(Bytes::from("test")))
            .unwrap()
    }

    #[test]
    fn test_isolation_headers_on_plain_response() {
        let handler = IsolationHandler::new(Arc::new(Config::default()));

        let response = handler.decorate(test_response(StatusCode::OK), "/index.html");

        assert_eq!(
            response
                .headers()
                .get("cross-origin-opener-policy")
                .unwrap(),
            "same-origin"
        );
        assert_eq!(
            response
                .headers()
                .get("cross-origin-embedder-policy")
                .unwrap(),
            "require-corp"
        );
        // Non-wasm paths get no cache policy
        assert!(!response.headers().contains_key("cache-control"));
    }

    #[test]
    fn test_isolation_headers_on_error_response() {
        let handler = IsolationHandler::new(Arc::new(Config::default()));

        let response = handler.decorate(test_response(StatusCode::NOT_FOUND), "/missing.css");

        assert!(response.headers().contains_key("cross-origin-opener-policy"));
        assert!(response
            .headers()
            .contains_key("cross-origin-embedder-policy"));
    }

    #[test]
    fn test_wasm_path_gets_immutable_cache_control() {
        let handler = IsolationHandler::new(Arc::new(Config::default()));

        let response = handler.decorate(test_response(StatusCode::OK), "/game.wasm");

        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[test]
    fn test_custom_cache_control_value() {
        let mut config = Config::default();
        config.assets.wasm_cache_control = "public, max-age=60".to_string();
        let handler = IsolationHandler::new(Arc::new(config));

        let response = handler.decorate(test_response(StatusCode::OK), "/game.wasm");

        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "public, max-age=60"
        );
    }

    #[test]
    fn test_server_header_added() {
        let handler = IsolationHandler::new(Arc::new(Config::default()));

        let response = handler.decorate(test_response(StatusCode::OK), "/");

        assert!(response.headers().contains_key("server"));
    }
}
