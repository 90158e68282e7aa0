use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::collections::HashMap;

pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn header_string(mut self, name: &str, value: String) -> Self {
        self.headers.insert(name.to_string(), value);
        self
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Response<Full<Bytes>> {
        let mut response = Response::builder().status(self.status);

        for (name, value) in self.headers {
            response = response.header(&name, value);
        }

        response
            .body(Full::new(self.body))
            .expect("Failed to build response")
    }
}

pub struct ErrorResponse;

impl ErrorResponse {
    pub fn forbidden() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::FORBIDDEN)
            .header("content-type", "text/html")
            .body(Bytes::from_static(
                b"<!DOCTYPE html><html><head><title>403 Forbidden</title></head>\
                  <body><h1>403 Forbidden</h1></body></html>",
            ))
    }

    pub fn not_found() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::NOT_FOUND)
            .header("content-type", "text/html")
            .body(Bytes::from_static(
                b"<!DOCTYPE html><html><head><title>404 Not Found</title></head>\
                  <body><h1>404 Not Found</h1></body></html>",
            ))
    }

    pub fn method_not_allowed() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::METHOD_NOT_ALLOWED)
            .header("content-type", "text/html")
            .header("allow", "GET, HEAD")
            .body(Bytes::from_static(
                b"<!DOCTYPE html><html><head><title>405 Method Not Allowed</title></head>\
                  <body><h1>405 Method Not Allowed</h1></body></html>",
            ))
    }

    pub fn internal_server_error() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
            .header("content-type", "text/html")
            .body(Bytes::from_static(
                b"<!DOCTYPE html><html><head><title>500 Internal Server Error</title></head>\
                  <body><h1>500 Internal Server Error</h1></body></html>",
            ))
    }
}
