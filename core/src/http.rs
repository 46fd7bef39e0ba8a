//! Plain-data HTTP request and response types.
//!
//! # Design
//! A call is first described as an `HttpRequest` value: method, path, the
//! per-call header map and the serialized body. Building it touches no
//! network, so header handling and body encoding are tested directly. Only
//! the dispatcher turns it into a hyper request. The accumulated response is
//! likewise reduced to an `HttpResponse` before decoding.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use http_body_util::Full;

use crate::body::{self, RequestBody};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// One outgoing request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Copy of the configured headers plus the computed ones.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Convert into the hyper request written to the connection.
    pub fn into_hyper(self) -> Result<http::Request<Full<Bytes>>, ClientError> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.path.as_str());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let body = self.body.map(Bytes::from).unwrap_or_default();
        builder
            .body(Full::new(body))
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))
    }
}

/// A fully accumulated response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names lower-cased, in the order received.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of the header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Value of the `host` header for `config`.
fn host_header(config: &ClientConfig) -> String {
    match config.port {
        Some(port) => format!("{}:{port}", config.base_url),
        None => config.base_url.clone(),
    }
}

/// Describe one call against `config`.
///
/// The configured header map is copied, never modified: computed headers
/// (`host`, `content-length`) land in the copy only.
pub fn build_request(
    config: &ClientConfig,
    method: HttpMethod,
    path: &str,
    body: Option<&RequestBody>,
) -> Result<HttpRequest, ClientError> {
    let wire = body::encode(body)?;

    let mut headers = config.headers.clone();
    headers
        .entry("host".to_string())
        .or_insert_with(|| host_header(config));
    if let Some(wire) = &wire {
        headers.insert(
            "content-length".to_string(),
            body::content_length(wire).to_string(),
        );
    }

    Ok(HttpRequest {
        method,
        path: path.to_string(),
        headers,
        body: wire,
    })
}
