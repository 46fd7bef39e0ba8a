//! Fixture server for exercising the verb client over real HTTP.
//!
//! Every route answers any method. Responses cover each branch of the
//! client's decoder: supported and unsupported content types, error
//! statuses, malformed JSON and a connection torn down mid-response.

use std::io;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Body returned by `/method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEcho {
    pub method: String,
}

/// Body returned by `/echo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEcho {
    pub method: String,
    pub content_length: Option<String>,
    pub body: String,
}

pub const MALFORMED_JSON: &str = r#"{"hello:world",123[]}"#;

pub fn app() -> Router {
    Router::new()
        .route("/method", any(method))
        .route("/error", any(error))
        .route("/errorjson", any(error_json))
        .route("/exception", any(exception))
        .route("/xml", any(xml))
        .route("/html", any(html))
        .route("/script", any(script))
        .route("/plain", any(plain))
        .route("/untyped", any(untyped))
        .route("/server-error", any(server_error))
        .route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn method(method: Method) -> Response {
    (
        [(CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(MethodEcho {
            method: method.to_string(),
        }),
    )
        .into_response()
}

async fn error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "hello": "world" })),
    )
        .into_response()
}

async fn error_json() -> Response {
    ([(CONTENT_TYPE, "application/json")], MALFORMED_JSON).into_response()
}

/// Sends the response head and a first chunk, then fails the body stream so
/// the connection is dropped before the response completes.
async fn exception() -> Response {
    let chunks = futures_util::stream::iter([
        Ok(Bytes::from_static(b"{\"hello\":")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection destroyed",
        )),
    ]);
    debug!("tearing down /exception response");
    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, "application/json")],
        Body::from_stream(chunks),
    )
        .into_response()
}

async fn xml() -> Response {
    ([(CONTENT_TYPE, "application/xml")], "<xml></xml>").into_response()
}

async fn html() -> Response {
    ([(CONTENT_TYPE, "text/html")], "<h1>hello world</h1>").into_response()
}

async fn script() -> Response {
    ([(CONTENT_TYPE, "script")], "myscript").into_response()
}

async fn plain() -> Response {
    ([(CONTENT_TYPE, "text/plain")], "plain text").into_response()
}

async fn untyped() -> Response {
    let mut response = Body::from("no content type").into_response();
    response.headers_mut().remove(CONTENT_TYPE);
    response
}

async fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, "text/html")],
        "<h1>internal error</h1>",
    )
        .into_response()
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<RequestEcho> {
    let content_length = headers
        .get("content-length")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(RequestEcho {
        method: method.to_string(),
        content_length,
        body,
    })
}
