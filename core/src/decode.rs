//! Response decoding: buffer the stream, dispatch on the declared content
//! type, classify the status.

use std::fmt;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Rejection};
use crate::http::HttpResponse;
use crate::status::is_error_status;

/// Response body after content-type dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Parsed `application/json` body.
    Json(Value),
    /// XML, HTML or script body, returned as received.
    Text(String),
}

impl DecodedBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedBody::Json(value) => Some(value),
            DecodedBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedBody::Json(_) => None,
            DecodedBody::Text(text) => Some(text),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            DecodedBody::Json(value) => Some(value),
            DecodedBody::Text(_) => None,
        }
    }
}

impl fmt::Display for DecodedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedBody::Json(value) => write!(f, "{value}"),
            DecodedBody::Text(text) => f.write_str(text),
        }
    }
}

/// Content types the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    XmlText,
    Html,
    Script,
}

impl ContentType {
    /// Exact match against the supported table.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/json" => Some(ContentType::Json),
            "application/xml" => Some(ContentType::Xml),
            "text/xml" => Some(ContentType::XmlText),
            "text/html" => Some(ContentType::Html),
            "script" => Some(ContentType::Script),
            _ => None,
        }
    }
}

/// The media type of a `content-type` header value, parameters dropped.
/// An empty media type counts as no declaration.
pub fn declared_content_type(header: Option<&str>) -> Option<String> {
    header
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .map(str::to_string)
}

/// Parse `text` according to `content_type`.
pub fn parse_body(content_type: Option<&str>, text: &str) -> Result<DecodedBody, ClientError> {
    match content_type.and_then(ContentType::from_mime) {
        Some(ContentType::Json) => serde_json::from_str(text)
            .map(DecodedBody::Json)
            .map_err(ClientError::Parse),
        Some(ContentType::Xml | ContentType::XmlText | ContentType::Html | ContentType::Script) => {
            Ok(DecodedBody::Text(text.to_string()))
        }
        None => Err(ClientError::UnsupportedContentType(
            content_type.map(str::to_string),
        )),
    }
}

/// Read every body frame, in arrival order, until the stream ends.
///
/// The buffered body is decoded as UTF-8; invalid sequences are replaced.
pub async fn accumulate(response: http::Response<Incoming>) -> Result<HttpResponse, ClientError> {
    let (parts, mut body) = response.into_parts();

    let mut buffer = Vec::new();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| {
            debug!(error = %e, received = buffer.len(), "response stream failed");
            ClientError::transport(e)
        })?;
        if let Ok(chunk) = frame.into_data() {
            buffer.extend_from_slice(&chunk);
        }
    }

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        headers,
        body: String::from_utf8_lossy(&buffer).into_owned(),
    })
}

/// Decode and classify a buffered response, reporting failures to the sink.
///
/// An error status rejects with the decoded body; the sink is handed the
/// same body wrapped in `ClientError::Status`.
pub fn settle(config: &ClientConfig, response: HttpResponse) -> Result<DecodedBody, Rejection> {
    let content_type = declared_content_type(response.header("content-type"));
    debug!(
        status = response.status,
        content_type = content_type.as_deref().unwrap_or("undefined"),
        bytes = response.body.len(),
        "decoding response"
    );

    let body = match parse_body(content_type.as_deref(), &response.body) {
        Ok(body) => body,
        Err(err) => {
            config.error_sink.report(&err);
            return Err(Rejection::Error(err));
        }
    };

    if is_error_status(response.status) {
        config.error_sink.report(&ClientError::Status {
            status: response.status,
            body: body.clone(),
        });
        return Err(Rejection::Status {
            status: response.status,
            body,
        });
    }

    Ok(body)
}
