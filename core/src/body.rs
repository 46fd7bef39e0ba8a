//! Outgoing payloads and their wire form.

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

/// Payload of a POST/PUT/DELETE call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, sent as JSON text.
    Json(Value),
    /// Sent as-is.
    Text(String),
}

impl RequestBody {
    /// Serialize any `Serialize` value into a structured body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

/// Objects and arrays stay structured; scalars travel in their textual form.
impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RequestBody::Text(text),
            Value::Number(n) => RequestBody::Text(n.to_string()),
            Value::Bool(b) => RequestBody::Text(b.to_string()),
            other => RequestBody::Json(other),
        }
    }
}

/// Wire form of `body`: `None` when there is nothing to send.
///
/// Only an empty string and JSON `null` count as nothing. Other falsy
/// scalars such as `0` and `false` are still sent, as `"0"` and `"false"`.
pub fn encode(body: Option<&RequestBody>) -> Result<Option<String>, ClientError> {
    match body {
        None | Some(RequestBody::Json(Value::Null)) => Ok(None),
        Some(RequestBody::Text(text)) if text.is_empty() => Ok(None),
        Some(RequestBody::Text(text)) => Ok(Some(text.clone())),
        Some(RequestBody::Json(value)) => serde_json::to_string(value)
            .map(Some)
            .map_err(|e| ClientError::Serialization(e.to_string())),
    }
}

/// Value of the `content-length` header for a wire body: its UTF-8 byte length.
pub fn content_length(wire: &str) -> usize {
    wire.len()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_body_has_no_wire_form() {
        assert_eq!(encode(None).unwrap(), None);
    }

    #[test]
    fn empty_and_null_bodies_have_no_wire_form() {
        assert_eq!(encode(Some(&RequestBody::from(""))).unwrap(), None);
        assert_eq!(encode(Some(&RequestBody::Json(Value::Null))).unwrap(), None);
        assert_eq!(encode(Some(&RequestBody::from(Value::Null))).unwrap(), None);
    }

    #[test]
    fn text_is_sent_unchanged() {
        let body = RequestBody::from("hello world");
        assert_eq!(encode(Some(&body)).unwrap().as_deref(), Some("hello world"));
    }

    #[test]
    fn structured_value_is_json_encoded() {
        let body = RequestBody::from(json!({"hello": "world"}));
        assert_eq!(
            encode(Some(&body)).unwrap().as_deref(),
            Some(r#"{"hello":"world"}"#)
        );
    }

    #[test]
    fn number_is_sent_as_text() {
        let body = RequestBody::from(json!(123));
        assert_eq!(body, RequestBody::Text("123".to_string()));
        assert_eq!(encode(Some(&body)).unwrap().as_deref(), Some("123"));
    }

    #[test]
    fn zero_and_false_are_still_sent() {
        let zero = RequestBody::from(json!(0));
        let no = RequestBody::from(json!(false));
        assert_eq!(encode(Some(&zero)).unwrap().as_deref(), Some("0"));
        assert_eq!(encode(Some(&no)).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn serializable_struct_becomes_structured_body() {
        #[derive(Serialize)]
        struct Greeting<'a> {
            hello: &'a str,
        }
        let body = RequestBody::json(&Greeting { hello: "world" }).unwrap();
        assert_eq!(body, RequestBody::Json(json!({"hello": "world"})));
    }

    #[test]
    fn content_length_counts_bytes_not_chars() {
        assert_eq!(content_length("hello"), 5);
        assert_eq!(content_length("héllo"), 6);
        assert_eq!(content_length(r#"{"emoji":"🦀"}"#), 16);
    }

    #[test]
    fn structured_values_survive_encoding() {
        let value = json!({"nested": {"list": [1, 2.5, "three", null, true]}, "empty": {}});
        let wire = encode(Some(&RequestBody::Json(value.clone()))).unwrap().unwrap();
        let back: Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, value);
    }
}
