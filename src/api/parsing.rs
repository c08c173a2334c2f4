//! Decoding of Lambda event payloads into query requests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use crate::core::models::{QueryRequest, RawQueryRequest};
use crate::errors::QueryError;

/// Shapes of event the API Lambda accepts, tried in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingEvent {
    /// CORS preflight from API Gateway (`OPTIONS`).
    Preflight,
    /// API Gateway proxy event; holds the decoded JSON body.
    Proxy(Value),
    /// Direct invocation with the request object as the payload.
    Direct(Value),
}

impl IncomingEvent {
    /// # Errors
    ///
    /// Returns `QueryError::ParseError` when the payload matches none of the
    /// recognized shapes or its body is not a JSON object.
    pub fn decode(payload: &Value) -> Result<Self, QueryError> {
        if http_method(payload).is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS")) {
            return Ok(Self::Preflight);
        }

        match payload {
            Value::Object(map) => {
                if let Some(body) = map.get("body") {
                    let is_base64 = map
                        .get("isBase64Encoded")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    return decode_body(body, is_base64).map(Self::Proxy);
                }
                if map.contains_key("httpMethod") || map.contains_key("requestContext") {
                    return Err(QueryError::ParseError("Missing body".to_string()));
                }
                Ok(Self::Direct(payload.clone()))
            }
            // Some clients invoke the function with the JSON body as a bare string.
            Value::String(_) => decode_body(payload, false).map(Self::Proxy),
            other => Err(QueryError::ParseError(format!(
                "Unrecognized event: expected a JSON object, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// The request object carried by the event, if any.
    #[must_use]
    pub fn into_body(self) -> Option<Value> {
        match self {
            Self::Preflight => None,
            Self::Proxy(body) | Self::Direct(body) => Some(body),
        }
    }
}

/// HTTP method of a REST (v1) or HTTP API (v2) proxy event.
#[must_use]
pub fn http_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["httpMethod"]).or_else(|| v_str(payload, &["requestContext", "http", "method"]))
}

/// # Errors
///
/// Returns `QueryError::ParseError` if the body is empty, not valid
/// (optionally base64-encoded) JSON, or not a JSON object.
pub fn decode_body(body: &Value, is_base64: bool) -> Result<Value, QueryError> {
    let decoded = match body {
        Value::String(raw) => {
            let text = if is_base64 {
                let bytes = BASE64.decode(raw.trim())?;
                String::from_utf8(bytes).map_err(|e| {
                    QueryError::ParseError(format!("Body is not valid UTF-8: {e}"))
                })?
            } else {
                raw.clone()
            };
            if text.trim().is_empty() {
                return Err(QueryError::ParseError("Empty body".to_string()));
            }
            serde_json::from_str::<Value>(&text)?
        }
        Value::Object(_) => body.clone(),
        Value::Null => return Err(QueryError::ParseError("Missing body".to_string())),
        other => {
            return Err(QueryError::ParseError(format!(
                "Invalid body format: {}",
                json_type_name(other)
            )));
        }
    };

    if !decoded.is_object() {
        return Err(QueryError::ParseError(format!(
            "Expected a JSON object body, got {}",
            json_type_name(&decoded)
        )));
    }
    Ok(decoded)
}

/// # Errors
///
/// Returns `QueryError::ParseError` if a field has the wrong type.
pub fn parse_request(body: Value) -> Result<RawQueryRequest, QueryError> {
    Ok(serde_json::from_value(body)?)
}

/// Checks required fields. A blank `user_query` counts as missing, and a
/// blank session id is treated as no session.
///
/// # Errors
///
/// Returns `QueryError::MissingField` when `user_query` is absent or blank.
pub fn validate_request(raw: RawQueryRequest) -> Result<QueryRequest, QueryError> {
    let user_query = raw
        .user_query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| QueryError::MissingField("user_query".to_string()))?;

    let session_id = raw
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(QueryRequest {
        user_query,
        session_id,
    })
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
