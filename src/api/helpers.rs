//! API Gateway proxy response builders.
//!
//! Every response carries the same CORS headers so browser clients on any
//! origin can call the endpoint.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::core::models::ErrorResponse;
use crate::errors::QueryError;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "OPTIONS,POST";
pub const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

#[must_use]
pub fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": CORS_ALLOW_ORIGIN,
        "Access-Control-Allow-Methods": CORS_ALLOW_METHODS,
        "Access-Control-Allow-Headers": CORS_ALLOW_HEADERS,
    })
}

/// Returns a response with `body` serialized as a JSON string.
#[must_use]
pub fn json_response<T: Serialize>(status_code: u16, body: &T) -> Value {
    match serde_json::to_string(body) {
        Ok(body) => json!({
            "statusCode": status_code,
            "headers": cors_headers(),
            "body": body,
        }),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            json!({
                "statusCode": 500,
                "headers": cors_headers(),
                "body": json!({ "error": "Failed to serialize response" }).to_string(),
            })
        }
    }
}

/// Returns the error envelope for `error` with its mapped status code.
#[must_use]
pub fn err_response(error: &QueryError, session_id: Option<String>) -> Value {
    json_response(
        error.status_code(),
        &ErrorResponse::new(error.to_string(), session_id),
    )
}

/// Returns a 200 OK answer to a CORS preflight.
#[must_use]
pub fn preflight_response() -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": "",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::FALLBACK_RESPONSE;

    #[test]
    fn error_envelope_has_fallback_text_and_no_references() {
        let resp = err_response(&QueryError::MissingField("user_query".to_string()), None);
        assert_eq!(resp["statusCode"], 400);
        assert_eq!(resp["headers"]["Access-Control-Allow-Origin"], "*");

        let body: Value = serde_json::from_str(resp["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["error"], "Missing required field: user_query");
        assert_eq!(body["generated_response"], FALLBACK_RESPONSE);
        assert_eq!(body["detailed_references"], json!([]));
        assert!(body["sessionId"].is_null());
    }

    #[test]
    fn preflight_allows_post_and_options() {
        let resp = preflight_response();
        assert_eq!(resp["statusCode"], 200);
        assert_eq!(resp["headers"]["Access-Control-Allow-Methods"], "OPTIONS,POST");
        assert_eq!(resp["body"], "");
    }
}
