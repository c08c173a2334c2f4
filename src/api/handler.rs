//! API Lambda handler: decodes the event, answers the query, shapes the response.
//!
//! Request failures never surface as Lambda errors. They are turned into
//! JSON error envelopes with a 400 or 500 status so API Gateway can relay them.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{helpers, parsing, query::QueryHandler};
use crate::errors::QueryError;

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never returns `Err` for a bad request or an upstream failure; those become
/// error responses. The `Result` matches the `lambda_runtime` service contract.
#[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    query_handler: &QueryHandler,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    info!(
        method = parsing::http_method(&event.payload).unwrap_or("INVOKE"),
        "API Lambda received request"
    );
    Ok(process_event(query_handler, &event.payload).await)
}

/// Produces the proxy response for one event payload.
pub async fn process_event(query_handler: &QueryHandler, payload: &Value) -> Value {
    let event = match parsing::IncomingEvent::decode(payload) {
        Ok(event) => event,
        Err(e) => return client_error(&e, None),
    };

    let Some(body) = event.into_body() else {
        return helpers::preflight_response();
    };

    // Session id stays null until the body has been parsed.
    let raw = match parsing::parse_request(body) {
        Ok(raw) => raw,
        Err(e) => return client_error(&e, None),
    };
    let session_id = raw.session_id.clone();

    let request = match parsing::validate_request(raw) {
        Ok(request) => request,
        Err(e) => return client_error(&e, session_id),
    };

    match query_handler.answer(&request).await {
        Ok(response) => {
            info!(
                references = response.detailed_references.len(),
                session_id = ?response.session_id,
                "Query answered"
            );
            helpers::json_response(200, &response)
        }
        Err(e) => {
            error!("Failed to answer query: {}", e);
            helpers::err_response(&e, request.session_id)
        }
    }
}

fn client_error(e: &QueryError, session_id: Option<String>) -> Value {
    warn!("Rejected request: {}", e);
    helpers::err_response(e, session_id)
}
