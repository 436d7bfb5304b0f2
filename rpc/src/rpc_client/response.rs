//! Interpretation of proxy responses into a value or an error

use error_stack::Report;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use crate::constants::{ERROR_MESSAGE_FIELDS, RESPONSE_SNIPPET_LEN};
use crate::error::{Error, Result};

/// Turn a status and raw body into the call's outcome
///
/// 2xx bodies must parse as JSON and are returned unchanged. Anything else is a
/// `RemoteCallFailed` carrying the best message the body offers.
pub(super) fn interpret(function: &str, status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        let message = failure_message(status, body);
        warn!(
            "RPC call {function} failed - status={}, message={}",
            status.as_u16(),
            message
        );
        return Err(Report::new(Error::RemoteCallFailed {
            status: status.as_u16(),
            message,
        })
        .attach(format!("Function: {function}")));
    }

    serde_json::from_str(body).map_err(|e| {
        let snippet = snippet(body);
        warn!("RPC call {function}: response is not JSON - error={}", e);
        Report::new(Error::InvalidResponse(format!(
            "Server returned invalid JSON: {snippet}"
        )))
        .attach(format!("Function: {function}"))
        .attach(format!("Parse error: {e}"))
    })
}

/// Message for a non-2xx response
///
/// JSON bodies yield their `message` or `error` field. Non-JSON bodies yield the raw
/// text, whitespace included. The status phrase is the fallback for empty bodies and JSON
/// without either field.
pub(super) fn failure_message(status: StatusCode, body: &str) -> String {
    let status_phrase = || {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
    };

    match serde_json::from_str::<Value>(body) {
        Ok(json) => ERROR_MESSAGE_FIELDS
            .iter()
            .find_map(|field| json.get(field).and_then(render_message))
            .unwrap_or_else(status_phrase),
        Err(_) if body.is_empty() => status_phrase(),
        Err(_) => body.to_string(),
    }
}

fn render_message(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(RESPONSE_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_returns_value_unchanged() {
        let body = r#"{"get_farms":[{"id":"f1"}]}"#;
        let value = interpret("get_farms", StatusCode::OK, body).unwrap();
        assert_eq!(value, json!({"get_farms": [{"id": "f1"}]}));

        let value = interpret("count", StatusCode::CREATED, "42").unwrap();
        assert_eq!(value, json!(42));
    }

    #[test]
    fn test_message_field_verbatim() {
        let body = r#"{"message":"  Worker name is required ","error":"ignored"}"#;
        let err = interpret("create_worker_simple", StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(
            err.current_context(),
            &Error::RemoteCallFailed {
                status:  400,
                message: "  Worker name is required ".to_string(),
            }
        );
    }

    #[test]
    fn test_error_field_when_message_missing() {
        assert_eq!(
            failure_message(StatusCode::UNAUTHORIZED, r#"{"error":"JWT expired"}"#),
            "JWT expired"
        );
        assert_eq!(
            failure_message(StatusCode::BAD_REQUEST, r#"{"message":"","error":"bad farm"}"#),
            "bad farm"
        );
        assert_eq!(
            failure_message(StatusCode::BAD_REQUEST, r#"{"error":{"code":"23505"}}"#),
            r#"{"code":"23505"}"#
        );
    }

    #[test]
    fn test_non_json_body_is_raw_text() {
        let err =
            interpret("get_farms", StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
                .unwrap_err();
        assert_eq!(err.current_context().message(), "Service Unavailable");
        assert_eq!(err.current_context().status(), Some(503));

        assert_eq!(
            failure_message(StatusCode::BAD_GATEWAY, "<html>upstream down</html>"),
            "<html>upstream down</html>"
        );
    }

    #[test]
    fn test_whitespace_body_is_kept_verbatim() {
        assert_eq!(failure_message(StatusCode::BAD_GATEWAY, "  \n"), "  \n");
    }

    #[test]
    fn test_status_phrase_fallbacks() {
        assert_eq!(
            failure_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(failure_message(StatusCode::NOT_FOUND, "{}"), "Not Found");
        let unusual = StatusCode::from_u16(599).unwrap();
        assert_eq!(failure_message(unusual, ""), "HTTP 599");
    }

    #[test]
    fn test_invalid_json_snippet_is_truncated() {
        let body = format!("<!DOCTYPE html>{}", "x".repeat(400));
        let err = interpret("get_farms", StatusCode::OK, &body).unwrap_err();
        let Error::InvalidResponse(message) = err.current_context() else {
            panic!("expected InvalidResponse, got {:?}", err.current_context());
        };
        let expected: String = body.chars().take(200).collect();
        assert!(message.contains(&expected));
        assert!(!message.contains(&body.chars().take(201).collect::<String>()));
    }

    #[test]
    fn test_empty_success_body_is_invalid() {
        let err = interpret("delete_asset", StatusCode::OK, "").unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidResponse(_)));
    }
}
