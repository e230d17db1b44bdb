//! services/client/src/request/classify.rs
//!
//! Turns a raw transport response into either a success envelope or exactly one
//! `ClientError`. The checks run in a fixed order and stop at the first match:
//! content type, JSON syntax, transport status, envelope code.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use signal_client_core::ports::TransportResponse;

use crate::error::{ClientError, ClientResult};
use crate::request::lenient::lenient_string;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Longest body excerpt carried in a `NonJsonResponse` error.
pub const PREVIEW_CHARS: usize = 200;

/// The `{code, message, data}` wrapper present on every backend response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T = Value> {
    pub code: i64,
    /// Empty when the backend sent no message or `null`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Classifies `response`, returning the parsed envelope only if it denotes success.
pub fn classify(response: &TransportResponse) -> ClientResult<Envelope> {
    if !is_json(response) {
        return Err(ClientError::NonJsonResponse {
            status: response.status,
            preview: preview(&response.body),
        });
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| ClientError::MalformedJson(e.to_string()))?;

    if !response.is_success() {
        let message = message_of(&body)
            .unwrap_or_else(|| format!("request failed: {}", response.status));
        return Err(ClientError::HttpError {
            status: response.status,
            message,
        });
    }

    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| ClientError::MalformedJson(format!("response is not an envelope: {}", e)))?;

    if !envelope.is_success() {
        let message = if envelope.message.is_empty() {
            format!("request failed with code {}", envelope.code)
        } else {
            envelope.message
        };
        return Err(ClientError::ApplicationError {
            code: envelope.code,
            message,
        });
    }

    Ok(envelope)
}

fn is_json(response: &TransportResponse) -> bool {
    response
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE))
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn preview(body: &str) -> String {
    let mut excerpt: String = body.chars().take(PREVIEW_CHARS).collect();
    if body.chars().count() > PREVIEW_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            headers: content_type
                .map(|ct| vec![("Content-Type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_envelope_passes_through() {
        let envelope = classify(&response(
            200,
            Some("application/json; charset=utf-8"),
            r#"{"code":0,"message":"ok","data":{"n":1}}"#,
        ))
        .unwrap();
        assert_eq!(envelope.data["n"], 1);
    }

    #[test]
    fn html_is_non_json_even_with_error_status() {
        let html = format!("<html>{}</html>", "x".repeat(500));
        let err = classify(&response(502, Some("text/html"), &html)).unwrap_err();
        match err {
            ClientError::NonJsonResponse { status, preview } => {
                assert_eq!(status, 502);
                assert!(preview.starts_with("<html>"));
                assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_content_type_is_non_json() {
        let err = classify(&response(200, None, r#"{"code":0}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonJsonResponse);
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = classify(&response(200, Some(JSON_MEDIA_TYPE), "{\"code\":")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);

        // Syntax is checked before status.
        let err = classify(&response(500, Some(JSON_MEDIA_TYPE), "oops")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
    }

    #[test]
    fn error_status_surfaces_the_server_message() {
        let err = classify(&response(
            403,
            Some(JSON_MEDIA_TYPE),
            r#"{"code":403,"message":"token expired"}"#,
        ))
        .unwrap_err();
        match err {
            ClientError::HttpError { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "token expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_message_is_generic() {
        let err = classify(&response(500, Some(JSON_MEDIA_TYPE), "{}")).unwrap_err();
        assert_eq!(err.to_string(), "request failed: 500");
    }

    #[test]
    fn non_zero_code_is_an_application_error() {
        let err = classify(&response(
            200,
            Some(JSON_MEDIA_TYPE),
            r#"{"code":1001,"message":"symbol not supported","data":null}"#,
        ))
        .unwrap_err();
        match err {
            ClientError::ApplicationError { code, message } => {
                assert_eq!(code, 1001);
                assert_eq!(message, "symbol not supported");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = classify(&response(200, Some(JSON_MEDIA_TYPE), r#"{"code":7}"#)).unwrap_err();
        assert_eq!(err.to_string(), "request failed with code 7");
    }

    #[test]
    fn null_message_does_not_break_the_envelope() {
        let envelope = classify(&response(
            200,
            Some(JSON_MEDIA_TYPE),
            r#"{"code":0,"message":null,"data":{"a":1}}"#,
        ))
        .unwrap();
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.data["a"], 1);

        let err = classify(&response(
            200,
            Some(JSON_MEDIA_TYPE),
            r#"{"code":1001,"message":null}"#,
        ))
        .unwrap_err();
        assert!(matches!(
            &err,
            ClientError::ApplicationError { code: 1001, message }
                if message == "request failed with code 1001"
        ));
    }

    #[test]
    fn json_without_code_is_malformed() {
        let err = classify(&response(200, Some(JSON_MEDIA_TYPE), r#"{"data":[]}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
    }
}
