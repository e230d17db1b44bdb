mod common;

use common::{harness, signed_in_harness, BASE_URL};
use client_lib::{ClientError, ErrorKind, RequestOptions};
use serde_json::{json, Value};
use signal_client_core::domain::Session;
use signal_client_core::ports::{HttpMethod, TransportResponse};

#[tokio::test]
async fn authenticated_call_carries_bearer_token_and_defaults() {
    let h = signed_in_harness();
    h.transport.push_envelope(0, "ok", json!({"answer": 42}));

    let data: Value = h
        .client
        .send("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap();
    assert_eq!(data["answer"], 42);

    let request = h.transport.last_request();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, format!("{BASE_URL}/api/anything"));
    assert_eq!(request.header("authorization"), Some("Bearer tok-abc"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request.include_credentials);
    assert!(request.cross_origin);
}

#[tokio::test]
async fn caller_content_type_overrides_default() {
    let h = signed_in_harness();
    h.transport.push_envelope(0, "", Value::Null);

    h.client
        .send::<Value>(
            "/api/anything",
            RequestOptions::post().header("Content-Type", "application/merge-patch+json"),
            true,
        )
        .await
        .unwrap();

    let request = h.transport.last_request();
    assert_eq!(
        request.header("content-type"),
        Some("application/merge-patch+json")
    );
    let content_types = request
        .headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .count();
    assert_eq!(content_types, 1);
}

#[tokio::test]
async fn missing_token_fails_before_the_network() {
    let h = harness();

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingCredentials);
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn expired_session_is_dropped_before_the_network() {
    let h = harness();
    h.session
        .save(&Session {
            user_id: "42".to_string(),
            email: Some("trader@example.com".to_string()),
            token: "stale-token".to_string(),
            expires_at: Some(1_600_000_000),
        })
        .unwrap();
    assert!(h.session.load().is_some());

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingCredentials);
    assert!(h.transport.requests().is_empty());
    assert!(h.session.load().is_none());
}

#[tokio::test]
async fn unauthenticated_call_sends_no_authorization_header() {
    let h = signed_in_harness();
    h.transport.push_envelope(0, "", Value::Null);

    h.client
        .send::<Value>("/api/public", RequestOptions::get(), false)
        .await
        .unwrap();

    assert_eq!(h.transport.last_request().header("authorization"), None);
}

#[tokio::test]
async fn zero_code_is_required_for_success() {
    let h = signed_in_harness();
    h.transport.push_envelope(3, "quota exceeded", json!({"answer": 42}));

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    match err {
        ClientError::ApplicationError { code, message } => {
            assert_eq!(code, 3);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn null_message_with_zero_code_still_succeeds() {
    let h = signed_in_harness();
    h.transport.push_json(200, json!({"code": 0, "message": null, "data": {"a": 1}}));

    let data: Value = h
        .client
        .send("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap();
    assert_eq!(data["a"], 1);
}

#[tokio::test]
async fn null_message_with_failing_code_uses_generic_text() {
    let h = signed_in_harness();
    h.transport.push_json(200, json!({"code": 1001, "message": null}));

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    match err {
        ClientError::ApplicationError { code, message } => {
            assert_eq!(code, 1001);
            assert_eq!(message, "request failed with code 1001");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_error_prefers_the_server_message() {
    let h = signed_in_harness();
    h.transport
        .push_json(401, json!({"code": 401, "message": "invalid token"}));

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        ClientError::HttpError { status: 401, message } if message == "invalid token"
    ));
    assert!(err.requires_sign_in());
}

#[tokio::test]
async fn html_error_page_is_classified_as_non_json() {
    let h = signed_in_harness();
    h.transport.push(Ok(TransportResponse {
        status: 502,
        headers: vec![("Content-Type".to_string(), "text/html".to_string())],
        body: "<html><body>Bad Gateway</body></html>".to_string(),
    }));

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    match err {
        ClientError::NonJsonResponse { status, preview } => {
            assert_eq!(status, 502);
            assert!(preview.contains("Bad Gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_reported_as_transport() {
    let h = signed_in_harness();
    h.transport.push_failure();

    let err = h
        .client
        .send::<Value>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn data_of_the_wrong_shape_is_malformed() {
    let h = signed_in_harness();
    h.transport.push_envelope(0, "", json!({"not": "a list"}));

    let err = h
        .client
        .send::<Vec<String>>("/api/anything", RequestOptions::get(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedJson);
}
