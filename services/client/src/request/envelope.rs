//! services/client/src/request/envelope.rs
//!
//! The shared request path every resource call goes through: URL building,
//! header merging, bearer-token injection, dispatch and envelope unwrapping.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use signal_client_core::ports::{HttpMethod, HttpTransport, TransportRequest};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::request::classify::{classify, Envelope, JSON_MEDIA_TYPE};
use crate::session::SessionStore;

//=========================================================================================
// Request Options
//=========================================================================================

/// Per-call options: method, extra headers, query parameters and JSON body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

//=========================================================================================
// ApiClient
//=========================================================================================

/// The authenticated request layer shared by every resource call.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
}

impl ApiClient {
    /// `base_url` is the backend origin; a trailing slash is ignored.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        session: SessionStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one call and returns the envelope's `data` decoded as `T`.
    ///
    /// With `requires_auth`, a missing token fails with `MissingCredentials`
    /// before anything is sent. No retry is attempted.
    pub async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        requires_auth: bool,
    ) -> ClientResult<T> {
        let envelope = self.send_envelope(endpoint, options, requires_auth).await?;
        decode_data(envelope.data)
    }

    /// Like [`ApiClient::send`] but hands back the whole success envelope.
    pub async fn send_envelope(
        &self,
        endpoint: &str,
        options: RequestOptions,
        requires_auth: bool,
    ) -> ClientResult<Envelope> {
        let token = if requires_auth {
            Some(self.session.token().ok_or(ClientError::MissingCredentials)?)
        } else {
            None
        };
        let request = self.build_request(endpoint, options, token.as_deref());
        self.dispatch(request).await
    }

    /// Resolves `options` into a transport request for `endpoint`.
    pub(crate) fn build_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> TransportRequest {
        let mut headers = merge_headers(
            vec![("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string())],
            options.headers,
        );
        if let Some(token) = token {
            set_header(&mut headers, "Authorization", format!("Bearer {}", token));
        }

        TransportRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, endpoint),
            query: options.query,
            headers,
            body: options.body.map(|body| body.to_string()),
            include_credentials: true,
            cross_origin: true,
        }
    }

    /// Sends a prepared request and classifies whatever comes back.
    pub(crate) async fn dispatch(&self, request: TransportRequest) -> ClientResult<Envelope> {
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            has_body = request.body.is_some(),
            "sending request"
        );

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;

        classify(&response)
    }
}

/// Decodes an envelope's `data` into the caller's expected shape.
pub(crate) fn decode_data<T: DeserializeOwned>(data: Value) -> ClientResult<T> {
    serde_json::from_value(data)
        .map_err(|e| ClientError::MalformedJson(format!("unexpected response data: {}", e)))
}

/// Overlays `overrides` on `defaults`; header names compare case-insensitively.
fn merge_headers(
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged = defaults;
    for (name, value) in overrides {
        set_header(&mut merged, &name, value);
    }
    merged
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(slot) => slot.1 = value,
        None => headers.push((name.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_headers_win_over_defaults() {
        let merged = merge_headers(
            vec![("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string())],
            vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ],
        );
        assert_eq!(
            merged,
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn decode_reports_shape_mismatch_as_malformed() {
        let err = decode_data::<Vec<String>>(serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, ClientError::MalformedJson(_)));
    }
}
