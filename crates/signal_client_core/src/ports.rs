//! crates/signal_client_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client core depends on.
//! These traits form the boundary of the hexagonal architecture: the request
//! layer never touches a concrete HTTP library or storage medium directly.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// Adapters flatten disk and network failures into it; HTTP statuses are not
/// errors at this level and travel in `TransportResponse`.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Session Persistence
//=========================================================================================

/// A synchronous key/value medium for the persisted session record.
///
/// Implementations hold raw strings; parsing and validation are the caller's job.
pub trait SessionStorage: Send + Sync {
    /// Returns the stored value, or `None` if nothing is stored under `key`.
    fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// HTTP Transport
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A fully-resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Send cookies and other ambient credentials along with the request.
    pub include_credentials: bool,
    /// The backend lives on a different origin than the caller.
    pub cross_origin: bool,
}

impl TransportRequest {
    /// Looks up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The raw response as the transport saw it, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl TransportResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs one round trip. An `Err` means no response was received at all;
    /// any status code the server returns is reported as `Ok`.
    async fn execute(&self, request: TransportRequest) -> PortResult<TransportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = TransportResponse {
            status: 204,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("authorization"), None);
        assert!(response.is_success());
    }

    #[test]
    fn non_2xx_is_not_success() {
        for status in [199, 301, 404, 500] {
            let response = TransportResponse {
                status,
                headers: Vec::new(),
                body: String::new(),
            };
            assert!(!response.is_success(), "status {status}");
        }
    }
}
