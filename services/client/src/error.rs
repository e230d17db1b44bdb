//! services/client/src/error.rs
//!
//! Defines the error vocabulary every client call reports.

use crate::config::ConfigError;
use signal_client_core::ports::PortError;
use signal_client_core::validation::ValidationError;

/// The stable category of a [`ClientError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredentials,
    NonJsonResponse,
    MalformedJson,
    HttpError,
    ApplicationError,
    ValidationError,
    SessionInvalidated,
    Transport,
    Storage,
    Config,
}

/// The primary error type for the client service.
///
/// Every variant's `Display` output is short enough to show to a user as is.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An authenticated call was attempted without a usable session token.
    #[error("not signed in: no authentication token available")]
    MissingCredentials,

    /// The server answered with something other than JSON.
    #[error("server returned a non-JSON response (status {status}): {preview}")]
    NonJsonResponse { status: u16, preview: String },

    /// The server claimed JSON but the body did not parse, or did not match the expected shape.
    #[error("could not parse the server response: {0}")]
    MalformedJson(String),

    /// The transport status was outside the success range.
    #[error("{message}")]
    HttpError { status: u16, message: String },

    /// The envelope carried a non-zero code.
    #[error("{message}")]
    ApplicationError { code: i64, message: String },

    /// A pre-flight check rejected the input before any network call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The stored session no longer authenticates; the user must sign in again.
    #[error("session is no longer valid, please sign in again ({0})")]
    SessionInvalidated(Box<ClientError>),

    /// No response was received at all.
    #[error("request could not be completed: {0}")]
    Transport(PortError),

    /// The session record could not be persisted.
    #[error("could not persist the session: {0}")]
    Storage(PortError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::MissingCredentials => ErrorKind::MissingCredentials,
            ClientError::NonJsonResponse { .. } => ErrorKind::NonJsonResponse,
            ClientError::MalformedJson(_) => ErrorKind::MalformedJson,
            ClientError::HttpError { .. } => ErrorKind::HttpError,
            ClientError::ApplicationError { .. } => ErrorKind::ApplicationError,
            ClientError::Validation(_) => ErrorKind::ValidationError,
            ClientError::SessionInvalidated(_) => ErrorKind::SessionInvalidated,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Storage(_) => ErrorKind::Storage,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns `true` if the caller should send the user back to the sign-in flow.
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            ClientError::MissingCredentials | ClientError::SessionInvalidated(_)
        ) || matches!(self, ClientError::HttpError { status: 401, .. })
    }
}

/// A convenience type alias for `Result<T, ClientError>`.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_messages_display_verbatim() {
        let err = ClientError::ApplicationError {
            code: 1001,
            message: "symbol already exists".to_string(),
        };
        assert_eq!(err.to_string(), "symbol already exists");
        assert_eq!(err.kind(), ErrorKind::ApplicationError);
    }

    #[test]
    fn sign_in_is_required_for_auth_failures_only() {
        assert!(ClientError::MissingCredentials.requires_sign_in());
        assert!(ClientError::HttpError {
            status: 401,
            message: "token expired".to_string()
        }
        .requires_sign_in());
        assert!(
            ClientError::SessionInvalidated(Box::new(ClientError::MissingCredentials))
                .requires_sign_in()
        );
        assert!(!ClientError::MalformedJson("eof".to_string()).requires_sign_in());
        assert!(!ClientError::from(ValidationError::WeakPassword).requires_sign_in());
    }
}
