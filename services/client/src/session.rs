//! services/client/src/session.rs
//!
//! The session store: the single source of truth for "is the user signed in".
//!
//! The record is persisted through the `SessionStorage` port under a fixed key,
//! as JSON of the form `{user_id, email?, token, expires_at}`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signal_client_core::domain::Session;
use signal_client_core::ports::{PortError, PortResult, SessionStorage};
use tracing::{debug, warn};

/// The storage key the session record lives under.
pub const SESSION_STORAGE_KEY: &str = "userInfo";

//=========================================================================================
// Persisted Record
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    token: String,
    #[serde(default)]
    expires_at: i64,
}

impl StoredSession {
    fn from_domain(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            token: session.token.clone(),
            expires_at: session.expires_at.unwrap_or(0),
        }
    }

    fn to_domain(self) -> Session {
        Session {
            user_id: self.user_id,
            email: self.email,
            token: self.token,
            expires_at: (self.expires_at != 0).then_some(self.expires_at),
        }
    }
}

//=========================================================================================
// SessionStore
//=========================================================================================

/// Owns the persisted session record and its validation.
///
/// Access is synchronous; the store performs no network calls.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Persists `session`, overwriting any previous record.
    pub fn save(&self, session: &Session) -> PortResult<()> {
        let serialized = serde_json::to_string(&StoredSession::from_domain(session))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.storage.write(SESSION_STORAGE_KEY, &serialized)?;
        debug!(user_id = %session.user_id, "session saved");
        Ok(())
    }

    /// Returns the last persisted session.
    ///
    /// Storage failures and structurally invalid records both read as `None`.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.storage.read(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read persisted session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => Some(stored.to_domain()),
            Err(e) => {
                warn!("ignoring unreadable persisted session: {}", e);
                None
            }
        }
    }

    /// Returns `true` if a usable session exists. An expired record is deleted.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.current_at(now).is_some()
    }

    /// Returns the session if it is still usable at `now`, clearing it once expired.
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.load()?;
        if session.is_expired_at(now) {
            debug!(user_id = %session.user_id, "persisted session expired, clearing");
            self.clear();
            return None;
        }
        session.is_valid_at(now).then_some(session)
    }

    /// The bearer token of the current, unexpired session.
    pub fn token(&self) -> Option<String> {
        self.current_at(Utc::now()).map(|session| session.token)
    }

    /// Deletes the persisted session. Never fails; storage errors are only logged.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY) {
            warn!("failed to clear persisted session: {}", e);
        }
    }
}
