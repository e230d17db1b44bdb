//! services/client/src/resources/auth.rs
//!
//! Account calls: login, registration, verification codes, user details, logout.

use serde_json::{json, Value};
use signal_client_core::domain::{LoginGrant, Session, UserDetails};
use signal_client_core::validation::{self, ValidationError};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::request::{ApiClient, RequestOptions};
use crate::resources::wire::{LoginPayload, UserInfoPayload};

pub const LOGIN_ENDPOINT: &str = "/api/user/login";
pub const REGISTER_ENDPOINT: &str = "/api/user/register";
pub const VERIFICATION_CODE_ENDPOINT: &str = "/api/user/verification_code";
pub const USER_INFO_ENDPOINT: &str = "/api/user/info";
pub const LOGOUT_ENDPOINT: &str = "/api/user/logout";

impl ApiClient {
    /// Signs in and persists the resulting session.
    ///
    /// The server does not echo the email back, so the one supplied here is stored.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginGrant> {
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::Required("email and password").into());
        }

        let payload: LoginPayload = self
            .send(
                LOGIN_ENDPOINT,
                RequestOptions::post().body(json!({ "email": email, "password": password })),
                false,
            )
            .await?;
        let grant = payload.to_domain();

        let session = Session {
            user_id: grant.user_id.clone(),
            email: Some(email.to_string()),
            token: grant.token.clone(),
            expires_at: grant.expires_at,
        };
        self.session()
            .save(&session)
            .map_err(ClientError::Storage)?;
        info!(user_id = %grant.user_id, "signed in");

        Ok(grant)
    }

    /// Creates an account. `invite_code` may be empty.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        verification_code: &str,
        invite_code: &str,
    ) -> ClientResult<()> {
        validation::validate_registration(email, password, verification_code)?;

        self.send::<Value>(
            REGISTER_ENDPOINT,
            RequestOptions::post().body(json!({
                "email": email,
                "password": password,
                "code": verification_code,
                "invite_code": invite_code,
            })),
            false,
        )
        .await?;
        Ok(())
    }

    /// Asks the backend to email a verification code to `email`.
    pub async fn request_verification_code(&self, email: &str) -> ClientResult<()> {
        validation::require("email", email)?;

        self.send::<Value>(
            VERIFICATION_CODE_ENDPOINT,
            RequestOptions::post().body(json!({ "email": email })),
            false,
        )
        .await?;
        Ok(())
    }

    /// Fetches the signed-in user's details.
    ///
    /// Any failure here means the stored session no longer works: it is
    /// cleared and the error comes back wrapped in `SessionInvalidated`.
    pub async fn fetch_current_user(&self) -> ClientResult<UserDetails> {
        let result = async {
            let payload: UserInfoPayload = self
                .send(USER_INFO_ENDPOINT, RequestOptions::get(), true)
                .await?;
            payload.to_domain()
        }
        .await;

        result.map_err(|e| {
            warn!("user details unavailable, clearing session: {}", e);
            self.session().clear();
            ClientError::SessionInvalidated(Box::new(e))
        })
    }

    /// Signs out. The local session is cleared whatever the backend says.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .send::<Value>(LOGOUT_ENDPOINT, RequestOptions::post(), true)
            .await;
        self.session().clear();
        result.map(|_| info!("signed out"))
    }
}
