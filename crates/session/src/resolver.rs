//! Reconciliation of local session claims against the backend.

use std::sync::Arc;

use smartbiz_core::UserProfile;

use crate::api::{ApiError, AuthApi};
use crate::credential::Credential;
use crate::error::SessionError;
use crate::store::SessionStore;

/// Fallback shown when the backend rejects a login without a message.
const GENERIC_LOGIN_FAILURE: &str = "invalid email or password";

/// Exchanges the stored credential for the canonical profile, and performs
/// logins. Stateless: all durable effects go through the store.
pub struct SessionResolver {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    /// Resolve the stored credential into a confirmed profile.
    ///
    /// No credential: no network call, `Unauthenticated` (and any orphaned
    /// cached profile is dropped). Credential rejected: the stored session
    /// is cleared and `InvalidSession` returned — the caller treats the user
    /// as never logged in. Success persists credential and profile together.
    ///
    /// Idempotent and safe to retry; no retry is attempted here.
    pub async fn resolve(&self) -> Result<UserProfile, SessionError> {
        let Some(credential) = self.store.read_credential() else {
            self.store.clear();
            return Err(SessionError::Unauthenticated);
        };

        match self.api.me(&credential).await {
            Ok(profile) => {
                self.store.write_session(&credential, Some(&profile));
                Ok(profile)
            }
            Err(err) => {
                tracing::debug!(error = %err, "who-am-i rejected stored credential, clearing session");
                self.store.clear();
                Err(SessionError::InvalidSession)
            }
        }
    }

    /// Authenticate and establish a session.
    ///
    /// A 2xx login response without an access token is a backend contract
    /// violation (`MalformedResponse`); the login counts as failed and
    /// nothing is persisted. On success the credential and the provisional
    /// profile (when the response carried one) are persisted, then
    /// `resolve()` runs immediately to obtain the canonical profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let response = self
            .api
            .login(email, password)
            .await
            .map_err(login_failure)?;

        let Some(token) = response.access_token.as_deref().filter(|t| !t.is_empty()) else {
            tracing::error!("login response missing accessToken (backend contract violation)");
            return Err(SessionError::MalformedResponse(
                "login response did not include an access token".to_string(),
            ));
        };

        let credential = Credential::new(token);
        self.store
            .write_session(&credential, response.provisional_profile().as_ref());

        self.resolve().await
    }
}

fn login_failure(err: ApiError) -> SessionError {
    match err {
        ApiError::Rejected {
            message: Some(message),
            ..
        } => SessionError::AuthenticationFailed(message),
        ApiError::Rejected { .. } => {
            SessionError::AuthenticationFailed(GENERIC_LOGIN_FAILURE.to_string())
        }
        other => SessionError::AuthenticationFailed(other.to_string()),
    }
}
