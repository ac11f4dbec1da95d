//! Password recovery flow (forgot password → OTP → reset).
//!
//! Stateless over the auth API; never touches the token store or session
//! state. Contract: every endpoint takes a payload object, and the reset
//! step requires the reset token issued by OTP verification.

use std::sync::Arc;

use thiserror::Error;

use smartbiz_core::DomainError;

use crate::api::{ApiError, AuthApi, MessageResponse, ResetPasswordRequest};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// Input rejected locally, before any network call.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The backend rejected the request.
    #[error("password recovery rejected: {0}")]
    Rejected(String),

    /// The request never completed.
    #[error("password recovery request failed: {0}")]
    Transport(String),
}

/// Token issued by OTP verification, required for the reset step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken(String);

impl ResetToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

pub struct PasswordRecovery {
    api: Arc<dyn AuthApi>,
}

impl PasswordRecovery {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Ask the backend to send an OTP.
    ///
    /// The backend's acknowledgement is deliberately non-committal (it does
    /// not reveal whether the email exists); pass it through as-is.
    pub async fn request_otp(&self, email: &str) -> Result<MessageResponse, RecoveryError> {
        require(email, "email is required")?;
        self.api
            .forgot_password(email.trim())
            .await
            .map_err(recovery_failure)
    }

    /// Exchange the received OTP for a reset token.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<ResetToken, RecoveryError> {
        require(email, "email is required")?;
        require(otp, "OTP is required")?;

        let response = self
            .api
            .verify_otp(email.trim(), otp.trim())
            .await
            .map_err(recovery_failure)?;
        Ok(ResetToken::new(response.reset_token))
    }

    /// Set a new password using the reset token.
    ///
    /// Mismatched or empty passwords are rejected locally; the backend is
    /// only consulted with a self-consistent payload.
    pub async fn reset_password(
        &self,
        email: &str,
        reset_token: &ResetToken,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<MessageResponse, RecoveryError> {
        require(email, "email is required")?;
        if new_password.is_empty() {
            return Err(DomainError::validation("new password is required").into());
        }
        if new_password != confirm_password {
            return Err(DomainError::validation("passwords do not match").into());
        }

        self.api
            .reset_password(&ResetPasswordRequest {
                email: email.trim(),
                reset_token: reset_token.expose(),
                new_password,
                confirm_password,
            })
            .await
            .map_err(recovery_failure)
    }
}

fn require(value: &str, msg: &str) -> Result<(), RecoveryError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(msg).into());
    }
    Ok(())
}

fn recovery_failure(err: ApiError) -> RecoveryError {
    match err {
        ApiError::Rejected {
            message: Some(message),
            ..
        } => RecoveryError::Rejected(message),
        ApiError::Rejected { status, .. } => {
            RecoveryError::Rejected(format!("request rejected ({status})"))
        }
        other => RecoveryError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VerifyOtpResponse;
    use crate::test_support::MockApi;

    fn message(text: &str) -> MessageResponse {
        MessageResponse {
            message: text.to_string(),
        }
    }

    #[tokio::test]
    async fn request_otp_passes_through_the_acknowledgement() {
        let api = Arc::new(
            MockApi::new().with_forgot(Ok(message("If the email exists, OTP has been sent."))),
        );
        let recovery = PasswordRecovery::new(api);

        let ack = recovery.request_otp("ada@example.com").await.unwrap();
        assert_eq!(ack.message, "If the email exists, OTP has been sent.");
    }

    #[tokio::test]
    async fn empty_email_is_rejected_locally() {
        let api = Arc::new(MockApi::new());
        let recovery = PasswordRecovery::new(api.clone());

        let err = recovery.request_otp("   ").await.unwrap_err();
        assert!(matches!(err, RecoveryError::Validation(_)));
        assert_eq!(api.forgot_calls(), 0);
    }

    #[tokio::test]
    async fn verify_otp_threads_token_into_reset() {
        let api = Arc::new(
            MockApi::new()
                .with_verify(Ok(VerifyOtpResponse {
                    reset_token: "reset-abc".to_string(),
                    message: "OTP verified".to_string(),
                }))
                .with_reset(Ok(message("Password updated successfully"))),
        );
        let recovery = PasswordRecovery::new(api.clone());

        let token = recovery.verify_otp("ada@example.com", "123456").await.unwrap();
        recovery
            .reset_password("ada@example.com", &token, "n3w-pass", "n3w-pass")
            .await
            .unwrap();

        assert_eq!(api.last_reset_token().as_deref(), Some("reset-abc"));
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_the_backend() {
        let api = Arc::new(MockApi::new());
        let recovery = PasswordRecovery::new(api.clone());
        let token = ResetToken::new("reset-abc");

        let err = recovery
            .reset_password("ada@example.com", &token, "one", "two")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RecoveryError::Validation(DomainError::validation("passwords do not match"))
        );
        assert_eq!(api.reset_calls(), 0);
    }

    #[tokio::test]
    async fn backend_rejection_carries_its_message() {
        let api = Arc::new(MockApi::new().with_verify(Err(ApiError::Rejected {
            status: 400,
            message: Some("OTP expired".to_string()),
        })));
        let recovery = PasswordRecovery::new(api);

        let err = recovery
            .verify_otp("ada@example.com", "000000")
            .await
            .unwrap_err();
        assert_eq!(err, RecoveryError::Rejected("OTP expired".to_string()));
    }
}
