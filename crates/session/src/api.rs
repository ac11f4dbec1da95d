//! Auth API client.
//!
//! `AuthApi` is the transport seam: the resolver and recovery flows talk to
//! it, tests substitute it, and `HttpAuthApi` is the reqwest-backed
//! implementation against the backend's `/api/v1/auth` surface.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use smartbiz_core::{BusinessId, UserProfile};

use crate::credential::Credential;

/// Transport-level failure.
///
/// Retry and timeout policy live in the `reqwest::Client` handed to
/// `HttpAuthApi`, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` carries the backend's error body message
    /// when one was present.
    #[error("request rejected ({status})")]
    Rejected { status: u16, message: Option<String> },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub business_id: Option<BusinessId>,
}

impl LoginResponse {
    /// Partial profile from the login response, if it carried one.
    ///
    /// Provisional only: it has no user id and must not gate authorization
    /// until the who-am-I endpoint confirms it.
    pub fn provisional_profile(&self) -> Option<UserProfile> {
        let role = self.role.clone()?;
        Some(UserProfile {
            id: None,
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            role,
            business_id: self.business_id,
            business_name: None,
        })
    }
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /auth/verify-otp` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub reset_token: String,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

/// `POST /auth/reset-password` payload. Requires the reset token issued by
/// `verify_otp`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub reset_token: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

/// Authentication endpoints of the backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// The who-am-I endpoint, carrying the bearer credential.
    async fn me(&self, credential: &Credential) -> Result<UserProfile, ApiError>;

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError>;

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<VerifyOtpResponse, ApiError>;

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest<'_>,
    ) -> Result<MessageResponse, ApiError>;
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed `AuthApi` against `{base_url}/api/v1/auth/...`.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client (timeouts, proxies, TLS).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/auth{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.post_json("/login", &LoginRequest { email, password })
            .await
    }

    async fn me(&self, credential: &Credential) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url("/me"))
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Self::read_json(response).await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.post_json("/forgot-password", &ForgotPasswordRequest { email })
            .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<VerifyOtpResponse, ApiError> {
        self.post_json("/verify-otp", &VerifyOtpRequest { email, otp })
            .await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest<'_>,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json("/reset-password", request).await
    }
}
