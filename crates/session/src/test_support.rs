//! Shared test doubles for the session crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use smartbiz_core::UserProfile;

use crate::api::{
    ApiError, AuthApi, LoginResponse, MessageResponse, ResetPasswordRequest, VerifyOtpResponse,
};
use crate::credential::Credential;

pub(crate) fn owner_profile() -> UserProfile {
    UserProfile {
        id: Some(1.into()),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        role: "OWNER".to_string(),
        business_id: Some(10.into()),
        business_name: Some("Ada Analytics".to_string()),
    }
}

fn unscripted<T>() -> Result<T, ApiError> {
    Err(ApiError::Network("mock: endpoint not scripted".to_string()))
}

/// Scriptable `AuthApi` with call counters.
///
/// `me_gate` lets a test hold a who-am-I call in flight (to race it against
/// `logout`); the call blocks until the gate is notified.
pub(crate) struct MockApi {
    login: Mutex<Result<LoginResponse, ApiError>>,
    me: Mutex<Result<UserProfile, ApiError>>,
    forgot: Mutex<Result<MessageResponse, ApiError>>,
    verify: Mutex<Result<VerifyOtpResponse, ApiError>>,
    reset: Mutex<Result<MessageResponse, ApiError>>,
    me_gate: Option<Arc<Notify>>,
    login_calls: AtomicUsize,
    me_calls: AtomicUsize,
    forgot_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    last_reset_token: Mutex<Option<String>>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self {
            login: Mutex::new(unscripted()),
            me: Mutex::new(unscripted()),
            forgot: Mutex::new(unscripted()),
            verify: Mutex::new(unscripted()),
            reset: Mutex::new(unscripted()),
            me_gate: None,
            login_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            forgot_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
            last_reset_token: Mutex::new(None),
        }
    }

    pub(crate) fn with_login(self, result: Result<LoginResponse, ApiError>) -> Self {
        *self.login.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_me(self, result: Result<UserProfile, ApiError>) -> Self {
        *self.me.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_forgot(self, result: Result<MessageResponse, ApiError>) -> Self {
        *self.forgot.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_verify(self, result: Result<VerifyOtpResponse, ApiError>) -> Self {
        *self.verify.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_reset(self, result: Result<MessageResponse, ApiError>) -> Self {
        *self.reset.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_me_gate(mut self, gate: Arc<Notify>) -> Self {
        self.me_gate = Some(gate);
        self
    }

    /// Re-script the who-am-I result mid-test (e.g. token expiring).
    pub(crate) fn set_me(&self, result: Result<UserProfile, ApiError>) {
        *self.me.lock().unwrap() = result;
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn forgot_calls(&self) -> usize {
        self.forgot_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_reset_token(&self) -> Option<String> {
        self.last_reset_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.lock().unwrap().clone()
    }

    async fn me(&self, _credential: &Credential) -> Result<UserProfile, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.me_gate {
            gate.notified().await;
        }
        self.me.lock().unwrap().clone()
    }

    async fn forgot_password(&self, _email: &str) -> Result<MessageResponse, ApiError> {
        self.forgot_calls.fetch_add(1, Ordering::SeqCst);
        self.forgot.lock().unwrap().clone()
    }

    async fn verify_otp(&self, _email: &str, _otp: &str) -> Result<VerifyOtpResponse, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify.lock().unwrap().clone()
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest<'_>,
    ) -> Result<MessageResponse, ApiError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_reset_token.lock().unwrap() = Some(request.reset_token.to_string());
        self.reset.lock().unwrap().clone()
    }
}
