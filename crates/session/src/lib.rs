//! `smartbiz-session` — client-side session core.
//!
//! Owns the bearer credential, reconciles it against the backend's who-am-I
//! endpoint, and exposes the single per-process session state that the
//! authorization gate reads. Storage and transport sit behind traits so the
//! whole lifecycle is testable without a browser or a backend.

pub mod api;
pub mod credential;
pub mod error;
pub mod recovery;
pub mod resolver;
pub mod service;
pub mod store;

pub use api::{
    ApiError, AuthApi, HttpAuthApi, LoginResponse, MessageResponse, ResetPasswordRequest,
    VerifyOtpResponse,
};
pub use credential::Credential;
pub use error::SessionError;
pub use recovery::{PasswordRecovery, RecoveryError, ResetToken};
pub use resolver::SessionResolver;
pub use service::SessionService;
pub use store::{FileStore, MemoryStore, SessionStore};

#[cfg(test)]
pub(crate) mod test_support;
