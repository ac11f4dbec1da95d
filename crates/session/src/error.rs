//! Session error taxonomy.
//!
//! Every transport or parse failure inside the resolver is translated into
//! one of these before it crosses the session service boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No credential is stored. A normal state, not a failure.
    #[error("no credential present")]
    Unauthenticated,

    /// A stored credential was rejected by the backend (expired, revoked,
    /// malformed). Recovered locally by clearing the stored session; never
    /// shown to the user as an error.
    #[error("stored session rejected by the backend")]
    InvalidSession,

    /// A login attempt was rejected. The message is meant for the login
    /// form; local state is left unchanged.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The backend reported success but violated its contract (e.g. a login
    /// response without an access token). Treated like a failed login by
    /// the UI, but logged distinctly.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}
