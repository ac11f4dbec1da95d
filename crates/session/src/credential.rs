//! Opaque bearer credential.

use serde::{Deserialize, Serialize};

/// Bearer token presented on authenticated requests.
///
/// The core never inspects the token's structure; it is carried to the
/// transport layer as-is. `Debug` redacts the value so credentials do not
/// leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
