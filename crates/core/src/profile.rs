//! Canonical user profile snapshot.

use serde::{Deserialize, Serialize};

use crate::id::{BusinessId, UserId};

/// A user profile as served by the backend.
///
/// The same shape covers both the partial snapshot returned by a login
/// response (no `id`) and the canonical answer from the who-am-I endpoint.
/// `role` stays a raw string here; normalization into the closed role set
/// happens at the authorization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub business_id: Option<BusinessId>,

    #[serde(default)]
    pub business_name: Option<String>,
}
