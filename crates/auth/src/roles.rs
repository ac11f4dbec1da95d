//! Closed role set and normalization.

use serde::{Deserialize, Serialize};

use crate::LOGIN_ROUTE;

/// Prefixes the backend is known to attach to role names.
///
/// Kept as an explicit allow-list so stripping stays testable and the role
/// set stays closed.
const RECOGNIZED_PREFIXES: &[&str] = &["ROLE_"];

/// Role granted to an authenticated user.
///
/// The set is closed: anything the backend sends that does not normalize
/// into it is treated as "no role" and routes like an unauthenticated
/// session. Unknown roles never grant access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Owner,
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Owner, Role::Staff];

    /// Map a raw role representation into the closed set.
    ///
    /// Total and idempotent: trims, case-folds, strips one recognized
    /// prefix, then matches. Every input maps to exactly one of the three
    /// roles or to `None`.
    pub fn normalize(raw: &str) -> Option<Role> {
        let folded = raw.trim().to_ascii_uppercase();
        let stripped = RECOGNIZED_PREFIXES
            .iter()
            .find_map(|prefix| folded.strip_prefix(prefix))
            .unwrap_or(&folded);

        match stripped {
            "ADMIN" => Some(Role::Admin),
            "OWNER" => Some(Role::Owner),
            "STAFF" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::Staff => "STAFF",
        }
    }

    /// Default landing route for the role.
    pub fn home_route(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Owner => "/owner",
            Role::Staff => "/staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landing route for a possibly-absent role (`None` routes to login).
pub fn home_route_for(role: Option<Role>) -> &'static str {
    role.map(Role::home_route).unwrap_or(LOGIN_ROUTE)
}

/// Membership test for a non-empty allow-list, after normalization.
///
/// An empty allow-list means "any authenticated role" and is handled by the
/// gate, not here; this predicate only answers membership.
pub fn is_allowed(raw_role: &str, allow: &[Role]) -> bool {
    match Role::normalize(raw_role) {
        Some(role) => allow.contains(&role),
        None => false,
    }
}
