//! Route policies declared at registration time.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Authorization requirements attached to a protected route.
///
/// An empty allow-list means "any authenticated role".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub allow_roles: Vec<Role>,
}

impl RoutePolicy {
    /// Any authenticated role may enter.
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// Only the listed roles may enter.
    pub fn roles(allow: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allow_roles: allow.into_iter().collect(),
        }
    }

    pub fn is_role_restricted(&self) -> bool {
        !self.allow_roles.is_empty()
    }
}

/// Static mapping from path prefixes to route policies.
///
/// Registered once at startup; lookup is longest-prefix on path segment
/// boundaries, so a policy for `/owner` covers `/owner/invoices/7` but not
/// `/ownership`. Unmatched paths are the caller's root-redirect case.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, RoutePolicy)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a policy for a path prefix. Later registrations win ties.
    pub fn register(mut self, prefix: impl Into<String>, policy: RoutePolicy) -> Self {
        self.entries.push((prefix.into(), policy));
        self
    }

    /// Policy for the longest registered prefix matching `path`.
    pub fn policy_for(&self, path: &str) -> Option<&RoutePolicy> {
        self.entries
            .iter()
            .filter(|(prefix, _)| prefix_matches(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, policy)| policy)
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new()
            .register("/owner", RoutePolicy::roles([Role::Owner]))
            .register("/staff", RoutePolicy::roles([Role::Staff]))
            .register("/admin", RoutePolicy::roles([Role::Admin]))
            .register("/profile", RoutePolicy::any_authenticated())
    }

    #[test]
    fn exact_and_nested_paths_match() {
        let table = table();
        assert_eq!(
            table.policy_for("/owner"),
            Some(&RoutePolicy::roles([Role::Owner]))
        );
        assert_eq!(
            table.policy_for("/owner/invoices/7"),
            Some(&RoutePolicy::roles([Role::Owner]))
        );
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let table = table();
        assert_eq!(table.policy_for("/ownership"), None);
        assert_eq!(table.policy_for("/"), None);
    }

    #[test]
    fn longest_prefix_wins() {
        let table = table().register(
            "/owner/staff-management",
            RoutePolicy::roles([Role::Owner, Role::Admin]),
        );
        assert_eq!(
            table.policy_for("/owner/staff-management/new"),
            Some(&RoutePolicy::roles([Role::Owner, Role::Admin]))
        );
        assert_eq!(
            table.policy_for("/owner/sales"),
            Some(&RoutePolicy::roles([Role::Owner]))
        );
    }
}
