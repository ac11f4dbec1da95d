//! The single decision point consulted before rendering a protected view.

use smartbiz_core::UserProfile;

use crate::roles::{home_route_for, is_allowed, Role};
use crate::routes::RoutePolicy;
use crate::LOGIN_ROUTE;

/// The gate's view of the session.
///
/// `user` carries only a *confirmed* profile (one the who-am-I endpoint has
/// vouched for). Provisional snapshots must not reach authorization; the
/// session service keeps them out of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub user: Option<UserProfile>,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }

    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }
}

/// Outcome of an authorization check for a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session still resolving; render a placeholder, decide nothing yet.
    Defer,
    /// Navigate to the given path instead of rendering the route.
    Redirect(&'static str),
    /// Render the route's content.
    Allow,
}

/// Classify a navigation attempt.
///
/// Pure function of `(snapshot, policy)`; the caller performs any actual
/// navigation. The table is evaluated in order, first match wins:
/// loading defers, a missing user goes to login, a role outside a non-empty
/// allow-list goes to its own home route, everything else is allowed.
pub fn decide(snapshot: &SessionSnapshot, policy: &RoutePolicy) -> AccessDecision {
    if snapshot.loading {
        return AccessDecision::Defer;
    }

    let Some(user) = &snapshot.user else {
        return AccessDecision::Redirect(LOGIN_ROUTE);
    };

    if policy.is_role_restricted() && !is_allowed(&user.role, &policy.allow_roles) {
        return AccessDecision::Redirect(home_route_for(Role::normalize(&user.role)));
    }

    AccessDecision::Allow
}

/// Target for the bare `/` route: the session's home once resolved.
///
/// `None` while the session is still loading.
pub fn root_redirect(snapshot: &SessionSnapshot) -> Option<&'static str> {
    if snapshot.loading {
        return None;
    }

    Some(match &snapshot.user {
        Some(user) => home_route_for(Role::normalize(&user.role)),
        None => LOGIN_ROUTE,
    })
}
