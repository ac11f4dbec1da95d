//! `smartbiz-auth` — pure authorization boundary for the client core.
//!
//! This crate is intentionally decoupled from HTTP and storage: role
//! normalization, route policies, and the gate decision are all
//! deterministic functions over their inputs.

pub mod gate;
pub mod roles;
pub mod routes;

pub use gate::{decide, root_redirect, AccessDecision, SessionSnapshot};
pub use roles::{home_route_for, is_allowed, Role};
pub use routes::{RoutePolicy, RouteTable};

/// Default route for unauthenticated sessions.
pub const LOGIN_ROUTE: &str = "/login";
