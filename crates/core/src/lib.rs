//! `smartbiz-core` — shared foundation for the client core.
//!
//! Typed identifiers and the deterministic error model. No IO, no async.

pub mod error;
pub mod id;
pub mod profile;

pub use error::{DomainError, DomainResult};
pub use id::{BusinessId, UserId};
pub use profile::UserProfile;
