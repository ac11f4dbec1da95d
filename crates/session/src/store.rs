//! Durable session storage.
//!
//! Two logical keys — the bearer credential and the cached profile — written
//! together and cleared together. Reads fail soft: malformed stored data is
//! discarded and read as "absent", never surfaced to callers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartbiz_core::UserProfile;

use crate::credential::Credential;

/// Durable key-value persistence for the session, scoped to the client
/// process.
///
/// Implementations swallow storage failures (logged at error level): a
/// broken cache must never fail a successful login, and a broken read is
/// indistinguishable from "never logged in".
pub trait SessionStore: Send + Sync {
    /// The stored bearer credential, if any.
    fn read_credential(&self) -> Option<Credential>;

    /// Last-known profile snapshot. Advisory only; parse errors read as
    /// "no cached profile".
    fn read_cached_profile(&self) -> Option<UserProfile>;

    /// Persist the credential and (when known) the profile together.
    ///
    /// A login response without profile fields stores the credential alone;
    /// the subsequent resolve fills the profile in.
    fn write_session(&self, credential: &Credential, profile: Option<&UserProfile>);

    /// Remove both keys. Subsequent reads return `None`.
    fn clear(&self);
}

/// On-disk document shape. One file holds both keys so they change together.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocument {
    #[serde(default)]
    access_token: Option<String>,

    /// Cached profile, kept as a raw value so a malformed snapshot can be
    /// discarded without losing a valid token in the same document.
    #[serde(default)]
    me: Option<serde_json::Value>,

    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// File-backed session store.
///
/// Writes go through a temp file + rename so a crash mid-write leaves
/// either the old document or the new one, never a torn mix of the two.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at the platform data directory (`<data dir>/smartbiz/session.json`).
    pub fn new() -> anyhow::Result<Self> {
        let dir = dirs::data_dir().context("no platform data directory available")?;
        Ok(Self::at_path(dir.join("smartbiz").join("session.json")))
    }

    /// Store at an explicit path (tests, embedders).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Option<SessionDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to read session store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding malformed session document");
                None
            }
        }
    }

    fn save(&self, doc: &SessionDocument) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session dir {}", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(doc).context("failed to serialize session")?;
        fs::write(&tmp, raw)
            .with_context(|| format!("failed to write session file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to install session file {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn read_credential(&self) -> Option<Credential> {
        self.load()?
            .access_token
            .filter(|token| !token.is_empty())
            .map(Credential::new)
    }

    fn read_cached_profile(&self) -> Option<UserProfile> {
        let me = self.load()?.me?;
        match serde_json::from_value(me) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed cached profile");
                None
            }
        }
    }

    fn write_session(&self, credential: &Credential, profile: Option<&UserProfile>) {
        let doc = SessionDocument {
            access_token: Some(credential.expose().to_string()),
            me: profile.and_then(|p| match serde_json::to_value(p) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::error!(error = %err, "failed to serialize cached profile");
                    None
                }
            }),
            saved_at: Some(Utc::now()),
        };

        if let Err(err) = self.save(&doc) {
            tracing::error!(error = %err, "failed to persist session");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to clear session store");
            }
        }
    }
}

/// In-process session store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<(Credential, Option<UserProfile>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store as if a previous session had been persisted.
    pub fn seeded(credential: Credential, profile: Option<UserProfile>) -> Self {
        Self {
            state: Mutex::new(Some((credential, profile))),
        }
    }
}

impl SessionStore for MemoryStore {
    fn read_credential(&self) -> Option<Credential> {
        self.state
            .lock()
            .expect("session store poisoned")
            .as_ref()
            .map(|(credential, _)| credential.clone())
    }

    fn read_cached_profile(&self) -> Option<UserProfile> {
        self.state
            .lock()
            .expect("session store poisoned")
            .as_ref()
            .and_then(|(_, profile)| profile.clone())
    }

    fn write_session(&self, credential: &Credential, profile: Option<&UserProfile>) {
        *self.state.lock().expect("session store poisoned") =
            Some((credential.clone(), profile.cloned()));
    }

    fn clear(&self) {
        *self.state.lock().expect("session store poisoned") = None;
    }
}
