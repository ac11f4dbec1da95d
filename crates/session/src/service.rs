//! The per-process session state owner.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use smartbiz_auth::{home_route_for, Role, SessionSnapshot, LOGIN_ROUTE};
use smartbiz_core::UserProfile;

use crate::api::AuthApi;
use crate::error::SessionError;
use crate::resolver::SessionResolver;
use crate::store::SessionStore;

/// Where a profile snapshot came from.
///
/// Only `Confirmed` (vouched for by the who-am-I endpoint) feeds the
/// authorization gate. `Provisional` data — the cached snapshot on a cold
/// start, or the partial profile in a login response — is for fast UI paint
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProfileState {
    Provisional(UserProfile),
    Confirmed(UserProfile),
}

#[derive(Debug)]
struct SessionState {
    profile: Option<ProfileState>,
    loading: bool,
    return_to: Option<String>,
}

/// Single per-process owner of session state.
///
/// All reads of session state go through `snapshot()`; all mutation goes
/// through `init` / `login` / `logout` / `reload_me`. Async completions are
/// guarded by a generation counter: `logout()` bumps it, and any resolve or
/// login that started under an older generation is discarded when it lands,
/// so a stale success can never resurrect a logged-out session.
pub struct SessionService {
    resolver: SessionResolver,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

impl SessionService {
    /// Build the service in the unresolved state (`loading = true`),
    /// seeding a provisional profile from the store for fast first paint.
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        let profile = store
            .read_cached_profile()
            .map(ProfileState::Provisional);

        Self {
            resolver: SessionResolver::new(store.clone(), api),
            store,
            state: Mutex::new(SessionState {
                profile,
                loading: true,
                return_to: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Mount-time resolve: exchange the stored credential for the canonical
    /// profile. `loading` transitions to `false` exactly once, on success
    /// and failure alike.
    pub async fn init(&self) {
        {
            let mut state = self.lock_state();
            state.loading = true;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let outcome = self.resolver.resolve().await;
        self.install_resolution(generation, outcome);
    }

    /// Authenticate and enter the resolved state.
    ///
    /// On failure the error is surfaced to the caller (login form) and the
    /// session state is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let profile = self.resolver.login(email, password).await?;

        let mut state = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != generation {
            // A logout raced this login and wins; undo the persistence the
            // resolver just performed.
            drop(state);
            self.store.clear();
            tracing::debug!("discarding login that completed after logout");
            return Err(SessionError::Unauthenticated);
        }

        state.profile = Some(ProfileState::Confirmed(profile.clone()));
        state.loading = false;
        Ok(profile)
    }

    /// Synchronously drop the session. Idempotent, no network call, and
    /// authoritative over any in-flight resolve or login.
    pub fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.store.clear();

        let mut state = self.lock_state();
        state.profile = None;
        state.loading = false;
    }

    /// Re-resolve the profile without re-entering the loading state, e.g.
    /// after a profile edit. Failure demotes the session to anonymous, as
    /// with any rejected credential.
    pub async fn reload_me(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        let outcome = self.resolver.resolve().await;
        self.install_resolution(generation, outcome);
    }

    /// Gate-facing view: `user` is populated only by a confirmed profile.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            loading: state.loading,
            user: match &state.profile {
                Some(ProfileState::Confirmed(profile)) => Some(profile.clone()),
                _ => None,
            },
        }
    }

    /// UI-facing profile, including provisional snapshots. Never use this
    /// for authorization.
    pub fn display_profile(&self) -> Option<UserProfile> {
        let state = self.lock_state();
        match &state.profile {
            Some(ProfileState::Provisional(profile) | ProfileState::Confirmed(profile)) => {
                Some(profile.clone())
            }
            None => None,
        }
    }

    /// Remember an attempted path for post-login replay.
    pub fn remember_return_to(&self, path: impl Into<String>) {
        self.lock_state().return_to = Some(path.into());
    }

    /// Navigation target after a successful login: the remembered path if
    /// one was set (consumed on read), else the confirmed role's home.
    pub fn login_destination(&self) -> String {
        let mut state = self.lock_state();
        if let Some(path) = state.return_to.take() {
            return path;
        }

        match &state.profile {
            Some(ProfileState::Confirmed(profile)) => {
                home_route_for(Role::normalize(&profile.role)).to_string()
            }
            _ => LOGIN_ROUTE.to_string(),
        }
    }

    fn install_resolution(&self, generation: u64, outcome: Result<UserProfile, SessionError>) {
        let mut state = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != generation {
            drop(state);
            if outcome.is_ok() {
                // The resolver re-persisted the session before we noticed the
                // logout; logout wins.
                self.store.clear();
            }
            tracing::debug!("discarding session resolution that completed after logout");
            return;
        }

        match outcome {
            Ok(profile) => {
                state.profile = Some(ProfileState::Confirmed(profile));
            }
            Err(SessionError::Unauthenticated) => {
                state.profile = None;
            }
            Err(err) => {
                // Silent demotion: an invalidated session is indistinguishable
                // from "never logged in" for the user.
                tracing::info!(error = %err, "session demoted to anonymous");
                state.profile = None;
            }
        }
        state.loading = false;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state poisoned")
    }
}
