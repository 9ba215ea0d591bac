//! The signed-in user and how it is resolved at startup.
//!
//! A context is mounted from the credential store. If a profile snapshot is
//! cached, it is shown immediately as [`SessionPhase::Provisional`]; the
//! resolver then asks the server who the stored token belongs to and either
//! confirms the session or tears it down.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use {
    secrecy::{ExposeSecret, Secret},
    taskdesk_common::UserProfile,
    tokio::sync::watch,
    tracing::{debug, info, warn},
};

use crate::{CredentialStore, Result, gateway::AuthGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Mounted without a snapshot; the resolver has not finished.
    Resolving,
    /// Showing the cached snapshot while the server is asked.
    Provisional,
    /// Validated by the server or set by a login.
    Confirmed,
    /// Validation failed or the user was cleared.
    Rejected,
    /// No token was stored.
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<UserProfile>,
}

impl SessionState {
    /// True only before the first resolution of a mount without a snapshot.
    pub fn loading(&self) -> bool {
        self.phase == SessionPhase::Resolving
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    fn with(phase: SessionPhase, user: Option<UserProfile>) -> Self {
        Self { phase, user }
    }
}

pub struct SessionContext {
    credentials: CredentialStore,
    gateway: Arc<dyn AuthGateway>,
    state: Mutex<SessionState>,
    watchers: Mutex<Option<watch::Sender<SessionState>>>,
    resolved: AtomicBool,
    /// Bumped by every `update_user` and `clear_user`.
    generation: AtomicU64,
}

impl SessionContext {
    /// Create a context, hydrating the user from the cached snapshot.
    pub fn mount(credentials: CredentialStore, gateway: Arc<dyn AuthGateway>) -> Self {
        let initial = match credentials.load_profile() {
            Some(user) => {
                debug!(email = %user.email, "hydrated cached profile");
                SessionState::with(SessionPhase::Provisional, Some(user))
            },
            None => SessionState::with(SessionPhase::Resolving, None),
        };
        let (tx, _) = watch::channel(initial.clone());
        Self {
            credentials,
            gateway,
            state: Mutex::new(initial),
            watchers: Mutex::new(Some(tx)),
            resolved: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn gateway(&self) -> &Arc<dyn AuthGateway> {
        &self.gateway
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user
    }

    pub fn loading(&self) -> bool {
        self.state().loading()
    }

    /// Watch every state transition. After [`teardown`](Self::teardown) the
    /// returned receiver is already closed.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        match self
            .watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            Some(tx) => tx.subscribe(),
            None => watch::channel(self.state()).1,
        }
    }

    /// Unmount: close every subscription. Later mutations still apply but are
    /// no longer broadcast.
    pub fn teardown(&self) {
        self.watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        debug!("session context torn down");
    }

    fn publish(&self, next: SessionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next.clone();
        if let Some(tx) = self
            .watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            tx.send_replace(next);
        }
    }

    /// Validate the stored token against the server. Runs once per mount;
    /// later calls return the current state untouched.
    ///
    /// If the user is updated or cleared while the server is being asked,
    /// the answer is stale and is dropped.
    pub async fn resolve(&self) -> SessionState {
        if self.resolved.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let Some(token) = self.credentials.token() else {
            debug!("no stored token, session is anonymous");
            self.publish(SessionState::with(SessionPhase::Anonymous, None));
            return self.state();
        };

        let started = self.generation.load(Ordering::SeqCst);
        self.gateway
            .set_bearer(Secret::new(token.expose_secret().clone()));

        let reply = self.gateway.current_profile().await;
        if self.generation.load(Ordering::SeqCst) != started {
            debug!("session changed while resolving, dropping the server reply");
            return self.state();
        }
        match reply {
            Ok(profile) => {
                let profile = profile.with_token(token);
                if let Err(e) = self.credentials.save_profile(&profile) {
                    warn!(error = %e, "failed to cache profile snapshot");
                }
                info!(email = %profile.email, role = %profile.role, "session confirmed");
                self.publish(SessionState::with(SessionPhase::Confirmed, Some(profile)));
            },
            Err(e) => {
                warn!(error = %e, "stored session rejected");
                self.clear_user();
            },
        }
        self.state()
    }

    /// Cache the snapshot, store the profile's token durably if no token is
    /// stored yet, then make it the current user. On a storage error the
    /// current state is left as it was.
    pub fn update_user(&self, profile: UserProfile) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.credentials.save_profile(&profile)?;
        if let Some(token) = &profile.token
            && self.credentials.token().is_none()
        {
            self.credentials.set_token(token, true)?;
        }
        self.publish(SessionState::with(SessionPhase::Confirmed, Some(profile)));
        Ok(())
    }

    /// Sign out locally: drop the user, both tokens, the snapshot and the
    /// bearer header. Safe to call repeatedly.
    pub fn clear_user(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.credentials.clear_all() {
            warn!(error = %e, "failed to clear stored credentials");
        }
        self.gateway.clear_bearer();
        self.publish(SessionState::with(SessionPhase::Rejected, None));
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .field("resolved", &self.resolved.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
