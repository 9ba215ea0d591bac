use std::sync::Arc;

use {
    secrecy::{ExposeSecret, Secret},
    taskdesk_common::UserProfile,
    taskdesk_config::StorageConfig,
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    storage::{FileStore, KeyValueStore, MemoryStore},
};

/// Key holding the bearer token in either area.
pub const TOKEN_KEY: &str = "token";
/// Key holding the profile snapshot in the durable area.
pub const PROFILE_KEY: &str = "userData";

const DURABLE_FILE: &str = "credentials.json";
const SESSION_FILE: &str = "session.json";

/// Which area currently holds the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    Durable,
    Session,
}

/// Token and profile snapshot over a durable and a session-scoped area.
///
/// The token lives in at most one area at a time. Nothing is cached: every
/// read goes to the backing stores.
#[derive(Clone)]
pub struct CredentialStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// File-backed store: durable file in the config dir, session file in the
    /// per-login runtime dir, unless overridden in `[storage]`.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let durable_dir = match &config.durable_dir {
            Some(dir) => dir.clone(),
            None => taskdesk_config::config_dir()
                .ok_or_else(|| Error::message("could not determine the config directory"))?,
        };
        let session_dir = config
            .session_dir
            .clone()
            .unwrap_or_else(taskdesk_config::runtime_dir);

        debug!(
            durable = %durable_dir.display(),
            session = %session_dir.display(),
            "credential store opened"
        );
        Ok(Self::new(
            Arc::new(FileStore::new(durable_dir.join(DURABLE_FILE))),
            Arc::new(FileStore::new(session_dir.join(SESSION_FILE))),
        ))
    }

    /// Store `token` durably or for this session only, clearing the other area.
    pub fn set_token(&self, token: &Secret<String>, persistent: bool) -> Result<()> {
        let (target, other) = if persistent {
            (&self.durable, &self.session)
        } else {
            (&self.session, &self.durable)
        };
        target.set(TOKEN_KEY, token.expose_secret())?;
        other.remove(TOKEN_KEY)?;
        info!(persistent, "session token stored");
        Ok(())
    }

    /// The stored token, preferring the durable area.
    pub fn token(&self) -> Option<Secret<String>> {
        self.token_with_location().map(|(token, _)| token)
    }

    pub fn token_location(&self) -> Option<TokenLocation> {
        self.token_with_location().map(|(_, location)| location)
    }

    fn token_with_location(&self) -> Option<(Secret<String>, TokenLocation)> {
        let non_empty = |v: String| (!v.is_empty()).then(|| Secret::new(v));
        if let Some(token) = self.durable.get(TOKEN_KEY).and_then(non_empty) {
            return Some((token, TokenLocation::Durable));
        }
        self.session
            .get(TOKEN_KEY)
            .and_then(non_empty)
            .map(|token| (token, TokenLocation::Session))
    }

    /// Remove the token from both areas. Both removals are attempted; the
    /// first failure is returned.
    pub fn clear_token(&self) -> Result<()> {
        let durable = self.durable.remove(TOKEN_KEY);
        let session = self.session.remove(TOKEN_KEY);
        durable.and(session)
    }

    /// Persist the profile snapshot (never the token).
    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let snapshot = serde_json::to_string(profile)?;
        self.durable.set(PROFILE_KEY, &snapshot)
    }

    /// The cached snapshot. Malformed data is logged and reads as absent.
    pub fn load_profile(&self) -> Option<UserProfile> {
        let raw = self.durable.get(PROFILE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "cached profile snapshot is malformed, ignoring it");
                None
            },
        }
    }

    pub fn clear_profile(&self) -> Result<()> {
        self.durable.remove(PROFILE_KEY)
    }

    /// Remove the token from both areas and the snapshot.
    pub fn clear_all(&self) -> Result<()> {
        let token = self.clear_token();
        let profile = self.clear_profile();
        token.and(profile)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token", &self.token_location())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::storage::tests::FaultyStore, taskdesk_common::Role};

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>, CredentialStore) {
        let durable = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let store = CredentialStore::new(durable.clone(), session.clone());
        (durable, session, store)
    }

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "email": "ravi@college.edu",
            "role": "Staff",
            "full_name": "Ravi Kumar",
            "is_superuser": false,
            "department": "IT",
            "token": "secret-token"
        }))
        .unwrap()
    }

    #[test]
    fn remembered_token_lives_only_in_durable_area() {
        let (durable, session, store) = stores();
        session.set(TOKEN_KEY, "old").unwrap();

        store.set_token(&Secret::new("t1".into()), true).unwrap();

        assert_eq!(durable.get(TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(session.get(TOKEN_KEY), None);
        assert_eq!(store.token_location(), Some(TokenLocation::Durable));
    }

    #[test]
    fn session_token_clears_durable_area() {
        let (durable, session, store) = stores();
        durable.set(TOKEN_KEY, "old").unwrap();

        store.set_token(&Secret::new("t2".into()), false).unwrap();

        assert_eq!(durable.get(TOKEN_KEY), None);
        assert_eq!(session.get(TOKEN_KEY).as_deref(), Some("t2"));
        assert_eq!(store.token().unwrap().expose_secret(), "t2");
    }

    #[test]
    fn durable_token_wins_and_empty_values_are_absent() {
        let (durable, session, store) = stores();
        durable.set(TOKEN_KEY, "").unwrap();
        session.set(TOKEN_KEY, "s").unwrap();
        assert_eq!(store.token_location(), Some(TokenLocation::Session));

        durable.set(TOKEN_KEY, "d").unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "d");
    }

    #[test]
    fn snapshot_has_exactly_six_fields_and_no_token() {
        let (durable, _, store) = stores();
        store.save_profile(&profile()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&durable.get(PROFILE_KEY).unwrap()).unwrap();
        let mut keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, [
            "department",
            "email",
            "full_name",
            "id",
            "is_superuser",
            "role"
        ]);

        let loaded = store.load_profile().unwrap();
        assert_eq!(loaded.role, Role::Staff);
        assert!(loaded.token.is_none());
    }

    #[test]
    fn corrupt_snapshot_reads_as_absent() {
        let (durable, _, store) = stores();
        durable.set(PROFILE_KEY, "{\"id\": ").unwrap();
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn clear_all_empties_both_areas() {
        let (durable, session, store) = stores();
        store.set_token(&Secret::new("t".into()), false).unwrap();
        store.save_profile(&profile()).unwrap();

        store.clear_all().unwrap();

        assert!(durable.is_empty());
        assert!(session.is_empty());
        assert!(store.token().is_none());
    }

    #[test]
    fn clear_all_keeps_going_after_a_failed_removal() {
        let durable = Arc::new(FaultyStore {
            fail_remove: Some(TOKEN_KEY),
            ..FaultyStore::default()
        });
        let session = Arc::new(MemoryStore::new());
        let store = CredentialStore::new(durable.clone(), session.clone());
        durable.inner.set(TOKEN_KEY, "d").unwrap();
        session.set(TOKEN_KEY, "s").unwrap();
        store.save_profile(&profile()).unwrap();

        let err = store.clear_all().unwrap_err();

        assert_eq!(err.to_string(), "read-only file system");
        assert!(session.is_empty());
        assert!(durable.get(PROFILE_KEY).is_none());
    }

    #[test]
    fn file_backed_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            durable_dir: Some(dir.path().join("durable")),
            session_dir: Some(dir.path().join("session")),
        };
        let store = CredentialStore::from_config(&config).unwrap();

        store.set_token(&Secret::new("t".into()), true).unwrap();
        assert!(dir.path().join("durable/credentials.json").exists());
        assert!(!dir.path().join("session/session.json").exists());

        store.set_token(&Secret::new("t".into()), false).unwrap();
        assert!(!dir.path().join("durable/credentials.json").exists());
        assert!(dir.path().join("session/session.json").exists());
    }
}
