use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::role::Role;

/// The signed-in user's profile.
///
/// Serializing a profile yields the persisted snapshot: exactly `id`, `email`,
/// `role`, `full_name`, `is_superuser` and `department`. The session token
/// rides along in memory only.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "WireProfile")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub is_superuser: bool,
    pub department: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<Secret<String>>,
}

/// Profile shape as the API and older snapshots send it.
///
/// The directory serializer only emits `name`; snapshots carry `full_name`.
#[derive(Deserialize)]
struct WireProfile {
    id: i64,
    email: String,
    role: Role,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_superuser: bool,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        Self {
            id: wire.id,
            email: wire.email,
            role: wire.role,
            full_name: wire.full_name.or(wire.name).filter(|n| !n.trim().is_empty()),
            is_superuser: wire.is_superuser,
            department: wire.department,
            token: wire.token.map(Secret::new),
        }
    }
}

impl UserProfile {
    /// Attach a session token, replacing any previous one.
    #[must_use]
    pub fn with_token(mut self, token: Secret<String>) -> Self {
        self.token = Some(token);
        self
    }

    /// Name for display, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

impl std::fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfile")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .field("is_superuser", &self.is_superuser)
            .field("department", &self.department)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingests_directory_name_as_full_name() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Asha Rao",
            "email": "asha@college.edu",
            "role": "Head of Department",
            "department": "CSE"
        }))
        .unwrap();

        assert_eq!(profile.role, Role::Hod);
        assert_eq!(profile.full_name.as_deref(), Some("Asha Rao"));
        assert!(!profile.is_superuser);
        assert!(profile.token.is_none());
    }

    #[test]
    fn full_name_wins_over_name() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "a@b.co",
            "role": "admin",
            "full_name": "Full",
            "name": "Short"
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "Full");
    }

    #[test]
    fn snapshot_has_exactly_six_fields_and_no_token() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 3,
            "email": "s@college.edu",
            "role": "Staff",
            "is_superuser": true,
            "department": "IT",
            "token": "secret-token"
        }))
        .unwrap();
        assert_eq!(profile.token(), Some("secret-token"));

        let value = serde_json::to_value(&profile).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, [
            "department",
            "email",
            "full_name",
            "id",
            "is_superuser",
            "role"
        ]);
        assert_eq!(obj["role"], "staff");
    }

    #[test]
    fn debug_redacts_token() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 3, "email": "s@c.edu", "role": "staff", "token": "abc"
        }))
        .unwrap();
        let dbg = format!("{profile:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("abc"));
    }
}
