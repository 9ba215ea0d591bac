//! Request and response bodies.

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
};

use {
    crate::{ApiError, Result},
    taskdesk_common::{Role, UserProfile},
};

// ── Auth ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Secret<String>,
}

/// Body returned by the login endpoint: `{token, refresh, staff: {role, ...}}`.
///
/// Fields are optional so a malformed reply can be told apart from a
/// transport failure.
#[derive(Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<Secret<String>>,
    #[serde(default)]
    pub refresh: Option<Secret<String>>,
    #[serde(default)]
    pub staff: serde_json::Value,
}

impl LoginResponse {
    pub fn staff_role(&self) -> Option<&str> {
        self.staff
            .get("role")
            .and_then(serde_json::Value::as_str)
            .filter(|r| !r.trim().is_empty())
    }

    /// The `staff` object as a profile carrying `token`.
    pub fn profile(&self, token: Secret<String>) -> Result<UserProfile> {
        let profile: UserProfile = serde_json::from_value(self.staff.clone())?;
        Ok(profile.with_token(token))
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .field("staff", &self.staff)
            .finish()
    }
}

// ── Users ───────────────────────────────────────────────────────────────────

/// A row of the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct UsersEnvelope {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

#[derive(Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<Secret<String>>,
}

impl NewUser {
    /// Faculty accounts cannot sign in and may omit a password; every other
    /// role needs one.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ApiError::validation("Name and email are required"));
        }
        let has_password = self
            .password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty());
        if self.role != Role::Faculty && !has_password {
            return Err(ApiError::validation("Password is required for this role"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct PasswordBody<'a> {
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetReply {
    #[serde(default)]
    pub message: String,
}

// ── Tasks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_task: u64,
    #[serde(default)]
    pub completed_task: u64,
    #[serde(default)]
    pub ongoing_task: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Assignee {
    pub fn label(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: Vec<Assignee>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub department: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "createdBy", deserialize_with = "lenient_string")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub reminder1: Option<String>,
    #[serde(default)]
    pub reminder2: Option<String>,
    #[serde(default)]
    pub follow_comment: Option<String>,
}

impl Task {
    pub fn assignee_labels(&self) -> String {
        self.assignee
            .iter()
            .map(Assignee::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Deserialize)]
pub(crate) struct TasksEnvelope {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// Assignee emails.
    pub assignee: Vec<String>,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder2: Option<String>,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("Title is required"));
        }
        if self.assignee.is_empty() {
            return Err(ApiError::validation("Select at least one assignee"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(default)]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowComment {
    pub id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub task_title: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub performed_by: String,
    #[serde(default)]
    pub performed_by_role: Option<Role>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskHistory {
    #[serde(default)]
    pub activities: Vec<HistoryEntry>,
    #[serde(default)]
    pub follow_comments: Vec<FollowComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub follow_comments: Vec<FollowComment>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

// ── Serde helpers ───────────────────────────────────────────────────────────

fn serialize_secret<S: Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn serialize_option_secret<S: Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Departments arrive either as a list or as a single string.
fn one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Accept a string, a number, or an object with an `email`/`name` field.
fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Object(map) => ["email", "full_name", "name"]
            .iter()
            .find_map(|k| map.get(*k).and_then(serde_json::Value::as_str))
            .map(ToString::to_string),
        _ => None,
    })
}
