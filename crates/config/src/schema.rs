/// Config schema types (api, storage, admin, ui).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskdeskConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub ui: UiConfig,
}

/// REST API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the task API. Defaults to "http://127.0.0.1:8000".
    pub base_url: String,
    /// Per-request timeout in seconds. Defaults to 30.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
        }
    }
}

/// Where credentials live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the durable credential file. Defaults to the config dir.
    pub durable_dir: Option<PathBuf>,
    /// Directory for the session-scoped credential file. Defaults to the
    /// per-login runtime dir.
    pub session_dir: Option<PathBuf>,
}

/// The separately hosted admin interface that `/admin` redirects to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Absolute URL. Defaults to `{api.base_url}/api/admin/`.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows per page in user and task listings. Defaults to 5.
    pub page_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { page_size: 5 }
    }
}

impl TaskdeskConfig {
    /// Admin interface URL, derived from the API base when not configured.
    pub fn admin_url(&self) -> String {
        match &self.admin.url {
            Some(url) => url.clone(),
            None => format!("{}/api/admin/", self.api.base_url.trim_end_matches('/')),
        }
    }
}
