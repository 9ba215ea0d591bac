use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{debug, warn};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    schema::TaskdeskConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "taskdesk.toml",
    "taskdesk.yaml",
    "taskdesk.yml",
    "taskdesk.json",
];

static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Override the config directory for this process (`--config-dir`).
pub fn set_config_dir(dir: PathBuf) {
    *CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|e| e.into_inner()) = Some(dir);
}

pub fn clear_config_dir() {
    *CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|e| e.into_inner()) = None;
}

/// Returns the config directory.
///
/// Resolution order:
/// 1. programmatic override (`set_config_dir`)
/// 2. `TASKDESK_CONFIG_DIR`
/// 3. `~/.config/taskdesk`
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = CONFIG_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
    {
        return Some(dir);
    }
    if let Ok(dir) = std::env::var("TASKDESK_CONFIG_DIR")
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    directories::ProjectDirs::from("", "", "taskdesk").map(|d| d.config_dir().to_path_buf())
}

/// Per-login directory for session-scoped state.
///
/// Uses `$XDG_RUNTIME_DIR/taskdesk` where the platform provides one (it is
/// emptied when the user's login session ends) and the OS temp dir otherwise.
pub fn runtime_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "taskdesk")
        .and_then(|d| d.runtime_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::temp_dir().join("taskdesk"))
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<TaskdeskConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations, then apply env overrides.
///
/// Search order:
/// 1. `./taskdesk.{toml,yaml,yml,json}` (project-local)
/// 2. `<config_dir>/taskdesk.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `TaskdeskConfig::default()` when nothing is found or the
/// file fails to parse.
pub fn discover_and_load() -> TaskdeskConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                TaskdeskConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            TaskdeskConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Apply `TASKDESK_API_URL` and `TASKDESK_API_TIMEOUT` on top of file values.
pub fn apply_env_overrides(config: &mut TaskdeskConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("TASKDESK_API_URL").filter(|u| !u.is_empty()) {
        debug!(base_url = %url, "api base url overridden from environment");
        config.api.base_url = url;
    }
    if let Some(raw) = lookup("TASKDESK_API_TIMEOUT") {
        match raw.parse::<u64>() {
            Ok(secs) => config.api.timeout_secs = secs,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid TASKDESK_API_TIMEOUT"),
        }
    }
}

/// Find the first config file in standard locations.
pub(crate) fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> Result<TaskdeskConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}
