//! Configuration validation.
//!
//! Reports unknown sections and keys, values that fail to deserialize, and
//! semantic problems (unparseable URLs, zero timeouts or page sizes).

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{env_subst::substitute_env, schema::TaskdeskConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "api.base_url"
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.into(),
            message: message.into(),
        });
    }
}

const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("api", &["base_url", "timeout_secs"]),
    ("storage", &["durable_dir", "session_dir"]),
    ("admin", &["url"]),
    ("ui", &["page_size"]),
];

/// Validate the file at `path`, or the discovered config file when `None`.
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = path
        .map(Path::to_path_buf)
        .or_else(crate::loader::find_config_file);

    let Some(actual_path) = config_path else {
        let mut result = ValidationResult::default();
        result.push(Severity::Info, "", "no config file found; using defaults");
        return result;
    };

    let mut result = match std::fs::read_to_string(&actual_path) {
        Ok(raw) => {
            let raw = substitute_env(&raw);
            let ext = actual_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("toml");
            match parse_value(&raw, ext) {
                Ok(value) => validate_value(&value),
                Err(message) => {
                    let mut r = ValidationResult::default();
                    r.push(Severity::Error, "", message);
                    r
                },
            }
        },
        Err(e) => {
            let mut r = ValidationResult::default();
            r.push(
                Severity::Error,
                "",
                format!("failed to read config file: {e}"),
            );
            r
        },
    };
    result.config_path = Some(actual_path);
    result
}

/// Validate a TOML string without touching the file system.
#[must_use]
pub fn validate_toml_str(raw: &str) -> ValidationResult {
    match parse_value(raw, "toml") {
        Ok(value) => validate_value(&value),
        Err(message) => {
            let mut r = ValidationResult::default();
            r.push(Severity::Error, "", message);
            r
        },
    }
}

fn parse_value(raw: &str, ext: &str) -> Result<serde_json::Value, String> {
    match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| format!("TOML syntax error: {e}"))
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str::<serde_json::Value>(raw)
            .map_err(|e| format!("YAML syntax error: {e}")),
        "json" => serde_json::from_str(raw).map_err(|e| format!("JSON syntax error: {e}")),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

fn validate_value(value: &serde_json::Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(root) = value.as_object() {
        for (section, body) in root {
            let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
                result.push(Severity::Warning, section.as_str(), "unknown section");
                continue;
            };
            if let Some(table) = body.as_object() {
                for key in table.keys() {
                    if !keys.contains(&key.as_str()) {
                        result.push(Severity::Warning, format!("{section}.{key}"), "unknown key");
                    }
                }
            }
        }
    }

    match serde_json::from_value::<TaskdeskConfig>(value.clone()) {
        Ok(config) => check_semantics(&config, &mut result),
        Err(e) => result.push(Severity::Error, "", format!("type error: {e}")),
    }
    result
}

fn check_semantics(config: &TaskdeskConfig, result: &mut ValidationResult) {
    match url::Url::parse(&config.api.base_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => result.push(
            Severity::Error,
            "api.base_url",
            format!("unsupported scheme {:?}", url.scheme()),
        ),
        Ok(url) if url.scheme() == "http" && !is_loopback(&url) => result.push(
            Severity::Warning,
            "api.base_url",
            "plain http to a remote host sends bearer tokens unencrypted",
        ),
        Ok(_) => {},
        Err(e) => result.push(Severity::Error, "api.base_url", format!("invalid URL: {e}")),
    }

    if config.api.timeout_secs == 0 {
        result.push(Severity::Error, "api.timeout_secs", "must be greater than 0");
    }
    if config.ui.page_size == 0 {
        result.push(Severity::Error, "ui.page_size", "must be greater than 0");
    }
    if let Some(admin) = &config.admin.url
        && let Err(e) = url::Url::parse(admin)
    {
        result.push(Severity::Error, "admin.url", format!("invalid URL: {e}"));
    }
}

fn is_loopback(url: &url::Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]" | "::1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_clean() {
        let result = validate_toml_str("");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn flags_unknown_keys_and_sections() {
        let result = validate_toml_str("[api]\nbase_ur = \"x\"\n\n[theme]\ndark = true\n");
        let paths: Vec<&str> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"api.base_ur"));
        assert!(paths.contains(&"theme"));
        assert!(!result.has_errors());
    }

    #[test]
    fn flags_bad_values() {
        let result = validate_toml_str(
            "[api]\nbase_url = \"ftp://x\"\ntimeout_secs = 0\n\n[ui]\npage_size = 0\n",
        );
        assert_eq!(result.count(Severity::Error), 3);
    }

    #[test]
    fn warns_on_remote_plain_http() {
        let result = validate_toml_str("[api]\nbase_url = \"http://tasks.example.edu\"\n");
        assert_eq!(result.count(Severity::Warning), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn type_errors_are_errors() {
        let result = validate_toml_str("[api]\ntimeout_secs = \"soon\"\n");
        assert!(result.has_errors());
    }

    #[test]
    fn syntax_errors_are_errors() {
        let result = validate_toml_str("[api\n");
        assert!(result.has_errors());
    }
}
