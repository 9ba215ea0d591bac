use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}{}", status_suffix(.detail, .message, .error))]
    Status {
        status: u16,
        detail: Option<String>,
        message: Option<String>,
        error: Option<String>,
    },

    #[error("request timed out")]
    Timeout,

    #[error("could not reach server: {0}")]
    Connect(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Rejected locally before anything was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Most specific server-provided text, if any.
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Status {
                detail,
                message,
                error,
                ..
            } => detail.as_deref().or(message.as_deref()).or(error.as_deref()),
            _ => None,
        }
    }

    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(ToString::to_string)
        };
        Self::Status {
            status,
            detail: field("detail"),
            message: field("message"),
            error: field("error"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

fn status_suffix(
    detail: &Option<String>,
    message: &Option<String>,
    error: &Option<String>,
) -> String {
    detail
        .as_ref()
        .or(message.as_ref())
        .or(error.as_ref())
        .map(|s| format!(": {s}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_extracts_server_fields() {
        let err = ApiError::from_status(401, r#"{"error": "Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.summary(), Some("Invalid credentials"));
        assert_eq!(err.to_string(), "HTTP 401: Invalid credentials");
    }

    #[test]
    fn detail_beats_message() {
        let err = ApiError::from_status(403, r#"{"detail": "no", "message": "later"}"#);
        assert_eq!(err.summary(), Some("no"));
    }

    #[test]
    fn non_json_body_has_no_summary() {
        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.summary(), None);
        assert_eq!(err.to_string(), "HTTP 502");
    }
}
