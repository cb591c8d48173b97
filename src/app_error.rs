use std::fmt;

// Client-side errors; none of them is fatal to a session
#[derive(Debug)]
pub enum AppError {
    // Wrap anyhow errors for everything without a dedicated variant
    Anyhow(anyhow::Error),

    Transport(String),
    Decode(String),
    Status { status: u16, detail: Option<String> },
    NotFound(String),
    Unauthorized,
}

impl AppError {
    /// Server-provided `detail` text, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn sentry_level(&self) -> sentry::Level {
        match self {
            AppError::Transport(_) | AppError::Decode(_) => sentry::Level::Warning,
            AppError::Status { status, .. } if (400..500).contains(status) => sentry::Level::Info,
            AppError::NotFound(_) | AppError::Unauthorized => sentry::Level::Info,
            AppError::Status { .. } | AppError::Anyhow(_) => sentry::Level::Error,
        }
    }

    /// Logs the error and forwards it to sentry (a no-op when sentry is not initialised).
    pub fn report(&self, context: &str) {
        match self.sentry_level() {
            sentry::Level::Error => tracing::error!("{}: {}", context, self),
            sentry::Level::Warning => tracing::warn!("{}: {}", context, self),
            _ => tracing::info!("{}: {}", context, self),
        }
        sentry::capture_message(&format!("{}: {}", context, self), self.sentry_level());
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Anyhow(err) => write!(f, "{}", err),
            AppError::Transport(msg) => write!(f, "Request failed: {}", msg),
            AppError::Decode(msg) => write!(f, "Malformed response: {}", msg),
            AppError::Status {
                status,
                detail: Some(detail),
            } => write!(f, "HTTP {}: {}", status, detail),
            AppError::Status {
                status,
                detail: None,
            } => write!(f, "HTTP {}", status),
            AppError::NotFound(resource) => write!(f, "{} not found", resource),
            AppError::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}
