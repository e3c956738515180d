//! Error types shared across Lenscast crates.

use std::path::PathBuf;

/// Top-level error type for Lenscast operations.
#[derive(Debug, thiserror::Error)]
pub enum LenscastError {
    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using LenscastError.
pub type LenscastResult<T> = Result<T, LenscastError>;

impl LenscastError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    /// Whether this error means the OS refused access rather than failed.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } => true,
            Self::Io(err) => err.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_error_is_classified() {
        let err: LenscastError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(err.is_permission_denied());
        assert!(LenscastError::permission_denied("hook").is_permission_denied());
        assert!(!LenscastError::render("boom").is_permission_denied());
    }

    #[test]
    fn test_display_includes_message() {
        let err = LenscastError::input("hook unavailable");
        assert_eq!(err.to_string(), "Input error: hook unavailable");
    }
}
