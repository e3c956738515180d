//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LenscastError, LenscastResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Capture cadence defaults.
    pub capture: CaptureDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default cadence parameters for a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Video frame rate delivered by the capture collaborator.
    pub fps: u32,

    /// Pointer sampling rate (Hz).
    pub pointer_sample_rate_hz: u32,

    /// Optional path to a render configuration JSON document.
    pub render_config: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lenscast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Include thread names; useful to tell the input and frame contexts apart.
    pub thread_names: bool,
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            fps: 60,
            pointer_sample_rate_hz: 60,
            render_config: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            thread_names: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> LenscastResult<Self> {
        if !path.exists() {
            return Err(LenscastError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> LenscastResult<()> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }

    fn validate(&self) -> LenscastResult<()> {
        if self.capture.fps == 0 || self.capture.fps > 240 {
            return Err(LenscastError::config(format!(
                "fps must be in 1..=240, got {}",
                self.capture.fps
            )));
        }
        if self.capture.pointer_sample_rate_hz == 0 {
            return Err(LenscastError::config("pointer_sample_rate_hz must be > 0"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lenscast").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"capture":{"fps":30}}"#).unwrap();
        assert_eq!(config.capture.fps, 30);
        assert_eq!(config.capture.pointer_sample_rate_hz, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_zero_fps() {
        let dir = std::env::temp_dir().join(format!("lenscast-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"capture":{"fps":0}}"#).unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, LenscastError::Config { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AppConfig::load_from(Path::new("/nonexistent/lenscast.json")).unwrap_err();
        assert!(matches!(err, LenscastError::FileNotFound { .. }));
    }
}
