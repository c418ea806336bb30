//! App settings.
//!
//! Stored as a JSON file (default `~/.config/playkit/settings.json`).
//! Missing fields fall back to defaults so older files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Graph API version used when none is configured.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v17.0";

/// Default lifetime of the cached gatekeeper values.
pub const DEFAULT_GATEKEEPER_TTL_SECS: u64 = 3600;

/// Errors from loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config directory not available")]
    NoConfigDir,
}

/// Application-level configuration shared by every SDK component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_id: String,
    pub client_token: String,
    pub display_name: String,
    /// Appended to `fb{app_id}` when several apps share one app ID.
    pub url_scheme_suffix: String,
    /// Optional subdomain prefix for graph hosts (e.g. `beta`).
    pub facebook_domain_part: String,
    pub graph_api_version: String,
    pub auto_log_app_events_enabled: bool,
    pub limit_event_and_data_usage: bool,
    pub gatekeeper_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            client_token: String::new(),
            display_name: String::new(),
            url_scheme_suffix: String::new(),
            facebook_domain_part: String::new(),
            graph_api_version: DEFAULT_GRAPH_API_VERSION.into(),
            auto_log_app_events_enabled: true,
            limit_event_and_data_usage: false,
            gatekeeper_ttl_secs: DEFAULT_GATEKEEPER_TTL_SECS,
        }
    }
}

impl Settings {
    /// Creates default settings for the given app ID.
    pub fn with_app_id(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    /// Loads settings from `path`.
    ///
    /// A missing file yields defaults; an unparsable file is logged and
    /// also yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Settings>(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse settings, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Writes settings to `path` as pretty JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        set_permissions_0600(path);
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Default settings file location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        config_dir()
            .map(|d| d.join("playkit").join("settings.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Applies `PLAYKIT_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("PLAYKIT_APP_ID") {
            self.app_id = v;
        }
        if let Ok(v) = std::env::var("PLAYKIT_CLIENT_TOKEN") {
            self.client_token = v;
        }
        if let Ok(v) = std::env::var("PLAYKIT_GRAPH_API_VERSION") {
            self.graph_api_version = v;
        }
        self
    }

    /// Returns the app ID, failing when it has not been configured.
    pub fn require_app_id(&self) -> Result<&str, ValidationError> {
        let app_id = self.app_id.trim();
        if app_id.is_empty() {
            return Err(ValidationError::required(
                "appID",
                "App ID is not set in settings",
            ));
        }
        Ok(app_id)
    }

    /// Custom URL scheme the platform uses to call back into the app.
    ///
    /// App IDs that would produce an invalid scheme are rejected.
    pub fn url_scheme(&self) -> Result<String, ValidationError> {
        let app_id = self.require_app_id()?;
        let valid = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(app_id) || !valid(&self.url_scheme_suffix) {
            return Err(ValidationError::invalid(
                "appID",
                format!("`{app_id}` cannot be used in a URL scheme"),
            ));
        }
        Ok(format!("fb{app_id}{}", self.url_scheme_suffix))
    }

    /// Whether `scheme`/`host` identify a callback addressed to this app.
    pub fn is_app_callback(&self, scheme: &str, host: Option<&str>, expected_host: &str) -> bool {
        let Ok(app_id) = self.require_app_id() else {
            return false;
        };
        scheme.starts_with(&format!("fb{app_id}")) && host == Some(expected_host)
    }
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

/// Returns the platform-specific config directory.
pub(crate) fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_returns_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.graph_api_version, DEFAULT_GRAPH_API_VERSION);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.json");

        let mut settings = Settings::with_app_id("123456");
        settings.client_token = "client".into();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"app_id":"42"}"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.app_id, "42");
        assert_eq!(loaded.gatekeeper_ttl_secs, DEFAULT_GATEKEEPER_TTL_SECS);
        assert!(loaded.auto_log_app_events_enabled);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn require_app_id_rejects_blank() {
        let err = Settings::default().require_app_id().unwrap_err();
        assert_eq!(err.name(), "appID");
        assert_eq!(err.message(), "App ID is not set in settings");

        let settings = Settings::with_app_id("   ");
        assert!(settings.require_app_id().is_err());
    }

    #[test]
    fn url_scheme_includes_suffix() {
        let mut settings = Settings::with_app_id("123");
        assert_eq!(settings.url_scheme().unwrap(), "fb123");
        settings.url_scheme_suffix = "lite".into();
        assert_eq!(settings.url_scheme().unwrap(), "fb123lite");
    }

    #[test]
    fn url_scheme_rejects_invalid_app_id() {
        let settings = Settings::with_app_id("12 3/");
        let err = settings.url_scheme().unwrap_err();
        assert_eq!(err.name(), "appID");
        assert!(Settings::default().url_scheme().is_err());
    }

    #[test]
    fn app_callback_matching() {
        let settings = Settings::with_app_id("abc123");
        assert!(settings.is_app_callback("fbabc123", Some("gaming"), "gaming"));
        assert!(settings.is_app_callback("fbabc123lite", Some("gaming"), "gaming"));
        assert!(!settings.is_app_callback("fb999", Some("gaming"), "gaming"));
        assert!(!settings.is_app_callback("fbabc123", Some("other"), "gaming"));
        assert!(!settings.is_app_callback("fbabc123", None, "gaming"));
        assert!(!Settings::default().is_app_callback("fb", Some("gaming"), "gaming"));
    }
}
