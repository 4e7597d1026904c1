//! Configuration loading for the admin console.
//!
//! The file is optional. Without `--config` or `REDIVER_ADMIN_CONFIG` the
//! built-in defaults apply; `REDIVER_ADMIN_API_URL` always wins for the base URL.

use rediver_client::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "REDIVER_ADMIN_CONFIG";
pub const API_URL_ENV: &str = "REDIVER_ADMIN_API_URL";
pub const DEFAULT_THEME: &str = "console";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub credential_path: PathBuf,
    pub log_path: PathBuf,
    pub export_dir: PathBuf,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        let state_dir = default_state_dir();
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            credential_path: state_dir.join("credentials.json"),
            log_path: state_dir.join("rediver-admin.log"),
            export_dir: PathBuf::from("."),
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let api_url = std::env::var(API_URL_ENV).ok();
        Self::resolve(path.as_deref(), api_url)
    }

    /// Read `path` when given, fall back to defaults otherwise, then apply the
    /// base-URL override and validate.
    pub fn resolve(path: Option<&Path>, api_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.credential_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credential_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export_dir",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.theme.name.trim().eq_ignore_ascii_case(DEFAULT_THEME) {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: format!("only '{DEFAULT_THEME}' is supported"),
            });
        }
        Ok(())
    }
}

fn default_state_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("rediver-admin"))
        .unwrap_or_else(|| PathBuf::from(".rediver-admin"))
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TuiConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TuiConfig::from_toml(
            r#"
            api_base_url = "https://admin.rediver.example"
            [theme]
            name = "console"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://admin.rediver.example");
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TuiConfig::from_toml("grpc_endpoint = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_url_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.toml");
        std::fs::write(&path, "api_base_url = \"http://file.example\"\n").unwrap();

        let config =
            TuiConfig::resolve(Some(&path), Some("https://env.example".to_string())).unwrap();
        assert_eq!(config.api_base_url, "https://env.example");
    }

    #[test]
    fn test_blank_env_url_ignored() {
        let config = TuiConfig::resolve(None, Some("  ".to_string())).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TuiConfig::resolve(Some(Path::new("/nonexistent/admin.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = TuiConfig {
            api_base_url: "ftp://admin.example".to_string(),
            ..TuiConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "api_base_url", .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let config = TuiConfig {
            theme: ThemeConfig {
                name: "synthwave".to_string(),
            },
            ..TuiConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
