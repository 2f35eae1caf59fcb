//! Configuration management
//!
//! Layered configuration: JSON file, then environment, then CLI overrides
//! applied by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::common::http::DEFAULT_TIMEOUT_SECS;
use crate::common::{paths, AppError, AppResult};

pub const ENV_TOOLS: &str = "GWORKSPACE_TOOLS";
pub const ENV_TOKEN_PATH: &str = "GWORKSPACE_TOKEN_PATH";
pub const ENV_CLIENT_ID: &str = "GOOGLE_OAUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_OAUTH_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "GOOGLE_OAUTH_REDIRECT_URI";

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/oauth2callback";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tool groups to enable; `None` enables every group.
    #[serde(default)]
    pub enabled_tools: Option<Vec<String>>,
    #[serde(default)]
    pub oauth: Option<GoogleOAuthConfig>,
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    #[serde(default = "default_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enabled_tools: None,
            oauth: None,
            token_path: None,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load from `path` (or the default location) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => paths::config_path()?,
        };

        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read config {:?}: {}", path, e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::config(format!("Failed to parse config JSON {:?}: {}", path, e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TOOLS) {
            let tools = parse_tool_list(&raw);
            if tools.is_empty() {
                warn!("{} is set but names no tools; ignoring it", ENV_TOOLS);
            } else {
                self.enabled_tools = Some(tools);
            }
        }

        if let Some(path) = lookup(ENV_TOKEN_PATH) {
            self.token_path = Some(PathBuf::from(path));
        }

        let client_id = lookup(ENV_CLIENT_ID);
        let client_secret = lookup(ENV_CLIENT_SECRET);
        let redirect_uri = lookup(ENV_REDIRECT_URI);
        if client_id.is_some() || client_secret.is_some() || redirect_uri.is_some() {
            let oauth = self.oauth.get_or_insert_with(GoogleOAuthConfig::default);
            if let Some(id) = client_id {
                oauth.client_id = id;
            }
            if let Some(secret) = client_secret {
                oauth.client_secret = secret;
            }
            if let Some(uri) = redirect_uri {
                oauth.redirect_uri = uri;
            }
        }
    }

    /// Token file location, falling back to `~/.gworkspace/token.json`.
    pub fn token_path(&self) -> AppResult<PathBuf> {
        match &self.token_path {
            Some(p) => Ok(p.clone()),
            None => paths::token_path(),
        }
    }

    /// OAuth client settings, required for building an authorization URL.
    pub fn oauth(&self) -> AppResult<&GoogleOAuthConfig> {
        self.oauth
            .as_ref()
            .filter(|o| !o.client_id.is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "Google OAuth client is not configured; set {} or oauth.client_id",
                    ENV_CLIENT_ID
                ))
            })
    }
}

/// Split a comma/whitespace separated tool list, dropping empty entries.
pub fn parse_tool_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_tool_list() {
        assert_eq!(parse_tool_list("gmail, drive,,tasks"), vec!["gmail", "drive", "tasks"]);
        assert_eq!(parse_tool_list("contacts calendar"), vec!["contacts", "calendar"]);
        assert!(parse_tool_list("  ").is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(&dir.path().join("absent.json")).unwrap();
        assert!(config.enabled_tools.is_none());
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"enabled_tools": ["gmail"], "oauth": {"client_id": "file-id"}}"#,
        )
        .unwrap();

        let mut config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.enabled_tools.as_deref(), Some(&["gmail".to_string()][..]));
        assert_eq!(config.oauth().unwrap().redirect_uri, DEFAULT_REDIRECT_URI);

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_TOOLS, "drive,tasks"),
            (ENV_CLIENT_SECRET, "env-secret"),
        ]);
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.enabled_tools,
            Some(vec!["drive".to_string(), "tasks".to_string()])
        );
        let oauth = config.oauth().unwrap();
        assert_eq!(oauth.client_id, "file-id");
        assert_eq!(oauth.client_secret, "env-secret");
    }

    #[test]
    fn test_blank_tools_env_keeps_selection() {
        let mut config = AppConfig {
            enabled_tools: Some(vec!["gmail".to_string()]),
            ..AppConfig::default()
        };
        config.apply_env(|k| (k == ENV_TOOLS).then(|| " , ".to_string()));
        assert_eq!(config.enabled_tools, Some(vec!["gmail".to_string()]));

        let mut unset = AppConfig::default();
        unset.apply_env(|k| (k == ENV_TOOLS).then(String::new));
        assert!(unset.enabled_tools.is_none());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::Config);
    }

    #[test]
    fn test_oauth_requires_client_id() {
        let config = AppConfig::default();
        assert!(config.oauth().is_err());
    }
}
