use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::radius::Radius;

pub const DEFAULT_IP_API_URL: &str = "http://ip-api.com";
pub const DEFAULT_AVIATIONSTACK_URL: &str = "https://api.aviationstack.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variables holding the aviationstack key, in priority order
const API_KEY_VARS: [&str; 2] = ["AVIATIONSTACK_API_KEY", "REACT_APP_AVIATIONSTACK_KEY"];

/// Optional TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub aviationstack_api_key: Option<String>,
    #[serde(default)]
    pub ip_api_url: Option<String>,
    #[serde(default)]
    pub aviationstack_url: Option<String>,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
    #[serde(default)]
    pub default_radius_km: Option<Radius>,
}

impl ConfigFile {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: ConfigFile =
            toml::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }
}

/// Resolve the config file path.
///
/// Priority:
/// 1. `AEROLOCATE_CONFIG` env var
/// 2. `./aerolocate.toml`, if it exists
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AEROLOCATE_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path.trim()));
    }

    let local = PathBuf::from("./aerolocate.toml");
    local.exists().then_some(local)
}

/// Effective runtime configuration: file, then environment, then CLI overrides
#[derive(Debug, Clone)]
pub struct AppConfig {
    api_key: Option<String>,
    pub ip_api_url: String,
    pub aviationstack_url: String,
    pub http_timeout: Duration,
    pub default_radius: Radius,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            ip_api_url: DEFAULT_IP_API_URL.to_string(),
            aviationstack_url: DEFAULT_AVIATIONSTACK_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            default_radius: Radius::DEFAULT,
        }
    }
}

impl AppConfig {
    /// Load from an explicit file (or the default path) and the process environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path.map(Path::to_path_buf).or_else(config_path);
        let file = match &path {
            Some(path) => {
                debug!(path = ?path, "Loading config file");
                ConfigFile::load(path)?
            }
            None => ConfigFile::default(),
        };
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Merge a config file with environment lookups; environment wins
    pub fn from_sources<F>(file: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |name: &str| env(name).and_then(non_blank);
        let mut config = AppConfig::default();

        let env_key = API_KEY_VARS.iter().find_map(|name| env_value(*name));
        config.api_key = env_key.or_else(|| file.aviationstack_api_key.and_then(non_blank));

        if let Some(url) = env_value("AEROLOCATE_IP_API_URL").or(file.ip_api_url) {
            config.ip_api_url = url;
        }
        if let Some(url) = env_value("AEROLOCATE_AVIATIONSTACK_URL").or(file.aviationstack_url) {
            config.aviationstack_url = url;
        }

        let timeout_secs = match env_value("AEROLOCATE_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid AEROLOCATE_HTTP_TIMEOUT_SECS '{}'", raw))?,
            ),
            None => file.http_timeout_secs,
        };
        if let Some(secs) = timeout_secs {
            config.http_timeout = Duration::from_secs(secs.max(1));
        }

        let radius = match env_value("AEROLOCATE_DEFAULT_RADIUS_KM") {
            Some(raw) => Some(
                raw.parse::<Radius>()
                    .context("Invalid AEROLOCATE_DEFAULT_RADIUS_KM")?,
            ),
            None => file.default_radius_km,
        };
        if let Some(radius) = radius {
            config.default_radius = radius;
        }

        Ok(config)
    }

    /// Apply a key given on the command line; blank keys are ignored
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.and_then(non_blank) {
            self.api_key = Some(key);
        }
        self
    }

    /// The aviationstack key, `None` when missing or blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Shared HTTP client for both providers
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!("aerolocate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")
    }
}

fn non_blank(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(ConfigFile::default(), env_from(&[])).unwrap();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.ip_api_url, DEFAULT_IP_API_URL);
        assert_eq!(config.aviationstack_url, DEFAULT_AVIATIONSTACK_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.default_radius, Radius::DEFAULT);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = ConfigFile {
            aviationstack_api_key: Some("from-file".to_string()),
            ip_api_url: Some("http://file.example".to_string()),
            http_timeout_secs: Some(5),
            default_radius_km: Some(Radius::try_from(250).unwrap()),
            ..Default::default()
        };
        let env = env_from(&[
            ("AVIATIONSTACK_API_KEY", "from-env"),
            ("AEROLOCATE_IP_API_URL", "http://env.example"),
            ("AEROLOCATE_DEFAULT_RADIUS_KM", "500"),
        ]);

        let config = AppConfig::from_sources(file, env).unwrap();
        assert_eq!(config.api_key(), Some("from-env"));
        assert_eq!(config.ip_api_url, "http://env.example");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.default_radius.km(), 500);
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let file = ConfigFile {
            aviationstack_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let config =
            AppConfig::from_sources(file, env_from(&[("AVIATIONSTACK_API_KEY", "")])).unwrap();
        assert_eq!(config.api_key(), None);

        let config = config.with_api_key(Some(" ".to_string()));
        assert_eq!(config.api_key(), None);
        let config = config.with_api_key(Some("cli-key".to_string()));
        assert_eq!(config.api_key(), Some("cli-key"));
    }

    #[test]
    fn test_legacy_key_variable() {
        let env = env_from(&[("REACT_APP_AVIATIONSTACK_KEY", "legacy")]);
        let config = AppConfig::from_sources(ConfigFile::default(), env).unwrap();
        assert_eq!(config.api_key(), Some("legacy"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let env = env_from(&[("AEROLOCATE_DEFAULT_RADIUS_KM", "42")]);
        assert!(AppConfig::from_sources(ConfigFile::default(), env).is_err());

        let env = env_from(&[("AEROLOCATE_HTTP_TIMEOUT_SECS", "soon")]);
        assert!(AppConfig::from_sources(ConfigFile::default(), env).is_err());
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aerolocate.toml");
        std::fs::write(
            &path,
            "aviationstack_api_key = \"abc123\"\n\
             aviationstack_url = \"http://localhost:8080\"\n\
             default_radius_km = 70\n",
        )
        .unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(
            loaded,
            ConfigFile {
                aviationstack_api_key: Some("abc123".to_string()),
                aviationstack_url: Some("http://localhost:8080".to_string()),
                default_radius_km: Some(Radius::try_from(70).unwrap()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_config_file_rejects_unknown_radius() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aerolocate.toml");
        std::fs::write(&path, "default_radius_km = 42\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        // SAFETY: serialized with every other test that touches the environment
        unsafe { std::env::set_var("AEROLOCATE_CONFIG", "/tmp/custom-aerolocate.toml") };
        assert_eq!(
            config_path(),
            Some(PathBuf::from("/tmp/custom-aerolocate.toml"))
        );
        unsafe { std::env::remove_var("AEROLOCATE_CONFIG") };
    }

    #[test]
    #[serial]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explicit.toml");
        std::fs::write(&path, "http_timeout_secs = 12\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(12));
    }
}
