use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://goweather.herokuapp.com/weather/";

/// Gateway configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// listen_addr = "0.0.0.0:8080"
/// upstream_base_url = "https://goweather.herokuapp.com/weather/"
/// upstream_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Socket address the HTTP listener binds to.
    pub listen_addr: String,

    /// Prefix the raw city name is appended to.
    pub upstream_base_url: String,

    /// Overall timeout for one upstream call. Unset means the client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    /// Load config from the platform config directory, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: GatewayConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-gateway")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_endpoint() {
        let cfg = GatewayConfig::default();

        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.upstream_base_url, "https://goweather.herokuapp.com/weather/");
        assert_eq!(cfg.upstream_timeout(), None);
    }

    #[test]
    fn partial_file_fills_missing_keys_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "upstream_timeout_secs = 7\n").unwrap();

        let cfg = GatewayConfig::load_from(&path).expect("partial config should parse");

        assert_eq!(cfg.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(cfg.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(cfg.upstream_timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = GatewayConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen_addr = [").unwrap();

        let err = GatewayConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = GatewayConfig {
            listen_addr: "127.0.0.1:9090".into(),
            upstream_base_url: "http://localhost:3000/weather/".into(),
            upstream_timeout_secs: Some(3),
        };
        cfg.save_to(&path).expect("save should create parent directories");

        let loaded = GatewayConfig::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }
}
