//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/quotebook/config.toml)
//! 3. Environment variables (QUOTEBOOK_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable prefix
const ENV_PREFIX: &str = "QUOTEBOOK";

/// Remote endpoint quotes are synced from and posted to
pub const DEFAULT_SYNC_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Seconds between periodic syncs
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Seconds a status message stays visible
pub const DEFAULT_STATUS_TTL_SECS: u64 = 5;

/// Number of remote records kept per sync
pub const DEFAULT_FETCH_LIMIT: usize = 5;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Remote endpoint URL
    #[serde(default = "default_sync_url")]
    pub sync_url: Option<String>,

    /// Whether sync (periodic fetch and post-on-add) is enabled
    #[serde(default = "default_true")]
    pub sync_enabled: bool,

    /// Seconds between periodic syncs
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Seconds a transient status message stays visible
    #[serde(default = "default_status_ttl")]
    pub status_ttl_secs: u64,

    /// Number of remote records kept per sync
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Log file path (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sync_url: default_sync_url(),
            sync_enabled: true,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            status_ttl_secs: DEFAULT_STATUS_TTL_SECS,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (QUOTEBOOK_DATA_DIR, QUOTEBOOK_SYNC_URL, ...)
    /// 2. Config file (~/.config/quotebook/config.toml or QUOTEBOOK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.normalize();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.normalize();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty string disables the remote endpoint
        if let Ok(val) = std::env::var(format!("{}_SYNC_URL", ENV_PREFIX)) {
            self.sync_url = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_ENABLED", ENV_PREFIX)) {
            self.sync_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_INTERVAL", ENV_PREFIX)) {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => self.sync_interval_secs = secs,
                _ => warn!("Ignoring {}_SYNC_INTERVAL={:?}", ENV_PREFIX, val),
            }
        }
    }

    /// Replace values a running session cannot use
    fn normalize(&mut self) {
        if self.sync_interval_secs == 0 {
            warn!(
                "sync_interval_secs = 0 is not allowed, using {}",
                DEFAULT_SYNC_INTERVAL_SECS
            );
            self.sync_interval_secs = DEFAULT_SYNC_INTERVAL_SECS;
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with QUOTEBOOK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotebook")
            .join("config.toml")
    }

    /// Get the path to the durable SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("quotebook.db")
    }

    /// Whether the sync engine has somewhere to talk to
    pub fn is_sync_active(&self) -> bool {
        self.sync_enabled && self.sync_url.is_some()
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotebook")
}

fn default_sync_url() -> Option<String> {
    Some(DEFAULT_SYNC_URL.to_string())
}

fn default_true() -> bool {
    true
}

fn default_sync_interval() -> u64 {
    DEFAULT_SYNC_INTERVAL_SECS
}

fn default_status_ttl() -> u64 {
    DEFAULT_STATUS_TTL_SECS
}

fn default_fetch_limit() -> usize {
    DEFAULT_FETCH_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "QUOTEBOOK_DATA_DIR",
        "QUOTEBOOK_SYNC_URL",
        "QUOTEBOOK_SYNC_ENABLED",
        "QUOTEBOOK_SYNC_INTERVAL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sync_enabled);
        assert_eq!(config.sync_url.as_deref(), Some(DEFAULT_SYNC_URL));
        assert_eq!(config.sync_interval(), Duration::from_secs(30));
        assert_eq!(config.status_ttl(), Duration::from_secs(5));
        assert_eq!(config.fetch_limit, 5);
        assert!(config.data_dir.ends_with("quotebook"));
        assert!(config.is_sync_active());
    }

    #[test]
    fn test_database_path() {
        let config = Config::default();
        assert!(config.database_path().ends_with("quotebook.db"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_DATA_DIR", "/tmp/quotebook-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/quotebook-test"));
    }

    #[test]
    fn test_env_override_sync_enabled() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_SYNC_ENABLED", "false");
        config.apply_env_overrides();
        assert!(!config.sync_enabled);
        assert!(!config.is_sync_active());

        env::set_var("QUOTEBOOK_SYNC_ENABLED", "1");
        config.apply_env_overrides();
        assert!(config.sync_enabled);
    }

    #[test]
    fn test_env_override_sync_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_SYNC_URL", "http://localhost:3000/posts");
        config.apply_env_overrides();
        assert_eq!(
            config.sync_url,
            Some("http://localhost:3000/posts".to_string())
        );

        // Empty string clears it
        env::set_var("QUOTEBOOK_SYNC_URL", "");
        config.apply_env_overrides();
        assert!(config.sync_url.is_none());
        assert!(!config.is_sync_active());
    }

    #[test]
    fn test_env_override_sync_interval_ignores_garbage() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "soon");
        config.apply_env_overrides();
        assert_eq!(config.sync_interval_secs, DEFAULT_SYNC_INTERVAL_SECS);

        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "10");
        config.apply_env_overrides();
        assert_eq!(config.sync_interval_secs, 10);

        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "0");
        config.apply_env_overrides();
        assert_eq!(config.sync_interval_secs, 10);
    }

    #[test]
    fn test_zero_sync_interval_falls_back_to_default() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str("sync_interval_secs = 0").unwrap();
        assert_eq!(config.sync_interval(), Duration::from_secs(30));

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\nsync_interval_secs = 0\n", data_dir),
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.sync_interval_secs, DEFAULT_SYNC_INTERVAL_SECS);
        assert!(!config.sync_interval().is_zero());
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            sync_enabled = false
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert!(!config.sync_enabled);
        assert_eq!(config.sync_url.as_deref(), Some(DEFAULT_SYNC_URL));
        assert_eq!(config.fetch_limit, DEFAULT_FETCH_LIMIT);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            sync_interval_secs: 60,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.sync_interval_secs, 60);
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("QUOTEBOOK_DATA_DIR", temp_dir.path());

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.sync_enabled);
        assert_eq!(config.data_dir, temp_dir.path());
    }
}
