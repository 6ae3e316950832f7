/// Runtime configuration for the crawl cache.
///
/// Values come from the process environment (see [`CacheConfig::from_env`])
/// with serde-friendly defaults so the struct can also be embedded in a
/// larger config file.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default period between full re-crawls: 15 minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Environment variable naming the crawl root.
pub const ENV_ROOT: &str = "FILE_PATH";
pub const ENV_REFRESH_INTERVAL_SECS: &str = "REFRESH_INTERVAL_SECS";
pub const ENV_FOLLOW_SYMLINKS: &str = "FOLLOW_SYMLINKS";
pub const ENV_CRAWL_THREADS: &str = "CRAWL_THREADS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("crawl root does not exist: {0}")]
    RootMissing(PathBuf),

    #[error("crawl root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("refresh interval must be greater than zero")]
    ZeroRefreshInterval,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for crawling and refreshing the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory to crawl.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Period between full re-crawls.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: Duration,

    /// Resolve symlinks instead of skipping them.
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Worker threads used by one crawl.
    #[serde(default = "default_crawl_threads")]
    pub crawl_threads: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_crawl_threads() -> usize {
    num_cpus::get()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            refresh_interval: default_refresh_interval(),
            follow_symlinks: false,
            crawl_threads: default_crawl_threads(),
        }
    }
}

impl CacheConfig {
    /// Config with defaults for everything but the root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup(ENV_ROOT).filter(|v| !v.is_empty()) {
            config.root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_REFRESH_INTERVAL_SECS) {
            let secs: u64 = parse_var(ENV_REFRESH_INTERVAL_SECS, &raw)?;
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_FOLLOW_SYMLINKS) {
            config.follow_symlinks = parse_bool(ENV_FOLLOW_SYMLINKS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CRAWL_THREADS) {
            let threads: usize = parse_var(ENV_CRAWL_THREADS, &raw)?;
            if threads > 0 {
                config.crawl_threads = threads;
            }
        }

        if config.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(config)
    }

    /// Check the root is an existing directory. Run once at start-up; later
    /// crawls tolerate the root disappearing.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ConfigError::RootNotDirectory(self.root.clone())),
            Err(_) => Err(ConfigError::RootMissing(self.root.clone())),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CacheConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert!(!config.follow_symlinks);
        assert!(config.crawl_threads > 0);
    }

    #[test]
    fn test_reads_overrides() {
        let config = CacheConfig::from_lookup(lookup(&[
            (ENV_ROOT, "/srv/files"),
            (ENV_REFRESH_INTERVAL_SECS, "30"),
            (ENV_FOLLOW_SYMLINKS, "yes"),
            (ENV_CRAWL_THREADS, "2"),
        ]))
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/files"));
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert!(config.follow_symlinks);
        assert_eq!(config.crawl_threads, 2);
    }

    #[test]
    fn test_rejects_bad_numbers_and_zero_interval() {
        let err = CacheConfig::from_lookup(lookup(&[(ENV_REFRESH_INTERVAL_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err =
            CacheConfig::from_lookup(lookup(&[(ENV_REFRESH_INTERVAL_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroRefreshInterval));
    }

    #[test]
    fn test_validate_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(CacheConfig::new(tmp.path()).validate().is_ok());

        let missing = CacheConfig::new(tmp.path().join("nope"));
        assert!(matches!(
            missing.validate(),
            Err(ConfigError::RootMissing(_))
        ));

        let file = tmp.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            CacheConfig::new(&file).validate(),
            Err(ConfigError::RootNotDirectory(_))
        ));
    }
}
