/// HTTP listener configuration, read from the environment.
use dirview_core::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const ENV_PORT: &str = "PORT";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_APP_PATH: &str = "APP_PATH";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Directory of the static web UI, served under `/app`.
    pub app_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            app_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PORT) {
            config.port = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_PORT,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_BIND_ADDR) {
            config.bind = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_BIND_ADDR,
                value: raw.clone(),
            })?;
        }
        config.app_dir = lookup(ENV_APP_PATH)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:3000".parse().unwrap());
        assert!(config.app_dir.is_none());
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = ServerConfig::from_lookup(|name| match name {
            ENV_PORT => Some("8080".into()),
            ENV_BIND_ADDR => Some("127.0.0.1".into()),
            ENV_APP_PATH => Some("app/build".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.app_dir, Some(PathBuf::from("app/build")));

        let err = ServerConfig::from_lookup(|name| (name == ENV_PORT).then(|| "http".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: ENV_PORT, .. }));
    }
}
