//! Service Configuration
//!
//! Read from the TOML file named by `FORUMS_CONFIG` (default `config.toml`).
//! `DATABASE_URL` and `FORUMS_SECRET` in the environment take precedence over
//! the file.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::Context;
use auth::LoginConfig;
use secrecy::SecretString;
use serde::Deserialize;

pub const CONFIG_PATH_VAR: &str = "FORUMS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_ip")]
    pub listen_ip: IpAddr,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Without one, accounts live in memory
    #[serde(default)]
    pub database_url: Option<String>,
    pub login: LoginConfig,
}

fn default_listen_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_listen_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load from disk, apply environment overrides and validate
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        tracing::info!(path = %path, "Loading configuration");

        let mut config = Self::from_path(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.login.validate()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        if contents.trim().is_empty() {
            anyhow::bail!("configuration is empty");
        }
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(secret) = get("FORUMS_SECRET").filter(|v| !v.is_empty()) {
            self.login.secret = SecretString::from(secret);
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_ip, self.listen_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const MINIMAL: &str = r#"
        [login]
        secret = "0123456789abcdef0123456789abcdef"
    "#;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:8080".parse().unwrap());
        assert!(config.database_url.is_none());
        assert_eq!(config.login.cookie_name, "forums_session");
        assert!(config.login.validate().is_ok());
    }

    #[test]
    fn test_full_file() {
        let config = AppConfig::from_toml(
            r#"
            listen_ip = "0.0.0.0"
            listen_port = 3000
            database_url = "postgres://localhost/forums"

            [login]
            secret = "0123456789abcdef0123456789abcdef"
            cookie_name = "sid"
            cookie_secure = false
            cookie_same_site = "strict"
            login_ttl = 3600
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_addr(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/forums"));
        assert_eq!(config.login.cookie_name, "sid");
        assert!(!config.login.cookie_secure);
        assert_eq!(config.login.login_ttl, 3600);
    }

    #[test]
    fn test_missing_login_section_fails() {
        assert!(AppConfig::from_toml("listen_port = 3000").is_err());
        assert!(AppConfig::from_toml("  \n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_toml(MINIMAL).unwrap();
        config.apply_env(|key| match key {
            "DATABASE_URL" => Some("postgres://db/forums".to_string()),
            "FORUMS_SECRET" => Some("ffffffffffffffffffffffffffffffffffff".to_string()),
            _ => None,
        });

        assert_eq!(config.database_url.as_deref(), Some("postgres://db/forums"));
        assert_eq!(
            config.login.secret.expose_secret(),
            "ffffffffffffffffffffffffffffffffffff"
        );
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut config = AppConfig::from_toml(MINIMAL).unwrap();
        config.apply_env(|_| Some(String::new()));
        assert!(config.database_url.is_none());
        assert_eq!(
            config.login.secret.expose_secret(),
            "0123456789abcdef0123456789abcdef"
        );
    }
}
