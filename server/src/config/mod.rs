use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::store::PostInput;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub rate_limit: RateLimitSettings,
    pub seed_posts: Vec<PostInput>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            auth: AuthSettings::default(),
            rate_limit: RateLimitSettings::default(),
            seed_posts: vec![PostInput::new("Pancake", "Lorem Ipsum ...")],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub secret: Option<String>,
    pub token_ttl_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: 600,
        }
    }
}

impl AuthSettings {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_requests: usize,
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 10,
            window_secs: 60,
        }
    }
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SERVER_*`, `AUTH_*` and `RATE_LIMIT_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = parse_var("SERVER_PORT", &port)?;
        }
        if let Some(secret) = lookup("AUTH_SECRET") {
            self.auth.secret = Some(secret);
        }
        if let Some(ttl) = lookup("AUTH_TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = parse_var("AUTH_TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(enabled) = lookup("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = matches!(
                enabled.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(max) = lookup("RATE_LIMIT_MAX_REQUESTS") {
            self.rate_limit.max_requests = parse_var("RATE_LIMIT_MAX_REQUESTS", &max)?;
        }
        if let Some(window) = lookup("RATE_LIMIT_WINDOW_SECS") {
            self.rate_limit.window_secs = parse_var("RATE_LIMIT_WINDOW_SECS", &window)?;
        }
        Ok(())
    }

    pub fn secret_bytes(&self) -> Result<Vec<u8>> {
        self.auth
            .secret
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| {
                ApiError::Config("auth secret is not set (use [auth] secret or AUTH_SECRET)".into())
            })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_valid_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000

[auth]
token_ttl_secs = 120

[rate_limit]
enabled = false

[[seed_posts]]
title = "Pancake"
content = "Lorem Ipsum ..."
        "#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.token_ttl(), Duration::from_secs(120));
        assert!(config.auth.secret.is_none());
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.seed_posts.len(), 1);
        assert_eq!(config.seed_posts[0].title, "Pancake");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.seed_posts.len(), 1);
    }

    #[test]
    fn test_default_seeds_pancake() {
        let store = crate::store::BlogStore::new(AppConfig::default().seed_posts);
        let posts = store.posts().list().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].title, "Pancake");
        assert_eq!(posts[0].content, "Lorem Ipsum ...");
    }

    #[test]
    fn test_empty_seed_list_is_respected() {
        let config = AppConfig::from_toml_str("seed_posts = []").unwrap();
        assert!(config.seed_posts.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let result = AppConfig::from_toml_str("[server\nport = ");
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("SERVER_PORT", "3000"),
            ("AUTH_SECRET", "s3cr3t"),
            ("AUTH_TOKEN_TTL_SECS", "60"),
            ("RATE_LIMIT_ENABLED", "off"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.auth.token_ttl_secs, 60);
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "SERVER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_missing_secret() {
        let config = AppConfig::default();
        assert!(config.secret_bytes().is_err());

        let mut config = AppConfig::default();
        config.auth.secret = Some(String::new());
        assert!(config.secret_bytes().is_err());
    }
}
