//! Configuration from an optional YAML file and environment variables.
//!
//! ```yaml
//! server:
//!   port: 8787
//!   path: "/.netlify/functions/proxy"
//! upstream:
//!   model: "gpt-4o-mini"
//!   timeout_secs: 60
//! ```
//!
//! **Environment variables** (override the file):
//! - `OPENAI_API_KEY`: bearer token for the completion API (required)
//! - `PORT` / `HOST`: listen address (default: 0.0.0.0:8787)
//! - `FORMULA_PROXY_PATH`: endpoint path (default: /api/formula)
//! - `OPENAI_BASE_URL`: completion API base URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: model identifier (default: gpt-3.5-turbo)
//! - `REQUEST_TIMEOUT_SECS`: upstream request timeout (default: 120)
//!
//! The API key is never read from the file.

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/formula";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug)]
pub struct ProxyConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub api_key: SecretString,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(rename = "path")]
    pub endpoint_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url_trimmed())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: ServerConfig,
    upstream: UpstreamConfig,
}

impl ProxyConfig {
    /// Config with defaults everywhere except the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Load from an optional YAML file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ProxyConfig::load`] with an injected variable lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };
        let FileConfig {
            mut server,
            mut upstream,
        } = file;

        if let Some(host) = env("HOST") {
            server.host = host;
        }
        if let Some(port) = env("PORT") {
            server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {:?}", port))?;
        }
        if let Some(path) = env("FORMULA_PROXY_PATH") {
            server.endpoint_path = path;
        }
        if let Some(url) = env("OPENAI_BASE_URL") {
            upstream.base_url = url;
        }
        if let Some(model) = env("OPENAI_MODEL") {
            upstream.model = model;
        }
        if let Some(secs) = env("REQUEST_TIMEOUT_SECS") {
            upstream.timeout_secs = secs
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {:?}", secs))?;
        }

        let api_key = env("OPENAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("OPENAI_API_KEY must be set");
        }

        let config = Self {
            server,
            upstream,
            api_key: SecretString::from(api_key),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.server.endpoint_path.starts_with('/') {
            bail!(
                "endpoint path must start with '/': {:?}",
                self.server.endpoint_path
            );
        }
        if self.server.endpoint_path == "/health" {
            bail!("endpoint path conflicts with /health");
        }
        if self.api_key.expose_secret().trim().is_empty() {
            bail!("API key is empty");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml_ng::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::load_with(None, env_from(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();

        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.upstream, UpstreamConfig::default());
        assert_eq!(config.upstream.max_tokens, 200);
        assert_eq!(config.upstream.temperature, 0.1);
        assert_eq!(config.listen_addr(), "0.0.0.0:8787");
        assert_eq!(config.api_key.expose_secret(), "sk-test");
    }

    #[test]
    fn test_missing_api_key() {
        let err = ProxyConfig::load_with(None, env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = ProxyConfig::load_with(None, env_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_env_overrides() {
        let config = ProxyConfig::load_with(
            None,
            env_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("PORT", "9000"),
                ("FORMULA_PROXY_PATH", "/.netlify/functions/proxy"),
                ("OPENAI_BASE_URL", "http://localhost:4000/"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
                ("REQUEST_TIMEOUT_SECS", "30"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.endpoint_path, "/.netlify/functions/proxy");
        assert_eq!(
            config.upstream.completions_url(),
            "http://localhost:4000/v1/chat/completions"
        );
        assert_eq!(config.upstream.model, "gpt-4o-mini");
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_port() {
        let err = ProxyConfig::load_with(
            None,
            env_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "http")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_relative_path_rejected() {
        let err = ProxyConfig::load_with(
            None,
            env_from(&[("OPENAI_API_KEY", "sk-test"), ("FORMULA_PROXY_PATH", "formula")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let config = ProxyConfig::new("sk-very-secret");
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
