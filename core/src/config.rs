//! Client configuration.
//!
//! # Design
//! `Config` is plain data validated once. It derives `Deserialize` so a host
//! can load it from whatever format it already uses; `from_env` covers the
//! common case of credentials in the environment.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.justimmo.at/rest";
pub const SUPPORTED_API_VERSIONS: &[u32] = &[1];

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> u32 {
    1
}

/// Credentials and endpoint of the listing service.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_api_version")]
    api_version: u32,
}

impl Config {
    /// # Errors
    ///
    /// `MissingConfiguration` when a credential is empty.
    pub fn new(username: &str, password: &str) -> Result<Self, ConfigError> {
        let config = Self {
            username: username.to_string(),
            password: password.to_string(),
            base_url: default_base_url(),
            api_version: default_api_version(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Point the client at another host. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// # Errors
    ///
    /// `UnsupportedApiVersion` for versions this client cannot speak.
    pub fn with_api_version(mut self, version: u32) -> Result<Self, ConfigError> {
        self.api_version = version;
        self.validate()?;
        Ok(self)
    }

    /// Read `IMMO_USERNAME`, `IMMO_PASSWORD` and optionally `IMMO_BASE_URL`
    /// and `IMMO_API_VERSION`.
    ///
    /// # Errors
    ///
    /// Same as `validate`; an unparsable version counts as unsupported.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            username: lookup("IMMO_USERNAME").unwrap_or_default(),
            password: lookup("IMMO_PASSWORD").unwrap_or_default(),
            base_url: default_base_url(),
            api_version: default_api_version(),
        };
        if let Some(url) = lookup("IMMO_BASE_URL") {
            config = config.with_base_url(&url);
        }
        if let Some(version) = lookup("IMMO_API_VERSION") {
            config.api_version = version.trim().parse().unwrap_or(0);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check a deserialized configuration.
    ///
    /// # Errors
    ///
    /// `MissingConfiguration` for empty credentials, `UnsupportedApiVersion`
    /// for an unknown version.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::MissingConfiguration("username"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingConfiguration("password"));
        }
        if !SUPPORTED_API_VERSIONS.contains(&self.api_version) {
            return Err(ConfigError::UnsupportedApiVersion(self.api_version));
        }
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Versioned API root, e.g. `https://api.justimmo.at/rest/v1`.
    pub fn url(&self) -> String {
        format!("{}/v{}", self.base_url.trim_end_matches('/'), self.api_version)
    }

    /// Base64 of `username:password` for HTTP Basic auth.
    pub fn credentials(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config() -> Config {
        Config::new("user", "pass").unwrap()
    }

    #[test]
    fn requires_credentials() {
        assert_eq!(
            Config::new("", "pass").unwrap_err(),
            ConfigError::MissingConfiguration("username")
        );
        assert_eq!(
            Config::new("user", "").unwrap_err(),
            ConfigError::MissingConfiguration("password")
        );
    }

    #[test]
    fn has_default_settings() {
        let config = config();
        assert_eq!(config.base_url(), "https://api.justimmo.at/rest");
        assert_eq!(config.api_version(), 1);
    }

    #[test]
    fn encodes_credentials() {
        assert_eq!(config().credentials(), "dXNlcjpwYXNz");
    }

    #[test]
    fn url_includes_version() {
        assert_eq!(config().url(), "https://api.justimmo.at/rest/v1");
        let err = config().with_api_version(2).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedApiVersion(2));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = config().with_base_url("http://localhost:3000/rest/");
        assert_eq!(config.url(), "http://localhost:3000/rest/v1");
    }

    #[test]
    fn debug_hides_password() {
        let printed = format!("{:?}", config());
        assert!(printed.contains("user"));
        assert!(!printed.contains("pass\""));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"username":"user","password":"pass"}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.url(), "https://api.justimmo.at/rest/v1");
    }

    #[test]
    fn deserialized_config_still_needs_validation() {
        let config: Config = serde_json::from_str(r#"{"username":"user"}"#).unwrap();
        assert_eq!(config.validate().unwrap_err(), ConfigError::MissingConfiguration("password"));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("IMMO_USERNAME", "user"),
            ("IMMO_PASSWORD", "pass"),
            ("IMMO_BASE_URL", "http://127.0.0.1:9000/rest/"),
            ("IMMO_API_VERSION", "1"),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.url(), "http://127.0.0.1:9000/rest/v1");
    }

    #[test]
    fn from_lookup_rejects_garbage_version() {
        let vars: HashMap<&str, &str> =
            HashMap::from([
                ("IMMO_USERNAME", "user"),
                ("IMMO_PASSWORD", "pass"),
                ("IMMO_API_VERSION", "v1"),
            ]);
        let err = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedApiVersion(0));
    }
}
