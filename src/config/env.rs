//! Email provider settings read from the environment

use thiserror::Error;

use crate::contact::is_valid_email;

pub const API_KEY_VAR: &str = "RESEND_API_KEY";
pub const FROM_VAR: &str = "CONTACT_FROM_EMAIL";
pub const TO_VAR: &str = "CONTACT_TO_EMAIL";
pub const API_URL_VAR: &str = "RESEND_API_URL";

/// Prefix every provider API key starts with
const API_KEY_PREFIX: &str = "re_";

const DEFAULT_API_URL: &str = "https://api.resend.com";

/// Errors raised while reading the environment configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("{0} must start with 're_'")]
    InvalidApiKey(&'static str),

    #[error("{var} is not a valid email address: {value}")]
    InvalidAddress { var: &'static str, value: String },
}

/// Credentials and addresses for the transactional email provider
#[derive(Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
    pub to: String,
    pub api_url: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl EmailConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let api_key = required(API_KEY_VAR)?;
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Err(ConfigError::InvalidApiKey(API_KEY_VAR));
        }

        let from = required(FROM_VAR)?;
        check_address(FROM_VAR, &from)?;

        let to = required(TO_VAR)?;
        check_address(TO_VAR, &to)?;

        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            from,
            to,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

fn check_address(var: &'static str, value: &str) -> Result<(), ConfigError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidAddress {
            var,
            value: value.to_string(),
        })
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
        move |key| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_KEY_VAR, "re_123456"),
            (FROM_VAR, "site@example.com"),
            (TO_VAR, "me@example.com"),
        ]
    }

    #[test]
    fn test_complete_environment() {
        let config = EmailConfig::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.from, "site@example.com");
        assert_eq!(config.to, "me@example.com");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_missing_key() {
        let vars: Vec<_> = complete()
            .into_iter()
            .filter(|(k, _)| *k != API_KEY_VAR)
            .collect();
        let err = EmailConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_VAR));
    }

    #[test]
    fn test_key_without_prefix() {
        let mut vars = complete();
        vars[0] = (API_KEY_VAR, "sk_live_abc");
        let err = EmailConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidApiKey(API_KEY_VAR));
    }

    #[test]
    fn test_malformed_recipient() {
        let mut vars = complete();
        vars[2] = (TO_VAR, "not-an-address");
        let err = EmailConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { var: TO_VAR, .. }));
    }

    #[test]
    fn test_custom_api_url_and_redacted_debug() {
        let mut vars = complete();
        vars.push((API_URL_VAR, "http://127.0.0.1:9000/"));
        let config = EmailConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert!(!format!("{:?}", config).contains("re_123456"));
    }
}
