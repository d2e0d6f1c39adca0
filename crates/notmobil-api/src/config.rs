use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// An account allowed to log in.
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub users: Vec<UserAccount>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("users", &self.users)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "NOTMOBIL_API_BIND_ADDR", "127.0.0.1:8080");

        let jwt_secret = required_trimmed(&lookup, "NOTMOBIL_JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "NOTMOBIL_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        let access_ttl_secs = parse_secs(
            &lookup,
            "NOTMOBIL_ACCESS_TOKEN_TTL_SECS",
            "3600",
            60..=86_400,
        )?;
        let refresh_ttl_secs = parse_secs(
            &lookup,
            "NOTMOBIL_REFRESH_TOKEN_TTL_SECS",
            "86400",
            300..=2_592_000,
        )?;
        if refresh_ttl_secs < access_ttl_secs {
            return Err(ConfigError::Invalid(
                "NOTMOBIL_REFRESH_TOKEN_TTL_SECS must not be shorter than the access token TTL"
                    .to_string(),
            ));
        }

        let seed_user = UserAccount {
            id: value_or_default(&lookup, "NOTMOBIL_SEED_USER_ID", "user1"),
            email: value_or_default(&lookup, "NOTMOBIL_SEED_USER_EMAIL", "test@test.com"),
            password: value_or_default(&lookup, "NOTMOBIL_SEED_USER_PASSWORD", "123456"),
            name: Some(value_or_default(
                &lookup,
                "NOTMOBIL_SEED_USER_NAME",
                "Test User",
            )),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            access_token_ttl: Duration::from_secs(access_ttl_secs),
            refresh_token_ttl: Duration::from_secs(refresh_ttl_secs),
            users: vec![seed_user],
        })
    }

    /// Account matching both email and password
    pub fn find_user(&self, email: &str, password: &str) -> Option<&UserAccount> {
        self.users
            .iter()
            .find(|user| user.email == email && user.password == password)
    }
}

fn parse_secs(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
    range: std::ops::RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    let invalid = || {
        ConfigError::Invalid(format!(
            "{name} must be an integer in [{}, {}]",
            range.start(),
            range.end()
        ))
    };
    let secs = value_or_default(lookup, name, default)
        .parse::<u64>()
        .map_err(|_| invalid())?;
    if !range.contains(&secs) {
        return Err(invalid());
    }
    Ok(secs)
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(map: &HashMap<&str, &str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_requires_jwt_secret() {
        let err = config_from(&HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("NOTMOBIL_JWT_SECRET"));

        let short = HashMap::from([("NOTMOBIL_JWT_SECRET", "short")]);
        assert!(config_from(&short).is_err());
    }

    #[test]
    fn config_defaults_seed_user_and_ttls() {
        let map = HashMap::from([("NOTMOBIL_JWT_SECRET", "0123456789abcdef0123")]);
        let config = config_from(&map).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.access_token_ttl, Duration::from_secs(3_600));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.find_user("test@test.com", "123456").unwrap().id, "user1");
        assert!(config.find_user("test@test.com", "wrong").is_none());
    }

    #[test]
    fn config_rejects_out_of_range_ttls() {
        let map = HashMap::from([
            ("NOTMOBIL_JWT_SECRET", "0123456789abcdef0123"),
            ("NOTMOBIL_ACCESS_TOKEN_TTL_SECS", "10"),
        ]);
        assert!(config_from(&map).is_err());

        let map = HashMap::from([
            ("NOTMOBIL_JWT_SECRET", "0123456789abcdef0123"),
            ("NOTMOBIL_ACCESS_TOKEN_TTL_SECS", "7200"),
            ("NOTMOBIL_REFRESH_TOKEN_TTL_SECS", "3600"),
        ]);
        assert!(config_from(&map).is_err());
    }

    #[test]
    fn config_redacts_sensitive_debug_fields() {
        let map = HashMap::from([
            ("NOTMOBIL_JWT_SECRET", "sensitive-signing-secret"),
            ("NOTMOBIL_SEED_USER_PASSWORD", "sensitive-password"),
        ]);
        let config = config_from(&map).unwrap();

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sensitive-signing-secret"));
        assert!(!debug_output.contains("sensitive-password"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
