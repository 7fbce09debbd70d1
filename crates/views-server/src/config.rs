use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["secret-code", "change-me", "dev-secret-change-me"];

/// Ten years.
const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Option<Duration>,
    pub enforce_ownership: bool,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("VIEWS_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("VIEWS_JWT_SECRET is unset or still a placeholder");
        }

        let port = var("VIEWS_PORT")
            .unwrap_or_else(|| "4500".into())
            .parse()
            .context("VIEWS_PORT must be a port number")?;

        let token_ttl = var("VIEWS_TOKEN_TTL_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("VIEWS_TOKEN_TTL_SECS must be a whole number of seconds")?;
        let token_ttl = match token_ttl {
            Some(0) => bail!("VIEWS_TOKEN_TTL_SECS must be greater than zero"),
            Some(secs) if secs > MAX_TOKEN_TTL_SECS => {
                bail!("VIEWS_TOKEN_TTL_SECS must be at most {}", MAX_TOKEN_TTL_SECS)
            }
            other => other.map(Duration::from_secs),
        };

        let enforce_ownership = var("VIEWS_ENFORCE_OWNERSHIP")
            .map(|v| v.parse::<bool>())
            .transpose()
            .context("VIEWS_ENFORCE_OWNERSHIP must be true or false")?
            .unwrap_or(false);

        let request_timeout = var("VIEWS_REQUEST_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("VIEWS_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            host: var("VIEWS_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_path: var("VIEWS_DATABASE_URL")
                .unwrap_or_else(|| "views.db".into())
                .into(),
            jwt_secret,
            token_ttl,
            enforce_ownership,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_secret() {
        let config = load(&[("VIEWS_JWT_SECRET", "s3cr3t")]).unwrap();
        assert_eq!(config.port, 4500);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_path, PathBuf::from("views.db"));
        assert_eq!(config.token_ttl, None);
        assert!(!config.enforce_ownership);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn secret_is_required_and_not_a_placeholder() {
        assert!(load(&[]).is_err());
        assert!(load(&[("VIEWS_JWT_SECRET", "secret-code")]).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("VIEWS_JWT_SECRET", "s3cr3t"),
            ("VIEWS_PORT", "8080"),
            ("VIEWS_TOKEN_TTL_SECS", "3600"),
            ("VIEWS_ENFORCE_OWNERSHIP", "true"),
            ("VIEWS_DATABASE_URL", ":memory:"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl, Some(Duration::from_secs(3600)));
        assert!(config.enforce_ownership);
        assert_eq!(config.database_path, PathBuf::from(":memory:"));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(load(&[("VIEWS_JWT_SECRET", "s"), ("VIEWS_PORT", "http")]).is_err());
        assert!(load(&[("VIEWS_JWT_SECRET", "s"), ("VIEWS_TOKEN_TTL_SECS", "-1")]).is_err());
    }

    #[test]
    fn token_ttl_must_be_positive_and_bounded() {
        assert!(load(&[("VIEWS_JWT_SECRET", "s"), ("VIEWS_TOKEN_TTL_SECS", "0")]).is_err());

        let max = MAX_TOKEN_TTL_SECS.to_string();
        let config = load(&[("VIEWS_JWT_SECRET", "s"), ("VIEWS_TOKEN_TTL_SECS", &max)]).unwrap();
        assert_eq!(config.token_ttl, Some(Duration::from_secs(MAX_TOKEN_TTL_SECS)));

        let over = u64::MAX.to_string();
        assert!(load(&[("VIEWS_JWT_SECRET", "s"), ("VIEWS_TOKEN_TTL_SECS", &over)]).is_err());
    }
}
