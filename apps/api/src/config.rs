use anyhow::{bail, Context, Result};

/// Shortest HMAC secret accepted for signing session tokens.
const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    pub app_env: String,
    pub app_base_url: String,
    pub session_ttl_hours: i64,
    pub reset_token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub mail_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let jwt_secret = require("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long");
        }

        let session_ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 168_i64)?;
        if session_ttl_hours <= 0 {
            bail!("SESSION_TTL_HOURS must be positive");
        }
        let reset_token_ttl_minutes = parse_or(&lookup, "RESET_TOKEN_TTL_MINUTES", 60_i64)?;
        if reset_token_ttl_minutes <= 0 {
            bail!("RESET_TOKEN_TTL_MINUTES must be positive");
        }
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            redis_url: require("REDIS_URL")?,
            jwt_secret,
            port: parse_or(&lookup, "PORT", 8080_u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            app_env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
            app_base_url: lookup("APP_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            session_ttl_hours,
            reset_token_ttl_minutes,
            bcrypt_cost,
            mail_webhook_url: lookup("MAIL_WEBHOOK_URL").filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.reset_token_ttl_minutes)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/resume_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            jwt_secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            app_env: "test".to_string(),
            app_base_url: "http://localhost:3000".to_string(),
            session_ttl_hours: 168,
            reset_token_ttl_minutes: 60,
            bcrypt_cost: 4,
            mail_webhook_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/resumes"),
        ("REDIS_URL", "redis://localhost"),
        ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.session_ttl_hours, 168);
        assert_eq!(config.reset_token_ttl_minutes, 60);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.mail_webhook_url.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_required_var_named_in_error() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut pairs = REQUIRED[..2].to_vec();
        pairs.push(("JWT_SECRET", "your-secret-key"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_production_and_base_url_trimmed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "Production"));
        pairs.push(("APP_BASE_URL", "https://resumes.example.com/"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.is_production());
        assert_eq!(config.app_base_url, "https://resumes.example.com");
    }

    #[test]
    fn test_blank_webhook_treated_as_unset() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAIL_WEBHOOK_URL", "  "));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.mail_webhook_url.is_none());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        for (cost, ok) in [("3", false), ("4", true), ("31", true), ("32", false)] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("BCRYPT_COST", cost));
            let result = Config::from_lookup(lookup_from(&pairs));
            assert_eq!(result.is_ok(), ok, "BCRYPT_COST={cost}");
        }
    }

    #[test]
    fn test_non_positive_ttls_rejected() {
        for key in ["SESSION_TTL_HOURS", "RESET_TOKEN_TTL_MINUTES"] {
            for value in ["0", "-5"] {
                let mut pairs = REQUIRED.to_vec();
                pairs.push((key, value));
                let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
                assert!(err.to_string().contains(key), "{key}={value}: {err}");
            }
        }
    }
}
