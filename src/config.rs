use std::fmt;

use anyhow::Context;
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

/// SMTP credentials for outgoing mail. Absent when `EMAIL_USER`/`EMAIL_PASS`
/// are not both set, in which case every contact send fails.
#[derive(Clone, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
}

// Secrets are redacted so a `?config` log line never carries them.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_days", &self.ttl_days)
            .finish()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub mail: Option<MailConfig>,
    pub admin_email: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "cloudsaas".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "cloudsaas-users".into()),
            ttl_days: match get("JWT_TTL_DAYS") {
                Some(v) => v
                    .parse::<i64>()
                    .with_context(|| format!("JWT_TTL_DAYS is not a number: {v}"))?,
                None => 7,
            },
        };

        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a port: {v}"))?,
            None => 5000,
        };

        let mail = match (get("EMAIL_USER"), get("EMAIL_PASS")) {
            (Some(username), Some(password)) => Some(MailConfig {
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".into()),
                username,
                password,
            }),
            _ => None,
        };
        let admin_email = get("ADMIN_EMAIL")
            .or_else(|| mail.as_ref().map(|m| m.username.clone()))
            .unwrap_or_else(|| "admin@localhost".into());

        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            mail,
            admin_email,
        })
    }
}
