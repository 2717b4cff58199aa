use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_dummy, verify_password},
        repo::{NewUser, StoreError, UserStore},
    },
    config::JwtConfig,
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims `value` and rejects it if nothing is left.
pub(crate) fn required(value: &str) -> Result<&str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_fields());
    }
    Ok(trimmed)
}

/// A freshly minted bearer token and the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
}

/// Registration, login and password reset over a [`UserStore`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, jwt: &JwtConfig) -> Self {
        Self {
            users,
            keys: JwtKeys::new(jwt),
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Creates the account and signs a first token. Stricter than plain
    /// non-empty checks: the email must also look like `local@domain.tld`.
    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        country: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let full_name = required(full_name)?;
        let email = required(email)?;
        let country = required(country)?;
        required(password)?;

        if !is_valid_email(email) {
            warn!("invalid email");
            return Err(AppError::Validation("Invalid email".into()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::Conflict);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser {
                full_name: full_name.to_string(),
                email: email.to_string(),
                country: country.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => {
                    warn!("email registered concurrently");
                    AppError::Conflict
                }
                StoreError::Other(e) => AppError::Internal(e),
            })?;

        let token = self.keys.sign(user.id)?;
        info!(user_id = %user.id, "user registered");
        Ok(Session {
            token,
            user_id: user.id,
        })
    }

    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = required(email)?;
        required(password)?;

        let Some(user) = self.users.find_by_email(email).await? else {
            verify_dummy(password);
            warn!("login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok(Session {
            token,
            user_id: user.id,
        })
    }

    /// Overwrites the password of whoever owns `email`. No proof of ownership is asked for.
    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        let email = required(email)?;
        required(new_password)?;

        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("reset for unknown email");
            return Err(AppError::NotFound);
        };

        let password_hash = hash_password(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;
        info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
