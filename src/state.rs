use std::sync::Arc;

use axum::extract::FromRef;
use tracing::info;

use crate::{
    auth::{AccountService, InMemoryUserStore, PgUserStore, UserStore},
    config::AppConfig,
    contact::ContactService,
    db,
    mailer::{self, LogMailer, Mailer},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: AccountService,
    pub contact: ContactService,
}

impl AppState {
    /// Connects to Postgres, migrates, and wires mail from the config.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await?;
        info!("database ready");

        Self::with_users(config, Arc::new(PgUserStore::new(pool)))
    }

    /// Production wiring around an existing user store. Without SMTP
    /// credentials every contact submission fails with a delivery error.
    pub fn with_users(config: AppConfig, users: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let mailer = mailer::from_config(config.mail.as_ref())?;
        Ok(Self::from_parts(config, users, mailer))
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let accounts = AccountService::new(users, &config.jwt);
        let contact = ContactService::new(mailer, config.admin_email.clone());
        Self {
            config: Arc::new(config),
            accounts,
            contact,
        }
    }

    /// In-memory users and log-only mail; nothing external is touched.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::from_parts(config, Arc::new(InMemoryUserStore::new()), Arc::new(LogMailer))
    }
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for ContactService {
    fn from_ref(state: &AppState) -> Self {
        state.contact.clone()
    }
}
