use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
mod repo_types;
pub mod services;

pub use repo::{InMemoryUserStore, PgUserStore, UserStore};
pub use services::{AccountService, Session};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
