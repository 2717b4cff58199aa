use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod services;

pub use services::ContactService;

pub fn router() -> Router<AppState> {
    handlers::contact_routes()
}
