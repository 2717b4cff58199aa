use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    contact::{dto::ContactRequest, services::ContactService},
    error::{AppError, MessageBody},
    state::AppState,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(contact))
}

#[instrument(skip_all)]
pub async fn contact(
    State(contact): State<ContactService>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let Json(payload) = payload?;
    contact
        .submit(&payload.name, &payload.email, &payload.query)
        .await?;

    Ok(Json(MessageBody {
        msg: "Message sent successfully to admin and user".into(),
    }))
}
