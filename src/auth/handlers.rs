use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, ForgotRequest, LoginRequest, RegisterRequest},
        services::AccountService,
    },
    error::{AppError, MessageBody},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot", post(forgot))
}

#[instrument(skip_all)]
pub async fn register(
    State(accounts): State<AccountService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;
    let session = accounts
        .register(
            &payload.full_name,
            &payload.email,
            &payload.country,
            &payload.password,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            msg: "Registration successful".into(),
            token: session.token,
            user_id: session.user_id,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(accounts): State<AccountService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let session = accounts
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        msg: "Login successful".into(),
        token: session.token,
        user_id: session.user_id,
    }))
}

#[instrument(skip_all)]
pub async fn forgot(
    State(accounts): State<AccountService>,
    payload: Result<Json<ForgotRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let Json(payload) = payload?;
    accounts
        .reset_password(&payload.email, &payload.new_password)
        .await?;

    Ok(Json(MessageBody {
        msg: "Password reset successful".into(),
    }))
}
