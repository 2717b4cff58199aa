use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Every failure a request can end in. Client-caused variants carry a message
/// meant for display; `Delivery` and `Internal` keep their cause for the logs only.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    Conflict,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("Email sending failed")]
    Delivery(#[source] anyhow::Error),
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing_fields() -> Self {
        Self::Validation("All fields are required".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict | Self::InvalidCredentials | Self::NotFound => {
                StatusCode::BAD_REQUEST
            }
            Self::Delivery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::Validation("Invalid request body".into())
    }
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub msg: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Delivery(e) => error!(error = ?e, "mail delivery failed"),
            Self::Internal(e) => error!(error = ?e, "internal error"),
            _ => {}
        }
        let status = self.status();
        (status, Json(MessageBody { msg: self.to_string() })).into_response()
    }
}
