use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::clients::nutrition::NutritionError;
use crate::clients::translate::TranslateError;

/// Error taxonomy surfaced by the request handlers.
///
/// `NotFound` and `Forbidden` carry a specific status so clients can
/// distinguish them; external-dependency failures and storage errors
/// are logged in full but surfaced with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("you do not own this recipe")]
    Forbidden,

    #[error("translation service unavailable")]
    TranslationUnavailable(#[source] TranslateError),

    #[error("nutrition service unavailable")]
    NutritionUnavailable(#[source] NutritionError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TranslateError> for ApiError {
    fn from(e: TranslateError) -> Self {
        ApiError::TranslationUnavailable(e)
    }
}

impl From<NutritionError> for ApiError {
    fn from(e: NutritionError) -> Self {
        ApiError::NutritionUnavailable(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e).context("database error"))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::TranslationUnavailable(_) | ApiError::NutritionUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            // never leak internal error details to the client
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::TranslationUnavailable(e) => {
                error!(error = %e, "translation service failed")
            }
            ApiError::NutritionUnavailable(e) => {
                error!(error = %e, "nutrition service failed")
            }
            ApiError::Internal(e) => error!(error = ?e, "request failed"),
            _ => {}
        }
        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}
