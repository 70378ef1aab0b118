//! Error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use saferoute_core::{PipelineError, Superseded, ViewportError};
use saferoute_providers::ProviderError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Viewport(#[from] ViewportError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Superseded(#[from] Superseded),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Viewport(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_viewport"),
            ApiError::Pipeline(_) => (StatusCode::UNPROCESSABLE_ENTITY, "no_route"),
            ApiError::Provider(err) if err.is_not_found() => (StatusCode::NOT_FOUND, "no_route"),
            ApiError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_unavailable"),
            ApiError::Superseded(_) => (StatusCode::CONFLICT, "superseded"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Provider(err) => format!("no route available: {err}"),
            ApiError::Internal(err) => format!("{err:#}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let error = self.message();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", code, error);
        } else {
            tracing::warn!("Request rejected ({}): {}", code, error);
        }
        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
