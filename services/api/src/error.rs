//! Custom error types for the API service
//!
//! Every core operation returns [`ApiResult`]. The expected outcomes
//! (not found, forbidden, conflict, validation) are produced deliberately by
//! the services; collaborator failures wrap the underlying error, are logged,
//! and reach the client only as a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource absent
    #[error("{0} not found")]
    NotFound(String),

    /// Resource present but owned by someone else
    #[error("Access denied")]
    Forbidden,

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Persistence collaborator failure
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Catalog collaborator failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    /// Stable machine-readable category for the client
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Catalog(CatalogError::NotFound(_)) => "NOT_FOUND",
            ApiError::Database(_) | ApiError::Catalog(_) => "COLLABORATOR_FAILURE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database failure");
                "Internal server error, try again later".to_string()
            }
            ApiError::Catalog(CatalogError::NotFound(id)) => format!("Pokemon {} not found", id),
            ApiError::Catalog(e) => {
                tracing::error!(error = %e, "Catalog failure");
                "Internal server error, try again later".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
