//! API error type and its HTTP mapping.

use super::dto::{ErrorBody, ErrorDetail};
use crate::checkout::CheckoutError;
use crate::low_stock::LowStockError;
use crate::stock_actor::{LedgerError, StockError};
use crate::transaction_actor::LogError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use thiserror::Error;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidRequest {
        message: String,
        details: Vec<ErrorDetail>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    LowStock(#[from] LowStockError),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let message = self.to_string();
        match self {
            ApiError::InvalidRequest { message, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "InvalidRequest",
                    message,
                    details,
                },
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorBody::new("NotFound", message)),
            ApiError::Checkout(e) => {
                let status =
                    StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, ErrorBody::from(&e))
            }
            ApiError::Ledger(LedgerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, ErrorBody::new("NotFound", message))
            }
            ApiError::Ledger(LedgerError::Stock(StockError::InvalidAmount(_)))
            | ApiError::Ledger(LedgerError::Stock(StockError::Overflow { .. })) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("InvalidRequest", message),
            ),
            ApiError::Log(LogError::InvalidLine(_) | LogError::EmptyBatch) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("InvalidRequest", message),
            ),
            ApiError::Ledger(_) | ApiError::Log(_) | ApiError::LowStock(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("PersistenceError", message),
            ),
        }
    }
}

// Extractor rejections (malformed body, query or path) use the same error body as every
// other bad request instead of axum's plain-text default.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = self.status_and_body();

        // Log system errors
        if status.is_server_error() {
            tracing::error!(code = body.error, message = %body.message, "System error occurred");
        }

        (status, Json(body)).into_response()
    }
}
