use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::orders::OrderKind;
use crate::store::RepositoryError;

/// Record-boundary validation failures; these block a write before anything is persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between 0 and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },
    #[error("{field} has an invalid date '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{} orders do not track payments", .kind.label())]
    PaymentsNotTracked { kind: OrderKind },
}

impl ValidationError {
    pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(Self::MissingField(field))
        } else {
            Ok(trimmed.to_string())
        }
    }

    pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, Self> {
        if value < 0.0 {
            Err(Self::Negative { field, value })
        } else {
            Ok(value)
        }
    }

    pub(crate) fn percentage(field: &'static str, value: f64) -> Result<u8, Self> {
        if !(0.0..=100.0).contains(&value) {
            return Err(Self::OutOfRange {
                field,
                value,
                max: 100.0,
            });
        }
        Ok(value.round() as u8)
    }
}

/// Error taxonomy shared by the order, staff and invoice services.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
    #[error("no orders found for {supervisor_name} in season {season}")]
    EmptyCohort {
        supervisor_name: String,
        season: String,
        kind: Option<OrderKind>,
    },
}

impl LedgerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::Persistence(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            LedgerError::Persistence(RepositoryError::Conflict) => StatusCode::CONFLICT,
            LedgerError::Persistence(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LedgerError::EmptyCohort { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            LedgerError::EmptyCohort { .. } => json!({
                "error": self.to_string(),
                "informational": true,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
