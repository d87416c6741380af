use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    OutOfRange,
    NotPositive,
    UnknownField,
    InvalidEnum,
    NotInFuture,
    InvalidFormat,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 8] = [
        ViolationKind::Missing,
        ViolationKind::WrongType,
        ViolationKind::OutOfRange,
        ViolationKind::NotPositive,
        ViolationKind::UnknownField,
        ViolationKind::InvalidEnum,
        ViolationKind::NotInFuture,
        ViolationKind::InvalidFormat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::WrongType => "wrong_type",
            ViolationKind::OutOfRange => "out_of_range",
            ViolationKind::NotPositive => "not_positive",
            ViolationKind::UnknownField => "unknown_field",
            ViolationKind::InvalidEnum => "invalid_enum",
            ViolationKind::NotInFuture => "not_in_future",
            ViolationKind::InvalidFormat => "invalid_format",
        }
    }
}

/// One violated constraint, addressed by its dotted field path
/// (`pickup.lat`, `agent.vehicle.capacity_kg`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Itemized report of every constraint an input payload violated.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.into(),
                kind,
                message: message.into(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.field == field && violation.kind == kind)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Raised by the derived-metric calculations when the caller passes a
/// parameter outside its domain. Not a data problem: the calling code is wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("invalid argument {name}: {reason} (got {value})")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation failed",
                    "violations": err.violations,
                }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Metric(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
