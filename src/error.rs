use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Student not found")]
    NotFound,

    #[error("a student with roll number {0:?} already exists")]
    DuplicateRollNo(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

/// What the service was doing when an error happened. It decides the
/// failure message and the status used for backend failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Create,
    Fetch,
    List,
    ListGpa,
    Update,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Failed to add student",
            Operation::Fetch => "Error fetching student data",
            Operation::List | Operation::ListGpa => "Failed to fetch students",
            Operation::Update => "Failed to update student",
            Operation::Delete => "Failed to delete student",
        }
    }

    // Existing clients rely on 400 for some read/delete failures.
    fn backend_status(self) -> StatusCode {
        match self {
            Operation::Fetch | Operation::List => StatusCode::INTERNAL_SERVER_ERROR,
            Operation::Create | Operation::ListGpa | Operation::Update | Operation::Delete => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub source: AppError,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.source {
            AppError::MalformedPayload(_) | AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateRollNo(_) => StatusCode::CONFLICT,
            AppError::Database(_) => self.operation.backend_status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.source {
            AppError::NotFound => "Student not found",
            _ => self.operation.failure_message(),
        };
        if let AppError::Database(e) = &self.source {
            error!(operation = ?self.operation, error = %e, "database failure");
        } else {
            warn!(operation = ?self.operation, error = %self.source, "request rejected");
        }
        (
            status,
            Json(json!({ "message": message, "error": self.source.to_string() })),
        )
            .into_response()
    }
}

pub trait During<T> {
    fn during(self, operation: Operation) -> Result<T, ApiError>;
}

impl<T, E: Into<AppError>> During<T> for Result<T, E> {
    fn during(self, operation: Operation) -> Result<T, ApiError> {
        self.map_err(|e| ApiError {
            operation,
            source: e.into(),
        })
    }
}
