use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::json_extractor::ExtractError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Rate limit exceeded. Try again in {retry_after_secs}s.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing OPENAI_API_KEY")]
    MissingCredential,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::MissingCredential => "NO_KEY",
            AppError::Upstream(_) => "OPENAI_ERROR",
            AppError::MalformedOutput(_) => "MALFORMED_OUTPUT",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Transport and upstream failures are worth another attempt; everything
    /// else would fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Upstream(_))
    }

    /// Message safe to hand to clients. Server-side detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::RateLimited { .. } | AppError::MethodNotAllowed => self.to_string(),
            AppError::MissingCredential | AppError::Upstream(_) => {
                "Inference service failed".to_string()
            }
            AppError::MalformedOutput(_) => "Model returned an unusable response".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    fn public_details(&self) -> Option<String> {
        match self {
            AppError::MissingCredential => {
                Some("The inference provider credential is not configured".to_string())
            }
            AppError::MalformedOutput(_) => Some("Please retry the request".to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingCredential
            | AppError::Upstream(_)
            | AppError::MalformedOutput(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header((header::CACHE_CONTROL, "no-store"));

        match self {
            AppError::RateLimited { retry_after_secs } => {
                builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
            }
            AppError::MethodNotAllowed => {
                builder.insert_header((header::ALLOW, "POST"));
            }
            _ => {}
        }

        builder.json(ErrorResponse {
            error: self.public_message(),
            code: self.error_code(),
            details: self.public_details(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// Reports the first failing field's message, in field-name order so the
    /// same input always yields the same message.
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = err.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .find_map(|(_, errors)| {
                errors
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            })
            .unwrap_or_else(|| err.to_string());

        AppError::ValidationError(message)
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::MalformedOutput(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited { retry_after_secs: 3 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Upstream("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MalformedOutput("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = AppError::RateLimited { retry_after_secs: 42 }.error_response();

        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = AppError::MethodNotAllowed.error_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::Upstream("OpenAI error 401: invalid key sk-live-123".into());

        assert_eq!(err.public_message(), "Inference service failed");
        assert!(err.public_details().is_none());
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_only_upstream_errors_are_retryable() {
        assert!(AppError::Upstream("timeout".into()).is_retryable());
        assert!(!AppError::MissingCredential.is_retryable());
        assert!(!AppError::ValidationError("x".into()).is_retryable());
        assert!(!AppError::MalformedOutput("x".into()).is_retryable());
    }
}
