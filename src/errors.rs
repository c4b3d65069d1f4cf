use crate::scoring::ScoringError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The lead broke a validation rule (caller-correctable).
    Validation {
        /// Message for the highest-priority violation.
        message: String,
        /// Every violated rule, in priority order.
        violations: Vec<String>,
    },
    /// The request body could not be read as a lead.
    Rejected {
        /// Status chosen by the body extractor.
        status: StatusCode,
        /// Extractor message.
        message: String,
    },
    /// Resource not found error.
    NotFound(String),
    /// Internal server error. Detail is logged, never returned.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "Validation error: {}", message),
            AppError::Rejected { message, .. } => write!(f, "Invalid request body: {}", message),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Whether the failure is on the server side rather than the caller's.
    pub fn is_internal(&self) -> bool {
        match self {
            AppError::InternalError(_) => true,
            AppError::WithContext { source, .. } => source.is_internal(),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Internal errors are logged in full and reported generically.
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation {
                message,
                violations,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": format!("Validation error: {}", message),
                    "violations": violations,
                }),
            ),
            AppError::Rejected { status, message } => {
                tracing::warn!("Rejected request body: {}", message);
                (status, json!({ "error": message }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                if source.is_internal() {
                    tracing::error!("Error with context: {} -> {}", context, source);
                } else {
                    tracing::debug!("Error with context: {} -> {}", context, source);
                }
                // Delegate to underlying error's response
                return source.into_response();
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScoringError> for AppError {
    /// Validation failures stay client-facing; model failures become opaque
    /// internal errors.
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Validation { first, violations } => AppError::Validation {
                message: first.to_string(),
                violations: violations.iter().map(ToString::to_string).collect(),
            },
            ScoringError::Model(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    /// Converts a body extraction failure into an `AppError`.
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::InferenceError;
    use crate::model::ModelError;
    use crate::validation::ValidationError;

    #[test]
    fn test_validation_maps_to_422() {
        let err: AppError = ScoringError::Validation {
            first: ValidationError::ConsentRequired,
            violations: vec![ValidationError::ConsentRequired],
        }
        .into();

        assert_eq!(err.to_string(), "Validation error: Consent is required");
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_model_error_maps_to_500() {
        let err: AppError = ScoringError::Model(ModelError::Inference(
            InferenceError::NonFiniteFeature(3),
        ))
        .into();

        assert!(matches!(err, AppError::InternalError(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Detail stays in the log; the caller gets a generic message
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn test_context_preserves_status() {
        let result: Result<(), ScoringError> = Err(ScoringError::Validation {
            first: ValidationError::InvalidEmail,
            violations: vec![ValidationError::InvalidEmail],
        });

        let err = result.context("scoring lead").unwrap_err();
        assert_eq!(
            err.to_string(),
            "scoring lead: Validation error: Email address is not valid"
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_is_internal_follows_context_chain() {
        let internal = AppError::InternalError("forest width".to_string());
        assert!(internal.is_internal());

        let wrapped: Result<(), AppError> = Err(internal);
        assert!(wrapped.context("scoring lead").unwrap_err().is_internal());

        assert!(!AppError::NotFound("/x".to_string()).is_internal());
    }

    #[test]
    fn test_lazy_context_only_on_error() {
        let ok: Result<u8, AppError> = Ok(1);
        let value = ok
            .with_context(|| panic!("context must not be built on success"))
            .unwrap();
        assert_eq!(value, 1);
    }
}
