use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by the color, mesh and rendering core.
///
/// Pure color math never substitutes a guessed value: malformed input is
/// reported through one of these variants and left to the caller to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradientError {
    /// A color string could not be parsed as 3- or 6-digit hex.
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),
    /// A numeric argument is outside the range the operation accepts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A named mode (blend mode, grain type, easing, ...) is not known.
    #[error("unsupported {kind}: `{name}`")]
    UnsupportedMode {
        /// Family of the mode, e.g. `blend mode`.
        kind: &'static str,
        /// The rejected name as supplied by the caller.
        name: String,
    },
    /// Raster encode or decode failed.
    #[error("render failed: {0}")]
    Render(String),
}

impl GradientError {
    pub(crate) fn unsupported(kind: &'static str, name: impl Into<String>) -> Self {
        GradientError::UnsupportedMode {
            kind,
            name: name.into(),
        }
    }
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The gradient core rejected the request.
    #[error(transparent)]
    Gradient(#[from] GradientError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The session changed underneath a long-running operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A background task failed before producing a result.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request names a mode the engine does not support.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Gradient(inner) => match inner {
                GradientError::InvalidColorFormat(_) | GradientError::InvalidParameter(_) => {
                    AppError::BadRequest(inner.to_string())
                }
                GradientError::UnsupportedMode { .. } => AppError::Unsupported(inner.to_string()),
                GradientError::Render(message) => AppError::Internal(message),
            },
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unsupported(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_mode_maps_to_unprocessable() {
        let err: AppError = ServiceError::from(GradientError::unsupported("blend mode", "dodge")).into();
        assert!(matches!(err, AppError::Unsupported(ref msg) if msg.contains("dodge")));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn color_errors_map_to_bad_request() {
        let err: AppError =
            ServiceError::from(GradientError::InvalidColorFormat("#12".into())).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn stale_session_maps_to_conflict() {
        let err: AppError = ServiceError::InvalidState("mesh changed".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn render_errors_map_to_internal() {
        let err: AppError = ServiceError::from(GradientError::Render("png".into())).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
