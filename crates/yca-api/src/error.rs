use thiserror::Error;
use yca_core::CoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Client-facing error class; drives both the body `error` field and the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

impl ApiError {
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidRequest(_) => ErrorKind::InvalidInput,
            ApiError::Core(e) => match e {
                CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
                CoreError::NotFound(_) => ErrorKind::NotFound,
                CoreError::QueueClosed => ErrorKind::Unavailable,
                CoreError::InvalidTransition { .. }
                | CoreError::DataMismatch { .. }
                | CoreError::DuplicateComment { .. } => ErrorKind::Internal,
            },
        }
    }

    /// Machine-readable error kind carried in response bodies.
    pub fn kind(&self) -> &'static str {
        self.error_kind().as_str()
    }

    /// Client-facing message; internal details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest(msg) => msg.clone(),
            ApiError::Core(e) => match e {
                CoreError::InvalidInput(inner) => inner.to_string(),
                CoreError::NotFound(id) => format!("task {id} not found"),
                CoreError::QueueClosed => "service is shutting down".to_string(),
                CoreError::InvalidTransition { .. }
                | CoreError::DataMismatch { .. }
                | CoreError::DuplicateComment { .. } => "internal server error".to_string(),
            },
        }
    }
}

#[cfg(feature = "http")]
mod http {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde_json::json;
    use tracing::error;

    use super::{ApiError, ErrorKind};

    impl ErrorKind {
        pub fn status(self) -> StatusCode {
            match self {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl ApiError {
        pub fn status(&self) -> StatusCode {
            self.error_kind().status()
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let kind = self.error_kind();
            if kind == ErrorKind::Internal {
                error!(error = %self, "request failed");
            }
            let status = kind.status();
            let body = json!({
                "error": self.kind(),
                "message": self.message(),
            });
            (status, Json(body)).into_response()
        }
    }
}
