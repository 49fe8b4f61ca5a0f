use thiserror::Error;
use yca_core::UpstreamError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    HttpRequest(reqwest::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("api rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// Request urls may carry credentials; keep them out of every message.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::HttpRequest(e.without_url())
    }
}

impl FetchError {
    /// Attribute the failure to `service` for the task's error description.
    pub fn into_upstream(self, service: &'static str) -> UpstreamError {
        match self {
            FetchError::HttpRequest(e) if e.is_timeout() => UpstreamError::Transport {
                service,
                message: "request timed out".to_string(),
            },
            FetchError::HttpRequest(e) => UpstreamError::Transport {
                service,
                message: e.without_url().to_string(),
            },
            FetchError::Url(e) => UpstreamError::Transport {
                service,
                message: e.to_string(),
            },
            FetchError::Rejected { status, message } => UpstreamError::Api {
                service,
                status: Some(status),
                message,
            },
            FetchError::InvalidResponse(message) => UpstreamError::Decode { service, message },
        }
    }
}
