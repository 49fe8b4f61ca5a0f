use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid video url: {0}")]
    InvalidVideoUrl(String),
    #[error("unknown task status: '{0}' (valid: queued, running, succeeded, failed)")]
    UnknownStatus(String),
}
