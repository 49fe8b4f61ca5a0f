use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (valid: text, json, journald)")]
    InvalidFormat(String),

    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,

    #[error("a global logger is already installed")]
    AlreadyInitialized,

    #[error("logger setup failed: {0}")]
    InitializationFailed(String),

    #[error("invalid log filter '{directive}': {reason}")]
    InvalidLogLevel { directive: String, reason: String },
}
