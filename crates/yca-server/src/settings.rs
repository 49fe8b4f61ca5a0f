use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use yca_observe::LoggerFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_QUEUE_CAPACITY: usize = 256;
const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_COMMENTS: usize = 100;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// LLM provider used to classify comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Groq,
    Gemini,
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ClassifierKind::Groq),
            "gemini" => Ok(ClassifierKind::Gemini),
            other => Err(format!("unknown classifier '{other}' (valid: groq, gemini)")),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassifierKind::Groq => "groq",
            ClassifierKind::Gemini => "gemini",
        })
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub frontend_url: String,
    /// Validated but unused: tasks are kept in memory.
    pub redis_url: String,
    pub youtube_api_key: String,
    pub groq_api_key: String,
    pub google_api_key: String,

    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_format: LoggerFormat,
    pub workers: usize,
    pub queue_capacity: usize,
    pub job_timeout: Duration,
    pub max_comments: usize,
    pub classifier: ClassifierKind,
    pub groq_model: Option<String>,
    pub gemini_model: Option<String>,
}

/// Environment as read by `config`: keys are lowercased variable names.
#[derive(Debug, Deserialize)]
struct RawSettings {
    frontend_url: Option<String>,
    redis_url: Option<String>,
    youtube_api_key: Option<String>,
    groq_api_key: Option<String>,
    google_api_key: Option<String>,

    bind_addr: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
    workers: Option<String>,
    queue_capacity: Option<String>,
    job_timeout_secs: Option<String>,
    max_comments: Option<String>,
    classifier: Option<String>,
    groq_model: Option<String>,
    gemini_model: Option<String>,
}

impl Settings {
    /// Load `.env` (if present) into the process environment, then read it.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::load(Environment::default())
    }

    pub fn load(env: Environment) -> Result<Self, SettingsError> {
        let raw: RawSettings = Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, SettingsError> {
        let frontend_url = required("FRONTEND_URL", raw.frontend_url)?;
        let url = parse_url("FRONTEND_URL", &frontend_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("FRONTEND_URL", "expected an http or https url"));
        }

        let redis_url = required("REDIS_URL", raw.redis_url)?;
        let url = parse_url("REDIS_URL", &redis_url)?;
        if !matches!(url.scheme(), "redis" | "rediss") {
            return Err(invalid("REDIS_URL", "expected a redis:// or rediss:// url"));
        }

        let job_timeout_secs: u64 =
            parse_or("JOB_TIMEOUT_SECS", raw.job_timeout_secs, DEFAULT_JOB_TIMEOUT_SECS)?;
        if job_timeout_secs == 0 {
            return Err(invalid("JOB_TIMEOUT_SECS", "must be greater than zero"));
        }

        Ok(Self {
            frontend_url,
            redis_url,
            youtube_api_key: required("YOUTUBE_API_KEY", raw.youtube_api_key)?,
            groq_api_key: required("GROQ_API_KEY", raw.groq_api_key)?,
            google_api_key: required("GOOGLE_API_KEY", raw.google_api_key)?,

            bind_addr: parse_or(
                "BIND_ADDR",
                raw.bind_addr,
                DEFAULT_BIND_ADDR.parse().map_err(|e| invalid("BIND_ADDR", e))?,
            )?,
            log_level: optional(raw.log_level).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: parse_or("LOG_FORMAT", raw.log_format, LoggerFormat::Text)?,
            workers: positive("WORKERS", raw.workers, DEFAULT_WORKERS)?,
            queue_capacity: positive("QUEUE_CAPACITY", raw.queue_capacity, DEFAULT_QUEUE_CAPACITY)?,
            job_timeout: Duration::from_secs(job_timeout_secs),
            max_comments: positive("MAX_COMMENTS", raw.max_comments, DEFAULT_MAX_COMMENTS)?,
            classifier: parse_or("CLASSIFIER", raw.classifier, ClassifierKind::default())?,
            groq_model: optional(raw.groq_model),
            gemini_model: optional(raw.gemini_model),
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &'static str, value: Option<String>) -> Result<String, SettingsError> {
    optional(value).ok_or(SettingsError::Missing(key))
}

fn invalid(key: &'static str, message: impl fmt::Display) -> SettingsError {
    SettingsError::Invalid {
        key,
        message: message.to_string(),
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|e| invalid(key, e))
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match optional(value) {
        Some(v) => v.parse().map_err(|e| invalid(key, format!("'{v}': {e}"))),
        None => Ok(default),
    }
}

fn positive(key: &'static str, value: Option<String>, default: usize) -> Result<usize, SettingsError> {
    let n = parse_or(key, value, default)?;
    if n == 0 {
        return Err(invalid(key, "must be greater than zero"));
    }
    Ok(n)
}
