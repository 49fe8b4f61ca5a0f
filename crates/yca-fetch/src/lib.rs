//! HTTP collaborators of the analyzer: the YouTube comment source and the
//! LLM-backed comment classifiers.

mod config;
pub use config::{LlmConfig, YoutubeConfig};

mod errors;
pub use errors::FetchError;

mod youtube;
pub use youtube::YoutubeClient;

mod classify;
pub use classify::{ChatBackend, Gemini, GeminiClassifier, Groq, GroqClassifier, LlmClassifier};

fn http_client(timeout_ms: u64) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(concat!("yca/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_millis(timeout_ms))
        .build()
        .map_err(FetchError::from)
}
