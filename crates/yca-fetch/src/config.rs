pub const YOUTUBE_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1";
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the key for Google APIs, so it never appears in a url.
pub(crate) const GOOGLE_API_KEY_HEADER: &str = "x-goog-api-key";

pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub api_key: String,
    pub endpoint: String,
    /// Stop paging once this many top-level comments were collected.
    pub max_comments: usize,
    pub timeout_ms: u64,
}

impl YoutubeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: YOUTUBE_ENDPOINT.to_string(),
            max_comments: 100,
            timeout_ms: 15_000,
        }
    }

    pub fn with_max_comments(mut self, max: usize) -> Self {
        self.max_comments = max.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    /// Comments sent per completion request.
    pub batch_size: usize,
    pub timeout_ms: u64,
}

impl LlmConfig {
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: GROQ_ENDPOINT.to_string(),
            model: GROQ_MODEL.to_string(),
            batch_size: 25,
            timeout_ms: 60_000,
        }
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            model: GEMINI_MODEL.to_string(),
            batch_size: 50,
            timeout_ms: 60_000,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
