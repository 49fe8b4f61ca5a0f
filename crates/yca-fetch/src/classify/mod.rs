mod gemini;
pub use gemini::Gemini;

mod groq;
pub use groq::Groq;

mod prompt;

use async_trait::async_trait;
use tracing::{debug, instrument};
use yca_core::{CommentClassifier, UpstreamError};
use yca_model::{AnalyzedComment, RawComment};

use crate::{config::LlmConfig, errors::FetchError};

pub type GroqClassifier = LlmClassifier<Groq>;
pub type GeminiClassifier = LlmClassifier<Gemini>;

/// A chat-completion API able to answer a system + user prompt with JSON text.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    fn service(&self) -> &'static str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, FetchError>;
}

/// Classifies comments in batches through an LLM backend.
pub struct LlmClassifier<B> {
    backend: B,
    batch_size: usize,
}

impl<B: ChatBackend> LlmClassifier<B> {
    pub fn with_backend(backend: B, batch_size: usize) -> Self {
        Self {
            backend,
            batch_size: batch_size.max(1),
        }
    }

    async fn classify_batch(
        &self,
        batch: &[RawComment],
    ) -> Result<Vec<AnalyzedComment>, FetchError> {
        let user = prompt::user_message(batch)?;
        let reply = self.backend.complete(prompt::SYSTEM, &user).await?;
        prompt::parse_reply(&reply)
    }
}

impl GroqClassifier {
    pub fn new(cfg: LlmConfig) -> Result<Self, FetchError> {
        let batch_size = cfg.batch_size;
        Ok(Self::with_backend(Groq::new(cfg)?, batch_size))
    }
}

impl GeminiClassifier {
    pub fn new(cfg: LlmConfig) -> Result<Self, FetchError> {
        let batch_size = cfg.batch_size;
        Ok(Self::with_backend(Gemini::new(cfg)?, batch_size))
    }
}

#[async_trait]
impl<B: ChatBackend> CommentClassifier for LlmClassifier<B> {
    fn name(&self) -> &'static str {
        self.backend.service()
    }

    #[instrument(level = "debug", skip_all, fields(service = self.backend.service(), comments = comments.len()))]
    async fn classify(
        &self,
        comments: &[RawComment],
    ) -> Result<Vec<AnalyzedComment>, UpstreamError> {
        let mut out = Vec::with_capacity(comments.len());
        for (n, batch) in comments.chunks(self.batch_size).enumerate() {
            let classified = self
                .classify_batch(batch)
                .await
                .map_err(|e| e.into_upstream(self.backend.service()))?;
            debug!(batch = n, sent = batch.len(), received = classified.len(), "batch classified");
            out.extend(classified);
        }
        Ok(out)
    }
}
