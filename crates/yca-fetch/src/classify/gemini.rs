use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use super::ChatBackend;
use crate::{
    config::{GOOGLE_API_KEY_HEADER, LlmConfig},
    errors::FetchError,
    http_client,
    youtube::api_error_message,
};

/// Google Gemini `generateContent` API.
pub struct Gemini {
    http: reqwest::Client,
    cfg: LlmConfig,
}

impl Gemini {
    pub fn new(cfg: LlmConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: http_client(cfg.timeout_ms)?,
            cfg,
        })
    }

    fn url(&self) -> Result<Url, FetchError> {
        Ok(Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.cfg.endpoint.trim_end_matches('/'),
            self.cfg.model
        ))?)
    }
}

#[async_trait]
impl ChatBackend for Gemini {
    fn service(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, FetchError> {
        let request = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": user }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.2
            }
        });

        let response = self
            .http
            .post(self.url()?)
            .header(GOOGLE_API_KEY_HEADER, &self.cfg.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        candidate_text(&body)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

fn candidate_text(body: &str) -> Result<String, FetchError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(FetchError::InvalidResponse(
            "gemini returned no candidate text".to_string(),
        ));
    }
    Ok(text)
}
