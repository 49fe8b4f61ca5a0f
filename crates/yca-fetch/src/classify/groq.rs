use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ChatBackend;
use crate::{config::LlmConfig, errors::FetchError, http_client};

/// Groq's OpenAI-compatible chat completion API.
pub struct Groq {
    http: reqwest::Client,
    cfg: LlmConfig,
}

impl Groq {
    pub fn new(cfg: LlmConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: http_client(cfg.timeout_ms)?,
            cfg,
        })
    }
}

#[async_trait]
impl ChatBackend for Groq {
    fn service(&self) -> &'static str {
        "groq"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, FetchError> {
        let request = ChatRequest {
            model: &self.cfg.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
            response_format: json!({ "type": "json_object" }),
        };

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.cfg.endpoint.trim_end_matches('/')
            ))
            .bearer_auth(&self.cfg.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        first_choice(&body)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    response_format: serde_json::Value,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_choice(body: &str) -> Result<String, FetchError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| FetchError::InvalidResponse("completion has no content".to_string()))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}
