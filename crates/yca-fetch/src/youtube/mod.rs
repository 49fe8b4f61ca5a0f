use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};
use yca_core::{CommentSource, UpstreamError};
use yca_model::{RawComment, VideoRef};

use crate::{
    config::{GOOGLE_API_KEY_HEADER, YoutubeConfig},
    errors::FetchError,
    http_client,
};

const SERVICE: &str = "youtube";
const PAGE_SIZE: usize = 100;

/// Reads top-level comments through the YouTube Data API v3 `commentThreads` endpoint.
pub struct YoutubeClient {
    http: reqwest::Client,
    cfg: YoutubeConfig,
}

impl YoutubeClient {
    pub fn new(cfg: YoutubeConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: http_client(cfg.timeout_ms)?,
            cfg,
        })
    }

    async fn fetch_all(&self, video_id: &str) -> Result<Vec<RawComment>, FetchError> {
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let want = (self.cfg.max_comments - out.len()).min(PAGE_SIZE);
            let url = page_url(&self.cfg, video_id, want, page_token.as_deref())?;
            let response = self
                .http
                .get(url)
                .header(GOOGLE_API_KEY_HEADER, &self.cfg.api_key)
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

            let page = parse_page(&body)?;
            debug!(video = video_id, items = page.items.len(), "comment page received");
            let next = page.next_page_token.clone();
            out.extend(page.into_comments());

            match next {
                Some(token) if out.len() < self.cfg.max_comments => page_token = Some(token),
                _ => break,
            }
        }

        out.truncate(self.cfg.max_comments);
        Ok(out)
    }
}

#[async_trait]
impl CommentSource for YoutubeClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    #[instrument(level = "debug", skip(self, video), fields(video = video.video_id()))]
    async fn fetch(&self, video: &VideoRef) -> Result<Vec<RawComment>, UpstreamError> {
        self.fetch_all(video.video_id())
            .await
            .map_err(|e| e.into_upstream(SERVICE))
    }
}

fn page_url(
    cfg: &YoutubeConfig,
    video_id: &str,
    max_results: usize,
    page_token: Option<&str>,
) -> Result<Url, FetchError> {
    let max_results = max_results.to_string();
    let mut params = vec![
        ("part", "snippet"),
        ("videoId", video_id),
        ("maxResults", max_results.as_str()),
        ("order", "relevance"),
        ("textFormat", "plainText"),
    ];
    if let Some(token) = page_token {
        params.push(("pageToken", token));
    }
    Ok(Url::parse_with_params(
        &format!("{}/commentThreads", cfg.endpoint.trim_end_matches('/')),
        &params,
    )?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadPage {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<Thread>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Thread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Comment,
}

#[derive(Debug, Deserialize)]
struct Comment {
    id: String,
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    text_original: Option<String>,
    #[serde(default)]
    text_display: String,
}

impl ThreadPage {
    fn into_comments(self) -> impl Iterator<Item = RawComment> {
        self.items.into_iter().map(|t| {
            let c = t.snippet.top_level_comment;
            RawComment {
                id: c.id,
                author: c.snippet.author_display_name,
                text: c.snippet.text_original.unwrap_or(c.snippet.text_display),
            }
        })
    }
}

fn parse_page(body: &str) -> Result<ThreadPage, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Message from a Google API error body, or the raw body if it has another shape.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect())
}
