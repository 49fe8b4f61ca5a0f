use serde::{Deserialize, Serialize};
use yca_model::{AnalyzedComment, RawComment};

use crate::errors::FetchError;

const MAX_TEXT_CHARS: usize = 2_000;
const FALLBACK_CATEGORY: &str = "other";

pub const SYSTEM: &str = "You classify YouTube comments. \
For every comment you receive, pick one short lowercase category label \
(for example: praise, question, criticism, suggestion, spam, off-topic, other) \
and give a one-sentence reasoning for it. \
Reply with JSON only, shaped as \
{\"comments\": [{\"id\": \"...\", \"category\": \"...\", \"reasoning\": \"...\"}]}. \
Copy every id exactly as given and do not add comments that were not provided.";

#[derive(Serialize)]
struct PromptComment<'a> {
    id: &'a str,
    text: String,
}

/// JSON array of `{id, text}` objects, one per comment.
pub fn user_message(batch: &[RawComment]) -> Result<String, FetchError> {
    let items: Vec<PromptComment<'_>> = batch
        .iter()
        .map(|c| PromptComment {
            id: &c.id,
            text: c.text.chars().take(MAX_TEXT_CHARS).collect(),
        })
        .collect();
    serde_json::to_string(&items).map_err(|e| FetchError::InvalidResponse(e.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reply {
    Wrapped { comments: Vec<ReplyItem> },
    Bare(Vec<ReplyItem>),
}

#[derive(Deserialize)]
struct ReplyItem {
    id: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    reasoning: String,
}

/// Parse the model's answer; tolerates Markdown code fences and a bare array.
pub fn parse_reply(reply: &str) -> Result<Vec<AnalyzedComment>, FetchError> {
    let body = strip_fences(reply);
    let parsed: Reply = serde_json::from_str(body).map_err(|e| {
        let head: String = body.chars().take(120).collect();
        FetchError::InvalidResponse(format!("classifier reply is not valid json ({e}): {head}"))
    })?;

    let items = match parsed {
        Reply::Wrapped { comments } => comments,
        Reply::Bare(items) => items,
    };
    Ok(items
        .into_iter()
        .map(|i| {
            let category = i.category.trim().to_lowercase();
            AnalyzedComment {
                id: i.id,
                category: if category.is_empty() {
                    FALLBACK_CATEGORY.to_string()
                } else {
                    category
                },
                reasoning: i.reasoning.trim().to_string(),
            }
        })
        .collect())
}

fn strip_fences(s: &str) -> &str {
    let s = s.trim();
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_lists_ids_and_truncated_text() {
        let long = "x".repeat(MAX_TEXT_CHARS + 50);
        let batch = vec![
            RawComment {
                id: "a".into(),
                author: "ann".into(),
                text: "hello".into(),
            },
            RawComment {
                id: "b".into(),
                author: String::new(),
                text: long,
            },
        ];
        let msg = user_message(&batch).unwrap();
        let v: serde_json::Value = serde_json::from_str(&msg).unwrap();

        assert_eq!(v[0]["id"], "a");
        assert_eq!(v[0]["text"], "hello");
        assert!(v[0].get("author").is_none());
        assert_eq!(v[1]["text"].as_str().unwrap().len(), MAX_TEXT_CHARS);
    }

    #[test]
    fn parses_wrapped_reply() {
        let out = parse_reply(
            r#"{"comments":[{"id":"a","category":" Question ","reasoning":" asks how "}]}"#,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![AnalyzedComment {
                id: "a".into(),
                category: "question".into(),
                reasoning: "asks how".into(),
            }]
        );
    }

    #[test]
    fn parses_fenced_bare_array() {
        let out = parse_reply("```json\n[{\"id\":\"a\",\"category\":\"spam\"}]\n```").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, "spam");
        assert!(out[0].reasoning.is_empty());
    }

    #[test]
    fn missing_category_falls_back() {
        let out = parse_reply(r#"{"comments":[{"id":"a"}]}"#).unwrap();
        assert_eq!(out[0].category, FALLBACK_CATEGORY);
    }

    #[test]
    fn prose_is_rejected() {
        assert!(matches!(
            parse_reply("Sure! Here are the categories..."),
            Err(FetchError::InvalidResponse(_))
        ));
    }
}
