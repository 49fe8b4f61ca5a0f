use serde::{Deserialize, Serialize};

use crate::Category;

/// A comment as fetched from the video platform, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    /// Platform comment id.
    pub id: String,
    /// Display name of the author, if the platform exposes it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Plain text body.
    pub text: String,
}

/// One classified comment belonging to a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedComment {
    pub id: String,
    pub category: Category,
    pub reasoning: String,
}
