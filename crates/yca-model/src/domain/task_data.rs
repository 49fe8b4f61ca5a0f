use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnalyzedComment, Category, TaskStatus};

/// Payload attached to a task.
///
/// Serialized as a JSON object: `{}` while the task is active,
/// `{"comments": [...], "summary": {...}}` once it succeeded and
/// `{"error": "..."}` once it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskData {
    Completed {
        comments: Vec<AnalyzedComment>,
        summary: Summary,
    },
    Failed {
        error: String,
    },
    Empty {},
}

impl TaskData {
    pub fn empty() -> Self {
        TaskData::Empty {}
    }

    /// Build the success payload; the summary is derived from `comments`.
    pub fn completed(comments: Vec<AnalyzedComment>) -> Self {
        let summary = Summary::from_comments(&comments);
        TaskData::Completed { comments, summary }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        TaskData::Failed {
            error: error.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaskData::Empty {})
    }

    /// Classified comments, if the task succeeded.
    pub fn comments(&self) -> Option<&[AnalyzedComment]> {
        match self {
            TaskData::Completed { comments, .. } => Some(comments),
            _ => None,
        }
    }

    /// Whether this payload is the one a task in `status` carries:
    /// empty while active, results on success, an error on failure.
    pub fn fits(&self, status: TaskStatus) -> bool {
        match status {
            TaskStatus::Queued | TaskStatus::Running => self.is_empty(),
            TaskStatus::Succeeded => matches!(self, TaskData::Completed { .. }),
            TaskStatus::Failed => matches!(self, TaskData::Failed { .. }),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TaskData::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl Default for TaskData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Aggregate counts over a completed result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    /// Number of comments per category, ordered by label.
    pub categories: BTreeMap<Category, usize>,
}

impl Summary {
    pub fn from_comments(comments: &[AnalyzedComment]) -> Self {
        let mut categories = BTreeMap::new();
        for c in comments {
            *categories.entry(c.category.clone()).or_insert(0) += 1;
        }
        Self {
            total: comments.len(),
            categories,
        }
    }
}
