use std::time::Duration;

use thiserror::Error;
use yca_model::{ModelError, TaskId, TaskStatus};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ModelError),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("invalid transition for task {id}: {from} -> {to}")]
    InvalidTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("payload does not match status {status} of task {id}")]
    DataMismatch { id: TaskId, status: TaskStatus },

    #[error("duplicate comment id '{comment_id}' in results of task {task_id}")]
    DuplicateComment { task_id: TaskId, comment_id: String },

    #[error("work queue is closed")]
    QueueClosed,
}

/// Failure reported by a fetch or classification collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} api error{}: {message}", status_suffix(.status))]
    Api {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("classifier returned unknown comment id '{0}'")]
    UnknownComment(String),

    #[error("analysis timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("analysis interrupted by shutdown")]
    Interrupted,

    #[error("classifier left {} comment(s) unclassified: {}", .0.len(), id_preview(.0))]
    Unclassified(Vec<String>),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

fn id_preview(ids: &[String]) -> String {
    const SHOWN: usize = 5;
    let mut out = ids[..ids.len().min(SHOWN)].join(", ");
    if ids.len() > SHOWN {
        out.push_str(", ...");
    }
    out
}
