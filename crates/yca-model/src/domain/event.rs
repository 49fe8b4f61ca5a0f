use crate::{TaskId, TaskStatus};

/// Kind of lifecycle event published by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Task created and handed to the work queue.
    TaskQueued,
    /// A worker picked the task up.
    TaskStarted,
    /// Task finished with results.
    TaskSucceeded,
    /// Task finished with an error.
    TaskFailed,
}

impl EventKind {
    /// Lifecycle state the task is in right after this event.
    pub fn status(&self) -> TaskStatus {
        match self {
            EventKind::TaskQueued => TaskStatus::Queued,
            EventKind::TaskStarted => TaskStatus::Running,
            EventKind::TaskSucceeded => TaskStatus::Succeeded,
            EventKind::TaskFailed => TaskStatus::Failed,
        }
    }
}

/// A single lifecycle transition, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEvent {
    pub kind: EventKind,
    pub task_id: TaskId,
    /// Video id the task analyzes.
    pub video_id: Option<String>,
    /// Failure description (`TaskFailed` only).
    pub reason: Option<String>,
    /// Number of classified comments (`TaskSucceeded` only).
    pub comments: Option<usize>,
}

impl TaskEvent {
    pub fn new(kind: EventKind, task_id: TaskId) -> Self {
        Self {
            kind,
            task_id,
            video_id: None,
            reason: None,
            comments: None,
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_comments(mut self, n: usize) -> Self {
        self.comments = Some(n);
        self
    }
}
