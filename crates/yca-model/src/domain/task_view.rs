use serde::{Deserialize, Serialize};

use crate::{TaskData, TaskId, TaskInfo, TaskStatus};

/// Submission body: the video to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeVideo {
    pub url: String,
}

/// Read-only projection of a task returned to pollers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusView {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub data: TaskData,
}

impl From<TaskInfo> for TaskStatusView {
    fn from(info: TaskInfo) -> Self {
        Self {
            task_id: info.task_id,
            status: info.status,
            data: info.data,
        }
    }
}
