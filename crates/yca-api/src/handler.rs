use async_trait::async_trait;
use yca_model::{TaskId, TaskPage, TaskQuery, TaskStatusView, YoutubeVideo};

use crate::error::ApiError;

/// Analysis API handler.
///
/// Transport layers talk to this trait; `AnalyzerApiAdapter` is the stock
/// implementation, custom handlers can wrap it with extra policy.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Queue the analysis of a video and return the new task id.
    async fn submit_analysis(&self, video: YoutubeVideo) -> Result<TaskId, ApiError>;

    /// Current status of a task; results are included once it is terminal.
    async fn get_task_status(&self, id: &TaskId) -> Result<TaskStatusView, ApiError>;

    async fn query_tasks(&self, query: TaskQuery) -> Result<TaskPage<TaskStatusView>, ApiError>;
}
