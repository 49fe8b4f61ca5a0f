use std::sync::Arc;

use async_trait::async_trait;
use yca_core::AnalyzerApi;
use yca_model::{TaskId, TaskPage, TaskQuery, TaskStatusView, YoutubeVideo};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges `AnalyzerApi` to `ApiHandler`.
pub struct AnalyzerApiAdapter {
    analyzer: Arc<AnalyzerApi>,
}

impl AnalyzerApiAdapter {
    pub fn new(analyzer: Arc<AnalyzerApi>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl ApiHandler for AnalyzerApiAdapter {
    async fn submit_analysis(&self, video: YoutubeVideo) -> Result<TaskId, ApiError> {
        self.analyzer.submit(&video).await.map_err(ApiError::from)
    }

    async fn get_task_status(&self, id: &TaskId) -> Result<TaskStatusView, ApiError> {
        self.analyzer.status(id).map_err(ApiError::from)
    }

    async fn query_tasks(&self, query: TaskQuery) -> Result<TaskPage<TaskStatusView>, ApiError> {
        Ok(self.analyzer.list(&query))
    }
}
