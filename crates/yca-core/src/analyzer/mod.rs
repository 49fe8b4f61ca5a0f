use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use yca_model::{TaskId, TaskPage, TaskQuery, TaskStatusView, VideoRef, YoutubeVideo};

use crate::{
    error::CoreError,
    lifecycle::{Lifecycle, Subscribe},
    pipeline::Pipeline,
    queue::{AnalysisJob, WorkQueue, work_queue},
    state::TaskStore,
    worker::WorkerPool,
};

/// Tuning knobs of the analysis service.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Jobs that may wait in the queue before submissions start waiting.
    pub queue_capacity: usize,
    /// Upper bound for fetching and classifying one video.
    pub job_timeout: Duration,
    /// How long shutdown waits for queued jobs before interrupting them.
    pub shutdown_grace: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
            job_timeout: Duration::from_secs(300),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Submission and status-query entry point of the service.
///
/// Owns the task store, the work queue and the worker pool; `submit` returns
/// as soon as the job is queued.
pub struct AnalyzerApi {
    lifecycle: Lifecycle,
    queue: WorkQueue,
    workers: Mutex<Option<WorkerPool>>,
    token: CancellationToken,
    cfg: AnalyzerConfig,
}

impl AnalyzerApi {
    /// Build the service and spawn its workers on the current runtime.
    pub fn new(
        cfg: AnalyzerConfig,
        pipeline: Pipeline,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let lifecycle = Lifecycle::new(TaskStore::new(), subscribers);
        let (queue, jobs) = work_queue(cfg.queue_capacity);
        let token = CancellationToken::new();
        let workers = WorkerPool::spawn(
            cfg.workers,
            cfg.job_timeout,
            jobs,
            lifecycle.clone(),
            pipeline,
            token.clone(),
        );
        info!(
            workers = workers.worker_count(),
            queue_capacity = cfg.queue_capacity,
            job_timeout_s = cfg.job_timeout.as_secs(),
            "analyzer is ready"
        );

        Self {
            lifecycle,
            queue,
            workers: Mutex::new(Some(workers)),
            token,
            cfg,
        }
    }

    /// Validate the video reference, create a task and queue its analysis.
    #[instrument(level = "debug", skip(self, req), fields(url = %req.url))]
    pub async fn submit(&self, req: &YoutubeVideo) -> Result<TaskId, CoreError> {
        let video = VideoRef::parse(&req.url)?;
        let slot = self.queue.reserve().await?;

        let task_id = self.lifecycle.create(&video);
        slot.send(AnalysisJob {
            task_id: task_id.clone(),
            video,
        });
        debug!(task = %task_id, "analysis queued");
        Ok(task_id)
    }

    /// Current status of a task, with results once it is terminal.
    pub fn status(&self, id: &TaskId) -> Result<TaskStatusView, CoreError> {
        self.lifecycle.store().get(id).map(TaskStatusView::from)
    }

    /// Page through known tasks.
    pub fn list(&self, query: &TaskQuery) -> TaskPage<TaskStatusView> {
        self.lifecycle.store().query(query).map(TaskStatusView::from)
    }

    /// Stop accepting work, let workers drain the queue within the grace
    /// period, then interrupt whatever is still running.
    pub async fn shutdown(&self) {
        self.queue.close().await;
        let Some(mut workers) = self.workers.lock().await.take() else {
            return;
        };

        if tokio::time::timeout(self.cfg.shutdown_grace, workers.join())
            .await
            .is_err()
        {
            warn!(
                grace_s = self.cfg.shutdown_grace.as_secs(),
                "workers did not drain in time; interrupting running analyses"
            );
            self.token.cancel();
            workers.join().await;
        }
        info!("analyzer stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use yca_model::{AnalyzedComment, ModelError, RawComment, TaskStatus};

    use super::*;
    use crate::{
        error::UpstreamError,
        pipeline::{CommentClassifier, CommentSource},
    };

    struct TwoComments;

    #[async_trait]
    impl CommentSource for TwoComments {
        fn name(&self) -> &'static str {
            "two"
        }
        async fn fetch(&self, _video: &VideoRef) -> Result<Vec<RawComment>, UpstreamError> {
            Ok(vec![
                RawComment {
                    id: "c1".into(),
                    author: "ann".into(),
                    text: "How did you do the intro?".into(),
                },
                RawComment {
                    id: "c2".into(),
                    author: "bob".into(),
                    text: "Great video!".into(),
                },
            ])
        }
    }

    struct Keyword;

    #[async_trait]
    impl CommentClassifier for Keyword {
        fn name(&self) -> &'static str {
            "keyword"
        }
        async fn classify(
            &self,
            comments: &[RawComment],
        ) -> Result<Vec<AnalyzedComment>, UpstreamError> {
            Ok(comments
                .iter()
                .map(|c| {
                    let category = if c.text.ends_with('?') { "question" } else { "praise" };
                    AnalyzedComment {
                        id: c.id.clone(),
                        category: category.into(),
                        reasoning: format!("matched on '{}'", c.text),
                    }
                })
                .collect())
        }
    }

    fn analyzer(cfg: AnalyzerConfig) -> AnalyzerApi {
        AnalyzerApi::new(
            cfg,
            Pipeline::new(Arc::new(TwoComments), Arc::new(Keyword)),
            vec![],
        )
    }

    fn video(url: &str) -> YoutubeVideo {
        YoutubeVideo { url: url.into() }
    }

    async fn wait_terminal(api: &AnalyzerApi, id: &TaskId) -> TaskStatusView {
        for _ in 0..200 {
            let view = api.status(id).unwrap();
            if view.status.is_terminal() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("task {id} did not finish");
    }

    #[tokio::test]
    async fn submit_then_poll_until_succeeded() {
        let api = analyzer(AnalyzerConfig::default());
        let id = api
            .submit(&video("https://youtube.com/watch?v=abc"))
            .await
            .unwrap();

        let view = wait_terminal(&api, &id).await;
        assert_eq!(view.status, TaskStatus::Succeeded);

        let comments = view.data.comments().unwrap();
        assert_eq!(comments.len(), 2);
        let ids: HashSet<&str> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 2);

        // terminal snapshots are stable
        assert_eq!(api.status(&id).unwrap(), view);
        assert_eq!(api.status(&id).unwrap(), view);
    }

    #[tokio::test]
    async fn fresh_task_is_queued_with_empty_data() {
        // current-thread runtime: workers are not polled until this test yields
        let api = analyzer(AnalyzerConfig::default());

        let id = api
            .submit(&video("https://youtube.com/watch?v=abc"))
            .await
            .unwrap();
        let view = api.status(&id).unwrap();
        assert_eq!(view.status, TaskStatus::Queued);
        assert!(view.data.is_empty());
    }

    #[tokio::test]
    async fn invalid_url_creates_nothing() {
        let api = analyzer(AnalyzerConfig::default());

        let err = api.submit(&video("")).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ModelError::InvalidVideoUrl(_))
        ));
        assert_eq!(api.list(&TaskQuery::new()).total, 0);
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let api = analyzer(AnalyzerConfig::default());
        assert!(matches!(
            api.status(&TaskId::from("nonexistent")),
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn submissions_after_shutdown_are_refused() {
        let api = analyzer(AnalyzerConfig::default());
        api.shutdown().await;

        let err = api
            .submit(&video("https://youtu.be/abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::QueueClosed));
        assert_eq!(api.list(&TaskQuery::new()).total, 0);
    }

    #[tokio::test]
    async fn shutdown_drains_queued_work() {
        let api = analyzer(AnalyzerConfig::default());
        let mut ids = Vec::new();
        for _ in 0..10 {
            ids.push(api.submit(&video("https://youtu.be/abc")).await.unwrap());
        }
        api.shutdown().await;

        for id in &ids {
            assert_eq!(api.status(id).unwrap().status, TaskStatus::Succeeded);
        }
        let page = api.list(&TaskQuery::new().with_status(TaskStatus::Succeeded));
        assert_eq!(page.total, 10);
    }
}
