use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::{
    error::{CoreError, UpstreamError},
    lifecycle::Lifecycle,
    pipeline::Pipeline,
    queue::{AnalysisJob, JobReceiver},
};

/// Pool of workers consuming the analysis queue.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` consumers on the current runtime.
    pub fn spawn(
        workers: usize,
        job_timeout: Duration,
        jobs: JobReceiver,
        lifecycle: Lifecycle,
        pipeline: Pipeline,
        token: CancellationToken,
    ) -> Self {
        let handles = (0..workers.max(1))
            .map(|n| {
                let worker = Worker {
                    job_timeout,
                    lifecycle: lifecycle.clone(),
                    pipeline: pipeline.clone(),
                    token: token.clone(),
                };
                let jobs = jobs.clone();
                tokio::spawn(
                    async move { worker.run(jobs).await }.instrument(info_span!("worker", n)),
                )
            })
            .collect();
        Self { handles }
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit.
    pub async fn join(&mut self) {
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!(error = %e, "worker terminated abnormally");
            }
        }
    }
}

struct Worker {
    job_timeout: Duration,
    lifecycle: Lifecycle,
    pipeline: Pipeline,
    token: CancellationToken,
}

impl Worker {
    async fn run(self, jobs: JobReceiver) {
        debug!("worker started");
        while let Some(job) = jobs.recv(&self.token).await {
            self.process(job).await;
        }
        debug!("worker stopped");
    }

    async fn process(&self, job: AnalysisJob) {
        let id = job.task_id;
        if let Err(e) = self.lifecycle.start(&id) {
            error!(task = %id, error = %e, "cannot start task");
            return;
        }

        let outcome = tokio::select! {
            res = tokio::time::timeout(self.job_timeout, self.pipeline.analyze(&job.video)) => {
                res.unwrap_or(Err(UpstreamError::Timeout(self.job_timeout)))
            }
            _ = self.token.cancelled() => Err(UpstreamError::Interrupted),
        };

        let recorded = match outcome {
            Ok(comments) => match self.lifecycle.succeed(&id, comments) {
                Err(e @ CoreError::DuplicateComment { .. }) => {
                    warn!(task = %id, error = %e, "rejecting classifier output");
                    self.lifecycle.fail(&id, e.to_string())
                }
                other => other,
            },
            Err(e) => self.lifecycle.fail(&id, e.to_string()),
        };

        if let Err(e) = recorded {
            error!(task = %id, error = %e, "failed to record analysis outcome");
        }
    }
}
