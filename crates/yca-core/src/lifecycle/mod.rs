mod subscriber;
pub use subscriber::Subscribe;

use std::{collections::HashSet, sync::Arc};

use tracing::{instrument, trace};
use yca_model::{
    AnalyzedComment, EventKind, TaskData, TaskEvent, TaskId, TaskInfo, TaskStatus, VideoRef,
};

use crate::{error::CoreError, state::TaskStore};

/// Drives tasks through `queued → running → succeeded | failed`.
///
/// Persistence is delegated to [`TaskStore`], which rejects illegal
/// transitions; every accepted transition is published to subscribers.
#[derive(Clone)]
pub struct Lifecycle {
    store: TaskStore,
    subscribers: Arc<[Arc<dyn Subscribe>]>,
}

impl Lifecycle {
    pub fn new(store: TaskStore, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            store,
            subscribers: subscribers.into(),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Register a new `queued` task.
    pub fn create(&self, video: &VideoRef) -> TaskId {
        let id = self.store.create(video);
        self.publish(TaskEvent::new(EventKind::TaskQueued, id.clone()).with_video(video.video_id()));
        id
    }

    /// `queued → running`.
    #[instrument(level = "trace", skip(self), fields(task = %id))]
    pub fn start(&self, id: &TaskId) -> Result<TaskInfo, CoreError> {
        let info = self
            .store
            .update_status(id, TaskStatus::Running, TaskData::empty())?;
        self.publish(TaskEvent::new(EventKind::TaskStarted, id.clone()).with_video(&info.video_id));
        Ok(info)
    }

    /// `running → succeeded`, attaching the classified comments.
    ///
    /// Comment ids must be unique; on a duplicate the task is left running
    /// so the caller can still fail it.
    #[instrument(level = "trace", skip(self, comments), fields(task = %id, comments = comments.len()))]
    pub fn succeed(
        &self,
        id: &TaskId,
        comments: Vec<AnalyzedComment>,
    ) -> Result<TaskInfo, CoreError> {
        let mut seen = HashSet::with_capacity(comments.len());
        if let Some(dup) = comments.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(CoreError::DuplicateComment {
                task_id: id.clone(),
                comment_id: dup.id.clone(),
            });
        }

        let n = comments.len();
        let info = self
            .store
            .update_status(id, TaskStatus::Succeeded, TaskData::completed(comments))?;
        self.publish(
            TaskEvent::new(EventKind::TaskSucceeded, id.clone())
                .with_video(&info.video_id)
                .with_comments(n),
        );
        Ok(info)
    }

    /// `running → failed`, attaching a human-readable reason.
    #[instrument(level = "trace", skip(self, reason), fields(task = %id))]
    pub fn fail(&self, id: &TaskId, reason: impl Into<String>) -> Result<TaskInfo, CoreError> {
        let reason = reason.into();
        let info = self
            .store
            .update_status(id, TaskStatus::Failed, TaskData::failed(reason.clone()))?;
        self.publish(
            TaskEvent::new(EventKind::TaskFailed, id.clone())
                .with_video(&info.video_id)
                .with_reason(reason),
        );
        Ok(info)
    }

    fn publish(&self, event: TaskEvent) {
        for sub in self.subscribers.iter() {
            trace!(subscriber = sub.name(), kind = ?event.kind, "publishing event");
            sub.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<TaskEvent>>);

    impl Subscribe for Recorder {
        fn on_event(&self, event: &TaskEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    fn setup() -> (Lifecycle, Arc<Recorder>, TaskId) {
        let recorder = Arc::new(Recorder::default());
        let lifecycle = Lifecycle::new(TaskStore::new(), vec![recorder.clone()]);
        let video = VideoRef::parse("https://youtu.be/abc").unwrap();
        let id = lifecycle.create(&video);
        (lifecycle, recorder, id)
    }

    fn comment(id: &str) -> AnalyzedComment {
        AnalyzedComment {
            id: id.to_string(),
            category: "question".to_string(),
            reasoning: "asks something".to_string(),
        }
    }

    fn kinds(recorder: &Recorder) -> Vec<EventKind> {
        recorder.0.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn happy_path_publishes_each_transition() {
        let (lc, rec, id) = setup();

        lc.start(&id).unwrap();
        let info = lc.succeed(&id, vec![comment("a"), comment("b")]).unwrap();

        assert_eq!(info.status, TaskStatus::Succeeded);
        assert_eq!(
            kinds(&rec),
            vec![
                EventKind::TaskQueued,
                EventKind::TaskStarted,
                EventKind::TaskSucceeded
            ]
        );
        let last = rec.0.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.comments, Some(2));
        assert_eq!(last.video_id.as_deref(), Some("abc"));
    }

    #[test]
    fn failure_records_reason() {
        let (lc, rec, id) = setup();

        lc.start(&id).unwrap();
        let info = lc.fail(&id, "youtube api error (403): comments disabled").unwrap();

        assert_eq!(info.status, TaskStatus::Failed);
        assert_eq!(
            info.data.error(),
            Some("youtube api error (403): comments disabled")
        );
        let last = rec.0.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.kind, EventKind::TaskFailed);
    }

    #[test]
    fn cannot_finish_a_queued_task() {
        let (lc, rec, id) = setup();

        assert!(matches!(
            lc.succeed(&id, vec![]),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(matches!(
            lc.fail(&id, "nope"),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert_eq!(kinds(&rec), vec![EventKind::TaskQueued]);
    }

    #[test]
    fn cannot_leave_terminal_state() {
        let (lc, _rec, id) = setup();
        lc.start(&id).unwrap();
        lc.succeed(&id, vec![comment("a")]).unwrap();

        assert!(lc.start(&id).is_err());
        assert!(lc.fail(&id, "late failure").is_err());
        assert!(lc.succeed(&id, vec![]).is_err());
        assert_eq!(lc.store().get(&id).unwrap().status, TaskStatus::Succeeded);
    }

    #[test]
    fn duplicate_comment_ids_are_rejected() {
        let (lc, _rec, id) = setup();
        lc.start(&id).unwrap();

        let err = lc
            .succeed(&id, vec![comment("a"), comment("b"), comment("a")])
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateComment { ref comment_id, .. } if comment_id == "a"));

        // still running, so it can be failed
        assert_eq!(lc.store().get(&id).unwrap().status, TaskStatus::Running);
        lc.fail(&id, err.to_string()).unwrap();
    }

    #[test]
    fn unknown_task_is_not_found() {
        let (lc, _rec, _id) = setup();
        assert!(matches!(
            lc.start(&TaskId::from("missing")),
            Err(CoreError::NotFound(_))
        ));
    }
}
