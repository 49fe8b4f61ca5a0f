use std::{sync::Arc, time::SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;
use yca_model::{TaskData, TaskId, TaskInfo, TaskPage, TaskQuery, TaskStatus, VideoRef};

use crate::error::CoreError;

/// In-memory task store.
///
/// Records live in a sharded map, so every read or write of one task is
/// serialized on that task's shard while unrelated tasks proceed in parallel.
/// Records are never removed, which keeps ids unique for the store's lifetime.
#[derive(Clone, Default)]
pub struct TaskStore {
    tasks: Arc<DashMap<TaskId, TaskInfo>>,
}

impl TaskStore {
    /// Create empty task store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new `queued` task for `video` and return its fresh id.
    pub fn create(&self, video: &VideoRef) -> TaskId {
        loop {
            let id = TaskId::from(Uuid::new_v4().to_string());
            if let Entry::Vacant(slot) = self.tasks.entry(id.clone()) {
                let now = SystemTime::now();
                slot.insert(TaskInfo {
                    task_id: id.clone(),
                    source_reference: video.url().to_string(),
                    video_id: video.video_id().to_string(),
                    status: TaskStatus::Queued,
                    created_at: now,
                    updated_at: now,
                    data: TaskData::empty(),
                });
                return id;
            }
        }
    }

    /// Get a snapshot of the task.
    pub fn get(&self, id: &TaskId) -> Result<TaskInfo, CoreError> {
        self.tasks
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    /// Replace status and data of a task in one step.
    ///
    /// The transition must follow the lifecycle order and `data` must fit the
    /// new status; the returned snapshot reflects the new state.
    pub fn update_status(
        &self,
        id: &TaskId,
        status: TaskStatus,
        data: TaskData,
    ) -> Result<TaskInfo, CoreError> {
        let mut entry = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        let info = entry.value_mut();

        if !info.status.can_transition_to(status) {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                from: info.status,
                to: status,
            });
        }
        if !data.fits(status) {
            return Err(CoreError::DataMismatch {
                id: id.clone(),
                status,
            });
        }

        info.status = status;
        info.data = data;
        info.updated_at = SystemTime::now();
        Ok(info.clone())
    }

    /// Query tasks with an optional status filter and pagination.
    ///
    /// Results are ordered by submission time; `total` counts matches before pagination.
    pub fn query(&self, q: &TaskQuery) -> TaskPage<TaskInfo> {
        let mut matched: Vec<TaskInfo> = self
            .tasks
            .iter()
            .filter(|r| q.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        matched.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        q.paginate(matched)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
