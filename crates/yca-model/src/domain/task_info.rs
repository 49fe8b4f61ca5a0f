use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::{TaskData, TaskId, TaskStatus};

/// Full record of one analysis task as kept by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Unique task identifier.
    pub task_id: TaskId,
    /// Video URL exactly as supplied by the caller.
    pub source_reference: String,
    /// Video id extracted from `source_reference`.
    pub video_id: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// When the task was submitted.
    #[serde(with = "time_serde")]
    pub created_at: SystemTime,
    /// When the task last changed state.
    #[serde(with = "time_serde")]
    pub updated_at: SystemTime,
    /// Results or error; empty while the task is active.
    #[serde(default)]
    pub data: TaskData,
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        u64::try_from(since_epoch.as_millis())
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn info(status: TaskStatus, data: TaskData) -> TaskInfo {
        let at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        TaskInfo {
            task_id: TaskId::from("task-1"),
            source_reference: "https://youtu.be/abc".to_string(),
            video_id: "abc".to_string(),
            status,
            created_at: at,
            updated_at: at,
            data,
        }
    }

    #[test]
    fn timestamps_serialize_as_epoch_millis() {
        let json = serde_json::to_value(info(TaskStatus::Queued, TaskData::empty())).unwrap();
        assert_eq!(json["created_at"], 1_700_000_000_123u64);
        assert_eq!(json["status"], "queued");
        assert_eq!(json["data"], serde_json::json!({}));
    }

    #[test]
    fn failed_info_keeps_error_through_serde() {
        let original = info(TaskStatus::Failed, TaskData::failed("quota"));
        let json = serde_json::to_string(&original).unwrap();
        let back: TaskInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(back, original);
        assert_eq!(back.data.error(), Some("quota"));
    }
}
