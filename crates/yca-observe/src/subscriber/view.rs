use std::borrow::Borrow;

use tracing::{debug, info, warn};
use yca_model::{EventKind, TaskEvent};

pub trait View {
    fn as_task(&self) -> &str;
    fn as_video(&self) -> &str;
    fn as_reason(&self) -> &str;
    fn comments(&self) -> usize;
    fn kind(&self) -> EventKind;
}

impl<T> View for T
where
    T: Borrow<TaskEvent>,
{
    #[inline]
    fn as_task(&self) -> &str {
        self.borrow().task_id.as_str()
    }
    #[inline]
    fn as_video(&self) -> &str {
        self.borrow().video_id.as_deref().unwrap_or("unknown")
    }
    #[inline]
    fn as_reason(&self) -> &str {
        self.borrow().reason.as_deref().unwrap_or("unknown")
    }
    #[inline]
    fn comments(&self) -> usize {
        self.borrow().comments.unwrap_or(0)
    }
    #[inline]
    fn kind(&self) -> EventKind {
        self.borrow().kind
    }
}

#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        EventKind::TaskQueued => "task queued for analysis",
        EventKind::TaskStarted => "task picked up by a worker",
        EventKind::TaskSucceeded => "task completed with results",
        EventKind::TaskFailed => "task failed",
    }
}

#[inline]
pub fn log_event<E: View>(e: E) {
    let msg = message_for(e.kind());

    match e.kind() {
        EventKind::TaskQueued => debug!(task = e.as_task(), video = e.as_video(), "{msg}"),
        EventKind::TaskStarted => info!(task = e.as_task(), video = e.as_video(), "{msg}"),
        EventKind::TaskSucceeded => info!(
            task = e.as_task(),
            video = e.as_video(),
            comments = e.comments(),
            "{msg}"
        ),
        EventKind::TaskFailed => warn!(
            task = e.as_task(),
            video = e.as_video(),
            reason = e.as_reason(),
            "{msg}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yca_model::TaskId;

    #[test]
    fn view_falls_back_for_missing_fields() {
        let event = TaskEvent::new(EventKind::TaskStarted, TaskId::from("t-1"));
        assert_eq!(event.as_task(), "t-1");
        assert_eq!(event.as_video(), "unknown");
        assert_eq!(event.as_reason(), "unknown");
        assert_eq!(event.comments(), 0);
    }

    #[test]
    fn view_works_through_references() {
        let event = TaskEvent::new(EventKind::TaskFailed, TaskId::from("t-2"))
            .with_video("abc")
            .with_reason("quota");
        let by_ref = &event;
        assert_eq!(View::as_video(&by_ref), "abc");
        assert_eq!(by_ref.as_reason(), "quota");
        assert_eq!(by_ref.kind(), EventKind::TaskFailed);
    }

    #[test]
    fn every_kind_has_a_message() {
        for kind in [
            EventKind::TaskQueued,
            EventKind::TaskStarted,
            EventKind::TaskSucceeded,
            EventKind::TaskFailed,
        ] {
            assert!(!message_for(kind).is_empty());
            log_event(TaskEvent::new(kind, TaskId::from("t")));
        }
    }
}
