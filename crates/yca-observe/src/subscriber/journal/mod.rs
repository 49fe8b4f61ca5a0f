use yca_core::Subscribe;
use yca_model::TaskEvent;

use crate::subscriber::view::log_event;

/// Subscriber that writes every task lifecycle event to the log.
#[derive(Debug, Default)]
pub struct Journal;

impl Journal {
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for Journal {
    fn on_event(&self, event: &TaskEvent) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
