use yca_model::TaskEvent;

/// Receives task lifecycle events.
///
/// Called synchronously right after the store accepted a transition, so
/// implementations should return quickly.
pub trait Subscribe: Send + Sync + 'static {
    fn on_event(&self, event: &TaskEvent);

    fn name(&self) -> &'static str;
}
