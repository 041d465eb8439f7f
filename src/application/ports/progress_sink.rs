/// Observer notified each time a chunk finishes successfully.
///
/// Called synchronously from the worker that completed the chunk, while the
/// dispatcher's completion counter is held, so notifications for one job
/// arrive with strictly increasing `completed`.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}
