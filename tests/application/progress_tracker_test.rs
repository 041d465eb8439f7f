use std::sync::Arc;
use std::time::Duration;

use narrato::application::ports::ProgressSink;
use narrato::application::services::{ProgressError, ProgressTracker};
use narrato::domain::{JobStatus, SessionId};

#[tokio::test]
async fn given_started_session_when_updating_then_completed_never_moves_backwards() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.start(session, 5);

    tracker.update(session, 3, 5);
    tracker.update(session, 2, 5);

    let progress = tracker.get(session).unwrap();
    assert_eq!(progress.completed, 3);
    assert_eq!(progress.total, 5);
    assert_eq!(progress.status, JobStatus::Processing);
    assert!((progress.percent() - 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn given_unknown_session_when_getting_then_returns_not_found() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();

    assert_eq!(tracker.get(session), Err(ProgressError::NotFound(session)));
}

#[tokio::test]
async fn given_enqueued_session_when_getting_then_reports_queued_at_zero_percent() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.enqueue(session);

    let progress = tracker.get(session).unwrap();

    assert_eq!(progress.status, JobStatus::Queued);
    assert_eq!(progress.total, 0);
    assert_eq!(progress.percent(), 0.0);
}

#[tokio::test]
async fn given_completed_session_when_late_update_arrives_then_it_is_ignored() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.start(session, 4);
    tracker.complete(session);

    tracker.update(session, 1, 4);

    let progress = tracker.get(session).unwrap();
    assert_eq!(progress.status, JobStatus::Completed);
    assert_eq!(progress.completed, 4);
    assert_eq!(progress.percent(), 100.0);
}

#[tokio::test]
async fn given_failed_session_when_getting_then_reports_error_message() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.start(session, 3);
    tracker.update(session, 1, 3);

    tracker.fail(session, "timeout: chunk 2 exceeded 120s");

    let progress = tracker.get(session).unwrap();
    assert_eq!(progress.status, JobStatus::Failed);
    assert_eq!(progress.completed, 1);
    assert_eq!(
        progress.error_message.as_deref(),
        Some("timeout: chunk 2 exceeded 120s")
    );
}

#[tokio::test]
async fn given_failure_for_unknown_session_when_failing_then_entry_is_created() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();

    tracker.fail(session, "extraction failed");

    assert_eq!(tracker.get(session).unwrap().status, JobStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn given_retention_window_when_it_elapses_then_session_is_not_found() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.start(session, 2);
    tracker.complete(session);
    tracker.expire(session, Duration::from_secs(300));

    tokio::time::advance(Duration::from_secs(299)).await;
    assert!(tracker.get(session).is_ok());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(tracker.get(session), Err(ProgressError::NotFound(session)));
    assert!(tracker.is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_expired_and_live_sessions_when_purging_then_removes_only_expired() {
    let tracker = ProgressTracker::new();
    let expired = SessionId::new();
    let live = SessionId::new();
    tracker.start(expired, 1);
    tracker.start(live, 1);
    tracker.expire(expired, Duration::from_secs(10));

    tokio::time::advance(Duration::from_secs(11)).await;
    let removed = tracker.purge_expired();

    assert_eq!(removed, 1);
    assert_eq!(tracker.len(), 1);
    assert!(tracker.get(live).is_ok());
}

#[tokio::test(start_paused = true)]
async fn given_reaper_when_interval_passes_then_expired_sessions_are_removed() {
    let tracker = Arc::new(ProgressTracker::new());
    let session = SessionId::new();
    tracker.start(session, 1);
    tracker.expire(session, Duration::from_secs(5));
    let reaper = tracker.spawn_reaper(Duration::from_secs(2));

    tokio::time::sleep(Duration::from_secs(7)).await;

    assert!(tracker.is_empty());
    reaper.abort();
}

#[tokio::test]
async fn given_restarted_session_when_starting_again_then_progress_resets() {
    let tracker = ProgressTracker::new();
    let session = SessionId::new();
    tracker.start(session, 3);
    tracker.update(session, 2, 3);
    tracker.fail(session, "boom");

    tracker.start(session, 6);

    let progress = tracker.get(session).unwrap();
    assert_eq!(progress.status, JobStatus::Processing);
    assert_eq!(progress.completed, 0);
    assert_eq!(progress.total, 6);
    assert!(progress.error_message.is_none());
}

#[tokio::test]
async fn given_sink_for_session_when_notified_then_tracker_is_updated() {
    let tracker = Arc::new(ProgressTracker::new());
    let session = SessionId::new();
    tracker.start(session, 4);
    let sink = tracker.sink(session);

    sink.on_progress(2, 4);

    assert_eq!(tracker.get(session).unwrap().completed, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_writers_when_updating_then_keeps_highest_count() {
    let tracker = Arc::new(ProgressTracker::new());
    let session = SessionId::new();
    tracker.start(session, 100);

    let mut handles = Vec::new();
    for completed in 1..=100 {
        let tracker = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move {
            tracker.update(session, completed, 100);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(tracker.get(session).unwrap().completed, 100);
}

#[tokio::test]
async fn given_many_sessions_when_updating_then_each_is_tracked_independently() {
    let tracker = ProgressTracker::new();
    let first = SessionId::new();
    let second = SessionId::new();
    tracker.start(first, 2);
    tracker.start(second, 10);

    tracker.update(first, 2, 2);
    tracker.update(second, 1, 10);

    assert_eq!(tracker.get(first).unwrap().completed, 2);
    assert_eq!(tracker.get(second).unwrap().completed, 1);
}
