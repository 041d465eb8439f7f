use std::time::Duration;

use narrato::application::services::OutputRegistry;
use narrato::domain::SessionId;

async fn write_output(registry: &OutputRegistry, session: SessionId) -> std::path::PathBuf {
    let path = registry.output_path(session, "cleaned_notes.txt");
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, "cleaned").await.unwrap();
    registry.insert(session, path.clone());
    path
}

#[tokio::test]
async fn given_session_when_building_output_path_then_nests_under_session_dir() {
    let registry = OutputRegistry::new("outputs", Duration::from_secs(60));
    let session = SessionId::new();

    let path = registry.output_path(session, "cleaned_a.pdf");

    assert_eq!(
        path,
        std::path::Path::new("outputs")
            .join(session.to_string())
            .join("cleaned_a.pdf")
    );
    assert_eq!(path.parent().unwrap(), registry.session_dir(session));
}

#[tokio::test(start_paused = true)]
async fn given_registered_output_when_retention_passes_then_it_is_hidden() {
    let registry = OutputRegistry::new("outputs", Duration::from_secs(60));
    let session = SessionId::new();
    let path = registry.output_path(session, "cleaned_a.txt");
    registry.insert(session, path.clone());

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(registry.get(session), Some(path));

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(registry.get(session), None);
}

#[tokio::test]
async fn given_expired_output_when_purging_then_deletes_session_directory() {
    let dir = tempfile::tempdir().unwrap();
    let registry = OutputRegistry::new(dir.path(), Duration::ZERO);
    let session = SessionId::new();
    write_output(&registry, session).await;

    let removed = registry.purge_expired().await;

    assert_eq!(removed, 1);
    assert!(registry.is_empty());
    assert!(!registry.session_dir(session).exists());
}

#[tokio::test]
async fn given_live_output_when_purging_then_keeps_file_and_entry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = OutputRegistry::new(dir.path(), Duration::from_secs(300));
    let session = SessionId::new();
    let path = write_output(&registry, session).await;

    let removed = registry.purge_expired().await;

    assert_eq!(removed, 0);
    assert_eq!(registry.len(), 1);
    assert!(path.exists());
}

#[tokio::test]
async fn given_session_without_files_when_discarding_then_succeeds_quietly() {
    let dir = tempfile::tempdir().unwrap();
    let registry = OutputRegistry::new(dir.path(), Duration::from_secs(300));

    registry.discard(SessionId::new()).await;

    assert!(registry.is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_running_reaper_when_outputs_expire_then_they_are_removed() {
    let registry = std::sync::Arc::new(OutputRegistry::new("outputs", Duration::from_secs(5)));
    let session = SessionId::new();
    registry.insert(session, registry.output_path(session, "cleaned_a.txt"));
    let reaper = registry.spawn_reaper(Duration::from_secs(1));

    tokio::time::sleep(Duration::from_secs(7)).await;

    assert!(registry.is_empty());
    reaper.abort();
}
