use std::sync::Arc;
use std::time::Duration;

use narrato::application::services::{TransformClient, TransformError};
use narrato::domain::Chunk;

use crate::helpers::{ScriptedTransformer, Step};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test(start_paused = true)]
async fn given_responsive_backend_when_transforming_then_returns_result_at_chunk_index() {
    let backend = Arc::new(ScriptedTransformer::new());
    let client = TransformClient::new(Arc::clone(&backend), TEST_TIMEOUT);

    let result = client
        .transform(&Chunk::new(3, "hello world".to_string()))
        .await
        .unwrap();

    assert_eq!(result.index, 3);
    assert_eq!(result.content.as_deref(), Some("HELLO WORLD"));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_backend_that_never_answers_when_transforming_then_times_out() {
    let backend = Arc::new(ScriptedTransformer::new().with_step("stuck", Step::Hang));
    let client = TransformClient::new(backend, TEST_TIMEOUT);

    let result = client.transform(&Chunk::new(1, "stuck".to_string())).await;

    assert_eq!(
        result,
        Err(TransformError::Timeout {
            index: 1,
            after: TEST_TIMEOUT
        })
    );
}

#[tokio::test(start_paused = true)]
async fn given_slow_backend_within_deadline_when_transforming_then_succeeds() {
    let backend = Arc::new(
        ScriptedTransformer::new().with_step("slow", Step::Echo(Duration::from_secs(4))),
    );
    let client = TransformClient::new(backend, TEST_TIMEOUT);

    let result = client.transform(&Chunk::new(0, "slow".to_string())).await;

    assert_eq!(result.unwrap().content.as_deref(), Some("SLOW"));
}

#[tokio::test(start_paused = true)]
async fn given_backend_error_when_transforming_then_reports_upstream_with_message() {
    let backend = Arc::new(
        ScriptedTransformer::new().with_step("bad", Step::Fail("HTTP 400: rejected".to_string())),
    );
    let client = TransformClient::new(backend, TEST_TIMEOUT);

    let error = client
        .transform(&Chunk::new(2, "bad".to_string()))
        .await
        .unwrap_err();

    match error {
        TransformError::Upstream { index, message } => {
            assert_eq!(index, 2);
            assert!(message.contains("HTTP 400: rejected"), "{}", message);
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn given_backend_returning_empty_text_when_transforming_then_succeeds_with_empty_content() {
    let backend =
        Arc::new(ScriptedTransformer::new().with_step("blank", Step::Reply(String::new())));
    let client = TransformClient::new(backend, TEST_TIMEOUT);

    let result = client
        .transform(&Chunk::new(0, "blank".to_string()))
        .await
        .unwrap();

    assert_eq!(result.content.as_deref(), Some(""));
}
