use std::time::Duration;

use narrato::application::ports::TextTransformer;
use narrato::infrastructure::llm::MockTextTransformer;

#[tokio::test]
async fn given_messy_paragraphs_when_mock_rewrites_then_collapses_whitespace() {
    let result = MockTextTransformer::new()
        .rewrite("one   two\nthree\n\n\n\n  four ")
        .await
        .unwrap();

    assert_eq!(result, "one two three\n\nfour");
}

#[tokio::test(start_paused = true)]
async fn given_delay_when_mock_rewrites_then_waits_before_answering() {
    let transformer = MockTextTransformer::with_delay(Duration::from_secs(3));
    let started = tokio::time::Instant::now();

    transformer.rewrite("text").await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(3));
}
