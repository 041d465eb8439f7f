use narrato::application::services::{PARAGRAPH_SEPARATOR, ParagraphChunker, chunk_text};

fn sample_document() -> String {
    let paragraphs = [
        "The quick brown fox jumps over the lazy dog.",
        "  Indented paragraph with trailing spaces.   ",
        "A much longer paragraph that keeps going so that it spans more than a handful of words and forces the greedy packer to flush early.",
        "Short.",
        "Another medium sized paragraph sits here.",
    ];
    paragraphs.join("\n\n")
}

#[test]
fn given_two_short_paragraphs_when_chunking_then_returns_single_chunk() {
    let chunks = chunk_text("Para one.\n\nPara two.", 100);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[0].content, "Para one.\n\nPara two.");
    assert_eq!(chunks[0].size, 20);
}

#[test]
fn given_oversized_single_paragraph_when_chunking_then_hard_splits_at_limit() {
    let text = "a".repeat(10_000);

    let chunks = chunk_text(&text, 6000);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].size, 6000);
    assert_eq!(chunks[1].size, 4000);
    assert_eq!(format!("{}{}", chunks[0].content, chunks[1].content), text);
}

#[test]
fn given_empty_text_when_chunking_then_returns_no_chunks() {
    assert!(chunk_text("", 100).is_empty());
}

#[test]
fn given_whitespace_only_text_when_chunking_then_returns_no_chunks() {
    assert!(chunk_text("  \n\n \t \n\n  ", 100).is_empty());
}

#[test]
fn given_any_positive_limit_when_chunking_then_no_chunk_exceeds_it() {
    let text = sample_document();

    for limit in [1, 5, 17, 44, 45, 90, 150, 1000] {
        let chunks = chunk_text(&text, limit);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(
                chunk.size <= limit,
                "chunk {} has {} chars with limit {}",
                chunk.index,
                chunk.size,
                limit
            );
            assert!(!chunk.content.is_empty());
        }
    }
}

#[test]
fn given_same_input_when_chunking_twice_then_results_are_identical() {
    let text = sample_document();

    assert_eq!(chunk_text(&text, 60), chunk_text(&text, 60));
}

#[test]
fn given_paragraphs_that_fit_when_rejoining_chunks_then_reproduces_trimmed_paragraphs() {
    let text = sample_document();
    let expected = text
        .split("\n\n")
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR);

    let chunks = chunk_text(&text, 140);
    let rejoined = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR);

    assert!(chunks.len() > 1);
    assert_eq!(rejoined, expected);
}

#[test]
fn given_chunks_when_chunking_then_indices_are_sequential() {
    let chunks = chunk_text(&sample_document(), 50);

    for (position, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, position);
    }
}

#[test]
fn given_paragraphs_filling_limit_exactly_when_chunking_then_keeps_them_together() {
    // 4 + 2 + 4 = 10 characters including the separator.
    let chunks = chunk_text("abcd\n\nefgh\n\nijkl", 10);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "abcd\n\nefgh");
    assert_eq!(chunks[1].content, "ijkl");
}

#[test]
fn given_oversized_paragraph_between_small_ones_when_chunking_then_flushes_buffer_first() {
    let text = format!("intro\n\n{}\n\noutro", "x".repeat(25));

    let chunks = chunk_text(&text, 10);
    let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();

    assert_eq!(
        contents,
        vec!["intro", "xxxxxxxxxx", "xxxxxxxxxx", "xxxxx", "outro"]
    );
}

#[test]
fn given_text_without_blank_lines_when_chunking_then_treats_it_as_one_paragraph() {
    let text = "line one\nline two\nline three";

    let chunks = chunk_text(text, 100);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, text);
}

#[test]
fn given_multibyte_text_when_chunking_then_counts_characters_not_bytes() {
    let text = "ü".repeat(12);

    let chunks = chunk_text(&text, 5);

    assert_eq!(
        chunks.iter().map(|c| c.size).collect::<Vec<_>>(),
        vec![5, 5, 2]
    );
}

#[test]
fn given_chunker_with_limit_when_splitting_then_matches_free_function() {
    let chunker = ParagraphChunker::new(30);
    let text = sample_document();

    assert_eq!(chunker.max_chunk_chars(), 30);
    assert_eq!(chunker.split(&text), chunk_text(&text, 30));
}
