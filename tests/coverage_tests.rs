//! Coverage and sizing tests for hierarchical chunking.
//!
//! These tests pin down how paragraphs and sentences map to chunks on
//! realistic document shapes.

use precis::{ChunkCapacity, Chunker, HierarchicalChunker};

fn chunker(max: usize) -> HierarchicalChunker {
    HierarchicalChunker::new(ChunkCapacity::new(max).unwrap())
}

/// Check that the chunks hold the document's non-whitespace text, in order.
fn reconstructs_to_original(chunks: &[String], text: &str) -> bool {
    let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let rebuilt: String = chunks
        .concat()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    original == rebuilt
}

// =============================================================================
// Coverage: Chunks should cover the entire input
// =============================================================================

#[test]
fn hierarchical_chunker_full_coverage() {
    let texts = [
        "Hello, world!",
        "The quick brown fox jumps over the lazy dog.",
        &"A".repeat(1000),
        "Short",
        " Leading and trailing spaces ",
        "Multiple\n\nParagraphs\n\nHere",
        "Page one ends mid\nsentence and page two\ncontinues it. Then stops.",
    ];

    for text in &texts {
        for max in [10, 50, 4000] {
            let chunks = chunker(max).chunk(text);
            assert!(
                reconstructs_to_original(&chunks, text),
                "coverage failed at max {max} for: {:?}",
                &text[..text.len().min(50)]
            );
        }
    }
}

// =============================================================================
// Paragraph level
// =============================================================================

#[test]
fn two_short_paragraphs_give_two_chunks() {
    let text = "The bill was introduced in March.\n\nIt passed the second reading in June.";
    let chunks = chunker(100).chunk(text);

    assert_eq!(
        chunks,
        vec![
            "The bill was introduced in March.",
            "It passed the second reading in June."
        ]
    );
}

#[test]
fn short_paragraphs_are_not_merged() {
    let text = "A.\n\nB.\n\nC.";
    let chunks = chunker(4000).chunk(text);

    // Paragraphs are never packed together, however small.
    assert_eq!(chunks.len(), 3);
}

#[test]
fn page_joins_inside_a_paragraph_are_kept() {
    // Pages are newline-joined; a single newline is not a paragraph break.
    let text = "End of page one\nstart of page two.";
    let chunks = chunker(4000).chunk(text);

    assert_eq!(chunks, vec![text]);
}

// =============================================================================
// Sentence level
// =============================================================================

#[test]
fn five_sentences_split_after_the_third() {
    let sentences = [
        "Article one sets the scope.",
        "Article two defines terms.",
        "Article three names the agency.",
        "Article four sets penalties.",
        "Article five sets the date.",
    ];
    let text = sentences.join(" ");
    // First three joined: 27 + 1 + 26 + 1 + 31 = 86 chars; adding the
    // fourth would reach 115.
    let chunks = chunker(100).chunk(&text);

    assert_eq!(
        chunks,
        vec![sentences[..3].join(" "), sentences[3..].join(" ")]
    );
}

#[test]
fn sentence_chunks_respect_size() {
    let text = "First paragraph with lots of words. More words here.\n\n\
                Second paragraph also has words. Even more words.\n\n\
                Third paragraph continues. And more sentences.";

    for max in [40, 50, 100, 200] {
        for chunk in chunker(max).chunk(text) {
            assert!(
                chunk.chars().count() <= max,
                "chunk of {} chars exceeds {max}: {chunk:?}",
                chunk.chars().count()
            );
        }
    }
}

#[test]
fn oversized_sentence_is_never_truncated() {
    let text = "A".repeat(1000);
    let chunks = chunker(100).chunk(&text);

    assert_eq!(chunks, vec![text]);
}

#[test]
fn size_equal_to_text_length_is_one_chunk() {
    let text = "Exactly fifty characters in this string, not more.";
    let chunks = chunker(text.chars().count()).chunk(text);

    assert_eq!(chunks, vec![text]);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn chunker_handles_only_whitespace() {
    assert!(chunker(50).chunk("   \n\n\t\t  ").is_empty());
}

#[test]
fn chunker_handles_very_small_max_size() {
    let text = "Hello World. Goodbye World.";
    let chunks = chunker(1).chunk(text);

    assert_eq!(chunks, vec!["Hello World.", "Goodbye World."]);
}
