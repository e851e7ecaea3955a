//! Hierarchical chunking: paragraphs first, sentences when needed.
//!
//! ## The Algorithm
//!
//! Given a capacity of `100` characters:
//!
//! ```text
//! 1. Split on blank lines (paragraphs). Runs of blank or whitespace-only
//!    lines count as one separator. Empty paragraphs are dropped.
//! 2. For each paragraph:
//!    - fits in 100 chars? emit it as one chunk
//!    - otherwise split it into sentences and pack them greedily,
//!      joined by single spaces, closing a chunk whenever the next
//!      sentence would push it past 100 chars
//! ```
//!
//! Unlike the usual recursive splitter there is no word or character
//! fallback. A sentence that alone exceeds the capacity becomes its own
//! oversized chunk: summarizing a whole sentence that is slightly too long
//! beats summarizing two halves of it.
//!
//! ## Coverage
//!
//! Paragraphs are emitted verbatim (trimmed). Sentence-packed chunks
//! normalize whitespace between sentences to one space and line breaks to
//! spaces. Every non-whitespace character of the input lands in exactly one
//! chunk, in document order.

use crate::sentence::sentences;
use crate::{ChunkCapacity, Chunker};

/// Rough lower bound on sentence length, in bytes, for chunk estimates.
const MIN_SENTENCE_ESTIMATE: usize = 40;

/// Paragraph-then-sentence chunker.
///
/// ## Example
///
/// ```rust
/// use precis::{Chunker, ChunkCapacity, HierarchicalChunker};
///
/// let chunker = HierarchicalChunker::new(ChunkCapacity::new(40).unwrap());
/// let text = "Short paragraph.\n\n\
///             This one is longer. It has three sentences. It must split.";
/// let chunks = chunker.chunk(text);
///
/// assert_eq!(chunks[0], "Short paragraph.");
/// assert_eq!(chunks[1], "This one is longer.");
/// assert_eq!(chunks[2], "It has three sentences. It must split.");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalChunker {
    capacity: ChunkCapacity,
}

impl HierarchicalChunker {
    /// Create a chunker with the given capacity.
    #[must_use]
    pub const fn new(capacity: ChunkCapacity) -> Self {
        Self { capacity }
    }

    /// The configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> ChunkCapacity {
        self.capacity
    }

    /// Greedily pack the sentences of one oversized paragraph.
    fn pack_sentences(&self, paragraph: &str, out: &mut Vec<String>) {
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in sentences(paragraph) {
            let len = sentence.chars().count();

            if current.is_empty() {
                current = sentence;
                current_len = len;
            } else if self.capacity.would_overflow(current_len + 1, len) {
                out.push(std::mem::take(&mut current));
                current = sentence;
                current_len = len;
            } else {
                current.push(' ');
                current.push_str(&sentence);
                current_len += 1 + len;
            }
        }

        if !current.is_empty() {
            out.push(current);
        }
    }
}

impl Chunker for HierarchicalChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }

        let paragraphs = paragraphs(text);
        let mut chunks = Vec::with_capacity(paragraphs.len());

        for paragraph in paragraphs {
            if self.capacity.admits(paragraph.chars().count()) {
                chunks.push(paragraph.to_string());
            } else {
                self.pack_sentences(paragraph, &mut chunks);
            }
        }

        chunks
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        // A lone sentence is never split, so tiny capacities still give few
        // chunks per kilobyte.
        (text_len / self.capacity.max().max(MIN_SENTENCE_ESTIMATE)).max(1)
    }
}

/// Split text on blank lines into trimmed, non-empty paragraphs.
///
/// A line is blank when it holds nothing but whitespace. Consecutive blank
/// lines form a single separator.
#[must_use]
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    // Byte span of the paragraph being collected.
    let mut span: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            if let Some((s, e)) = span.take() {
                result.push(text[s..e].trim());
            }
        } else {
            span = Some(span.map_or((start, offset), |(s, _)| (s, offset)));
        }
    }

    if let Some((s, e)) = span {
        result.push(text[s..e].trim());
    }

    result.retain(|p| !p.is_empty());
    result
}
