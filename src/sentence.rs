//! Sentence segmentation for oversized paragraphs.
//!
//! ## The Hard Part: Finding Sentences
//!
//! Sentence detection seems simple until you encounter:
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! We use Unicode Standard Annex #29 (UAX #29) for sentence segmentation,
//! which handles decimal numbers, ellipses, URLs and lower-case
//! continuations. It is not a trained tokenizer, so some abbreviations still
//! split; the greedy packer re-joins neighbours anyway, so an extra boundary
//! only matters when it lands exactly on a chunk edge.
//!
//! ## Line Breaks
//!
//! PDF extraction wraps lines at the page width, mid-sentence. UAX #29
//! treats every line feed as a hard break, so line breaks inside a paragraph
//! are read as spaces before segmenting.

use unicode_segmentation::UnicodeSegmentation;

/// Split a paragraph into trimmed, non-empty sentences, in order.
///
/// ## Example
///
/// ```rust
/// use precis::sentences;
///
/// let s = sentences("First sentence. Second\nsentence!  Third?");
/// assert_eq!(s, vec!["First sentence.", "Second sentence!", "Third?"]);
/// ```
#[must_use]
pub fn sentences(paragraph: &str) -> Vec<String> {
    if paragraph.trim().is_empty() {
        return vec![];
    }

    let unwrapped = paragraph.replace(['\r', '\n'], " ");

    unwrapped
        .split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
