//! # precis
//!
//! Factual summaries of long PDF documents at fixed compression ratios.
//!
//! ## The Problem
//!
//! Language models have context windows. Legislative and policy documents
//! don't fit. The document has to be cut into pieces small enough for one
//! request each, but cut where meaning survives: a chunk that stops
//! mid-sentence produces a summary that stops mid-thought.
//!
//! ## The Pipeline
//!
//! ```text
//! 1. Extract    PDF pages -> one newline-joined string
//! 2. Chunk      paragraphs, then sentences, under a character ceiling
//! 3. Summarize  one LLM request per chunk per ratio, in order
//! 4. Render     title + one section per ratio -> output PDF
//! ```
//!
//! A failed request never stops the run. Its chunk gets a visible
//! [`ERROR_SENTINEL`] in the report and the remaining chunks carry on.
//!
//! ## Hierarchical Chunking
//!
//! The chunker keeps the largest unit that fits:
//!
//! ```text
//! Document:  [ P1 ][          P2          ][ P3 ]      ceiling: 40
//!
//! P1 fits    -> chunk
//! P2 too big -> sentences S1..S5, packed greedily:
//!               [S1 S2 S3] [S4 S5]
//! P3 fits    -> chunk
//! ```
//!
//! A sentence that alone exceeds the ceiling stays whole as an oversized
//! chunk. The ceiling is a packing target, not a cut point.
//!
//! ## Quick Start
//!
//! ```rust
//! use precis::{Chunker, ChunkCapacity, HierarchicalChunker};
//!
//! let text = "The act takes effect in May.\n\n\
//!             Section two amends the tax code. It raises the threshold. \
//!             It also indexes it to inflation.";
//!
//! let chunker = HierarchicalChunker::new(ChunkCapacity::new(70).unwrap());
//! let chunks = chunker.chunk(text);
//!
//! assert_eq!(chunks.len(), 3);
//! assert_eq!(chunks[0], "The act takes effect in May.");
//! ```
//!
//! Running the whole pipeline needs an [`LlmClient`]; the `precis` binary
//! wires up [`OpenRouterClient`], [`PdfExtractor`] and [`PdfRenderer`].

mod capacity;
mod config;
mod driver;
mod error;
mod extract;
mod hierarchical;
mod llm;
mod output;
mod pipeline;
mod ratio;
mod render;
mod report;
mod sentence;
mod template;

pub use capacity::ChunkCapacity;
pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use driver::{RatioSummaries, SummaryDriver, ERROR_SENTINEL, SUMMARY_SEPARATOR};
pub use error::{Error, Result};
pub use extract::{PdfExtractor, TextExtractor};
pub use hierarchical::{paragraphs, HierarchicalChunker};
pub use llm::{LlmClient, LlmError, OpenRouterClient};
pub use output::{create_unique, numbered, output_file_name};
pub use pipeline::Pipeline;
pub use ratio::{Ratio, RatioSelector};
pub use render::PdfRenderer;
pub use report::{Renderer, Report, Section};
pub use sentence::sentences;
pub use template::{PromptTemplate, TemplateSet, TemplateStore, PLACEHOLDER};

/// A text chunking strategy.
///
/// The pipeline only needs ordered chunk strings, so strategies are
/// interchangeable:
///
/// ```rust
/// use precis::{Chunker, HierarchicalChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<String> {
///     chunker.chunk(text)
/// }
///
/// let chunks = chunk_document(&HierarchicalChunker::default(), "Hello world. This is a test.");
/// assert_eq!(chunks, vec!["Hello world. This is a test."]);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into ordered, non-overlapping chunks.
    ///
    /// Empty or whitespace-only text yields no chunks.
    fn chunk(&self, text: &str) -> Vec<String>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
