//! The end-to-end run: extract, chunk, summarize, render.
//!
//! ```text
//! PDF --extract--> text --chunk--> [chunks] --summarize--> {ratio: text}
//!                                                              |
//!                     <stem>_summary_1_to_N.pdf <--render------+
//! ```
//!
//! Every stage must produce something for the next one; an empty result
//! stops the run with a stage-specific error instead of rendering an empty
//! report. Rendering happens in memory and the output file is only created
//! once the bytes exist, so an interrupted or failed run leaves nothing
//! behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::output::{create_unique, output_file_name};
use crate::{
    Chunker, Config, Error, HierarchicalChunker, LlmClient, RatioSelector, Renderer, Report,
    Result, SummaryDriver, TemplateSet, TextExtractor, ERROR_SENTINEL,
};

/// Collaborators and settings for summarization runs.
pub struct Pipeline<'a> {
    config: &'a Config,
    templates: &'a TemplateSet,
    extractor: &'a dyn TextExtractor,
    llm: &'a dyn LlmClient,
    renderer: &'a dyn Renderer,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    /// Wire up a pipeline.
    ///
    /// `templates` must already hold every ratio the runs will ask for;
    /// see [`TemplateStore::resolve`](crate::TemplateStore::resolve).
    #[must_use]
    pub fn new(
        config: &'a Config,
        templates: &'a TemplateSet,
        extractor: &'a dyn TextExtractor,
        llm: &'a dyn LlmClient,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            config,
            templates,
            extractor,
            llm,
            renderer,
            show_progress: false,
        }
    }

    /// Show a progress bar while summarizing.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Summarize `input` at `selector` and write the report into
    /// `output_dir`. Returns the path written.
    pub async fn run(
        &self,
        input: &Path,
        selector: RatioSelector,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }
        let source_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        info!(input = %source_name, ratio = %selector, "starting summarization");

        info!("stage 1/4: extracting text");
        let text = self.extractor.extract(input)?;
        if text.trim().is_empty() {
            return Err(Error::EmptyText(input.to_path_buf()));
        }
        debug!(chars = text.chars().count(), "text extracted");

        info!("stage 2/4: chunking text");
        let chunker = HierarchicalChunker::new(self.config.capacity);
        let chunks = chunker.chunk(&text);
        if chunks.is_empty() {
            return Err(Error::NoChunks);
        }
        let largest = chunks.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let oversized = chunks
            .iter()
            .filter(|c| !self.config.capacity.admits(c.chars().count()))
            .count();
        debug!(chunks = chunks.len(), largest, oversized, "text chunked");
        if oversized > 0 {
            warn!(oversized, "some sentences exceed the chunk size and were kept whole");
        }

        info!(chunks = chunks.len(), "stage 3/4: summarizing");
        let driver = SummaryDriver::new(self.llm, self.templates)
            .with_pacing(self.config.chunk_delay, self.config.ratio_delay)
            .with_progress(self.show_progress);
        let summaries = driver.summarize(&chunks, selector).await?;
        if summaries.is_empty() {
            return Err(Error::NoSummaries);
        }
        let all_failed = summaries
            .in_display_order()
            .all(|(_, text)| text.split(crate::SUMMARY_SEPARATOR).all(|s| s == ERROR_SENTINEL));
        if all_failed {
            warn!("every chunk failed to summarize; the report will only contain error markers");
        }

        info!("stage 4/4: rendering report");
        let report = Report::assemble(&source_name, &summaries);
        let bytes = self.renderer.render(&report)?;

        let target = output_dir.join(output_file_name(input, selector, self.renderer.extension()));
        let (path, mut file) = create_unique(&target)?;
        if let Err(e) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        info!(output = %path.display(), "summary written");
        Ok(path)
    }
}
