//! Summarization driver.
//!
//! Walks the chunks in order, one request at a time, and keeps going when a
//! request fails: the failed position gets [`ERROR_SENTINEL`] so the output
//! stays aligned with the input and the rest of a long run is not lost.
//!
//! ```text
//! chunks:     [c0, c1, c2]
//! responses:  [ok, err, ok]
//! summaries:  ["s0", "[Error during summarization]", "s2"]
//! ```
//!
//! For [`RatioSelector::All`] the whole pass repeats per ratio, coarsest
//! first, with a pause between passes to stay under provider rate limits.

use std::collections::BTreeMap;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{Error, LlmClient, PromptTemplate, Ratio, RatioSelector, Result, TemplateSet};

/// Placeholder for a chunk whose summary could not be generated.
pub const ERROR_SENTINEL: &str = "[Error during summarization]";

/// Separator between chunk summaries of one ratio.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

/// Joined summaries per ratio, plus the selector that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioSummaries {
    selector: RatioSelector,
    by_ratio: BTreeMap<Ratio, String>,
}

impl RatioSummaries {
    /// Create an empty collection for `selector`.
    #[must_use]
    pub fn new(selector: RatioSelector) -> Self {
        Self {
            selector,
            by_ratio: BTreeMap::new(),
        }
    }

    /// Record the joined summary text for a ratio.
    pub fn insert(&mut self, ratio: Ratio, text: impl Into<String>) {
        self.by_ratio.insert(ratio, text.into());
    }

    /// The selector the summaries were produced for.
    #[must_use]
    pub const fn selector(&self) -> RatioSelector {
        self.selector
    }

    /// Summary text for a ratio.
    #[must_use]
    pub fn get(&self, ratio: Ratio) -> Option<&str> {
        self.by_ratio.get(&ratio).map(String::as_str)
    }

    /// Present ratios in display order (coarsest first), with their text.
    pub fn in_display_order(&self) -> impl Iterator<Item = (Ratio, &str)> + '_ {
        Ratio::DESCENDING
            .into_iter()
            .filter_map(|ratio| self.get(ratio).map(|text| (ratio, text)))
    }

    /// Number of ratios with a summary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_ratio.len()
    }

    /// Whether nothing was summarized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_ratio.is_empty()
    }
}

/// Sends chunks to an [`LlmClient`] and collects ordered summaries.
pub struct SummaryDriver<'a> {
    llm: &'a dyn LlmClient,
    templates: &'a TemplateSet,
    chunk_delay: Duration,
    ratio_delay: Duration,
    show_progress: bool,
}

impl<'a> SummaryDriver<'a> {
    /// Create a driver with no pacing and no progress bar.
    #[must_use]
    pub fn new(llm: &'a dyn LlmClient, templates: &'a TemplateSet) -> Self {
        Self {
            llm,
            templates,
            chunk_delay: Duration::ZERO,
            ratio_delay: Duration::ZERO,
            show_progress: false,
        }
    }

    /// Pause `chunk_delay` between requests and `ratio_delay` between ratio
    /// passes.
    #[must_use]
    pub fn with_pacing(mut self, chunk_delay: Duration, ratio_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self.ratio_delay = ratio_delay;
        self
    }

    /// Show a terminal progress bar per pass.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Summarize every chunk with one template.
    ///
    /// The result has exactly one entry per chunk, in chunk order.
    pub async fn summarize_chunks(
        &self,
        chunks: &[String],
        template: &PromptTemplate,
    ) -> Vec<String> {
        let ratio = template.ratio();
        let progress = self.progress_bar(chunks.len() as u64, ratio);
        let mut summaries = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                pause(self.chunk_delay).await;
            }

            let prompt = template.render(chunk);
            match self.llm.complete(&prompt).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    warn!(chunk = i + 1, ratio = %ratio, error = %e, "chunk summarization failed");
                    summaries.push(ERROR_SENTINEL.to_string());
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        summaries
    }

    /// Summarize every chunk for every ratio in `selector`.
    ///
    /// Every template is looked up before the first request, so a missing
    /// one fails the run without any LLM calls.
    pub async fn summarize(
        &self,
        chunks: &[String],
        selector: RatioSelector,
    ) -> Result<RatioSummaries> {
        let passes = selector
            .ratios()
            .into_iter()
            .map(|ratio| {
                self.templates
                    .get(ratio)
                    .map(|template| (ratio, template))
                    .ok_or_else(|| Error::TemplateNotResolved(ratio.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut result = RatioSummaries::new(selector);

        for (i, (ratio, template)) in passes.into_iter().enumerate() {
            if i > 0 {
                info!(
                    delay_secs = self.ratio_delay.as_secs(),
                    "pausing before next ratio"
                );
                pause(self.ratio_delay).await;
            }

            info!(ratio = %ratio, chunks = chunks.len(), model = self.llm.model(), "summarizing");
            let summaries = self.summarize_chunks(chunks, template).await;
            let failed = summaries.iter().filter(|s| *s == ERROR_SENTINEL).count();
            if failed > 0 {
                warn!(ratio = %ratio, failed, "some chunks could not be summarized");
            }

            if !summaries.is_empty() {
                result.insert(ratio, summaries.join(SUMMARY_SEPARATOR));
            }
        }

        Ok(result)
    }

    fn progress_bar(&self, len: u64, ratio: Ratio) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        let template = "{msg} [{bar:40}] {pos}/{len} chunks ({elapsed})";
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(format!("Summarizing at {ratio}"));
        bar
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::LlmError;

    /// Echoes the prompt back, failing on prompts that contain "FAIL".
    #[derive(Default)]
    struct EchoLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for EchoLlm {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("FAIL") {
                Err(LlmError::Parse("boom".into()))
            } else {
                Ok(format!("summary of {prompt}"))
            }
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn templates() -> TemplateSet {
        TemplateSet::from_templates(
            Ratio::DESCENDING
                .into_iter()
                .map(|r| PromptTemplate::new(r, format!("{}|{{text}}", r.denominator())).unwrap()),
        )
    }

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_become_sentinels_in_place() {
        let llm = EchoLlm::default();
        let templates = templates();
        let driver = SummaryDriver::new(&llm, &templates);
        let template = templates.get(Ratio::OneTo10).unwrap();

        let out = driver
            .summarize_chunks(&chunks(&["a", "FAIL", "c"]), template)
            .await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], "summary of 10|a");
        assert_eq!(out[1], ERROR_SENTINEL);
        assert_eq!(out[2], "summary of 10|c");
    }

    #[tokio::test]
    async fn test_single_ratio_joins_summaries() {
        let llm = EchoLlm::default();
        let templates = templates();
        let driver = SummaryDriver::new(&llm, &templates);

        let out = driver
            .summarize(&chunks(&["a", "b"]), RatioSelector::One(Ratio::OneTo5))
            .await
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out.get(Ratio::OneTo5), Some("summary of 5|a\n\nsummary of 5|b"));
    }

    #[tokio::test]
    async fn test_all_ratios_call_once_per_chunk_per_ratio() {
        let llm = EchoLlm::default();
        let templates = templates();
        let driver = SummaryDriver::new(&llm, &templates);

        let out = driver
            .summarize(&chunks(&["a", "b", "c"]), RatioSelector::All)
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 15);
        // Passes run coarsest first, chunks in order within a pass.
        assert_eq!(prompts[0], "100|a");
        assert_eq!(prompts[2], "100|c");
        assert_eq!(prompts[3], "50|a");
        assert_eq!(prompts[14], "5|c");
        assert_eq!(out.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_chunks_and_ratios() {
        let llm = EchoLlm::default();
        let templates = templates();
        let driver = SummaryDriver::new(&llm, &templates)
            .with_pacing(Duration::from_secs(2), Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        driver
            .summarize(&chunks(&["a", "b", "c"]), RatioSelector::All)
            .await
            .unwrap();

        // 5 passes x 2 chunk gaps x 2s + 4 ratio gaps x 5s
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(40), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(41), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_missing_template_is_an_error() {
        let llm = EchoLlm::default();
        let templates = TemplateSet::default();
        let driver = SummaryDriver::new(&llm, &templates);

        let err = driver
            .summarize(&chunks(&["a"]), RatioSelector::One(Ratio::OneTo20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TemplateNotResolved(_)));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_finest_template_fails_before_any_pass() {
        let llm = EchoLlm::default();
        let templates = TemplateSet::from_templates(
            [Ratio::OneTo100, Ratio::OneTo50, Ratio::OneTo20, Ratio::OneTo10]
                .into_iter()
                .map(|r| PromptTemplate::new(r, "{text}").unwrap()),
        );
        let driver = SummaryDriver::new(&llm, &templates);

        let err = driver
            .summarize(&chunks(&["a", "b"]), RatioSelector::All)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TemplateNotResolved(ref r) if r == "1:5"));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_display_order_ignores_insertion_order() {
        let mut summaries = RatioSummaries::new(RatioSelector::All);
        summaries.insert(Ratio::OneTo5, "five");
        summaries.insert(Ratio::OneTo100, "hundred");
        summaries.insert(Ratio::OneTo20, "twenty");

        let order: Vec<Ratio> = summaries.in_display_order().map(|(r, _)| r).collect();
        assert_eq!(order, vec![Ratio::OneTo100, Ratio::OneTo20, Ratio::OneTo5]);
    }
}
