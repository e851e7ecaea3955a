//! Report assembly.
//!
//! A [`Report`] is the renderer-independent shape of the output document:
//! a title naming the source, then one section per ratio.

use crate::{RatioSummaries, Result};

/// One block of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Subheading, omitted for single-ratio reports.
    pub heading: Option<String>,
    /// Summary text. Blank lines separate paragraphs.
    pub body: String,
}

/// The assembled summary document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Document title.
    pub title: String,
    /// Sections in display order.
    pub sections: Vec<Section>,
}

impl Report {
    /// Assemble the report for `source_name` from per-ratio summaries.
    ///
    /// Sections follow the fixed coarsest-first order regardless of the
    /// order summaries were produced in. A single-ratio run gets no
    /// subheading.
    ///
    /// ```rust
    /// use precis::{Ratio, RatioSelector, RatioSummaries, Report};
    ///
    /// let mut summaries = RatioSummaries::new(RatioSelector::All);
    /// summaries.insert(Ratio::OneTo5, "long");
    /// summaries.insert(Ratio::OneTo50, "short");
    ///
    /// let report = Report::assemble("bill.pdf", &summaries);
    /// assert_eq!(report.title, "Factual Summary of: bill.pdf");
    /// assert_eq!(report.sections[0].heading.as_deref(), Some("Summary at 1:50 Ratio"));
    /// assert_eq!(report.sections[1].heading.as_deref(), Some("Summary at 1:5 Ratio"));
    /// ```
    #[must_use]
    pub fn assemble(source_name: &str, summaries: &RatioSummaries) -> Self {
        let labeled = summaries.selector().is_all();
        let sections = summaries
            .in_display_order()
            .map(|(ratio, text)| Section {
                heading: labeled.then(|| format!("Summary at {ratio} Ratio")),
                body: text.to_string(),
            })
            .collect();

        Self {
            title: format!("Factual Summary of: {source_name}"),
            sections,
        }
    }
}

/// Turns a [`Report`] into the bytes of an output document.
pub trait Renderer: Send + Sync {
    /// Render the whole report in memory.
    fn render(&self, report: &Report) -> Result<Vec<u8>>;

    /// File extension of the rendered output, without the dot.
    fn extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ratio, RatioSelector};

    #[test]
    fn test_single_ratio_has_no_heading() {
        let mut summaries = RatioSummaries::new(RatioSelector::One(Ratio::OneTo20));
        summaries.insert(Ratio::OneTo20, "body text");

        let report = Report::assemble("act.pdf", &summaries);

        assert_eq!(report.title, "Factual Summary of: act.pdf");
        assert_eq!(
            report.sections,
            vec![Section {
                heading: None,
                body: "body text".into()
            }]
        );
    }

    #[test]
    fn test_all_ratios_in_fixed_order() {
        let mut summaries = RatioSummaries::new(RatioSelector::All);
        for ratio in Ratio::DESCENDING.into_iter().rev() {
            summaries.insert(ratio, ratio.to_string());
        }

        let report = Report::assemble("act.pdf", &summaries);
        let headings: Vec<&str> = report
            .sections
            .iter()
            .filter_map(|s| s.heading.as_deref())
            .collect();

        assert_eq!(
            headings,
            vec![
                "Summary at 1:100 Ratio",
                "Summary at 1:50 Ratio",
                "Summary at 1:20 Ratio",
                "Summary at 1:10 Ratio",
                "Summary at 1:5 Ratio",
            ]
        );
        assert_eq!(report.sections[0].body, "1:100");
    }
}
