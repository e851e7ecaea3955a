//! Per-ratio instruction templates.
//!
//! Each ratio has one template file, `summary_1_to_<N>.txt`, in a template
//! directory. The file holds the full instruction with a `{text}` placeholder
//! where the chunk goes. There is no built-in fallback: a run that asks for
//! a ratio without a template fails before any work starts.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Ratio, RatioSelector, Result};

/// Placeholder replaced with the chunk text.
pub const PLACEHOLDER: &str = "{text}";

/// An instruction template for one ratio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    ratio: Ratio,
    body: String,
}

impl PromptTemplate {
    /// Create a template from its text.
    ///
    /// Returns `None` if the text lacks the [`PLACEHOLDER`].
    #[must_use]
    pub fn new(ratio: Ratio, body: impl Into<String>) -> Option<Self> {
        let body = body.into();
        body.contains(PLACEHOLDER).then_some(Self { ratio, body })
    }

    /// The ratio this template is for.
    #[must_use]
    pub const fn ratio(&self) -> Ratio {
        self.ratio
    }

    /// Interpolate a chunk into the template.
    ///
    /// ```rust
    /// use precis::{PromptTemplate, Ratio};
    ///
    /// let t = PromptTemplate::new(Ratio::OneTo10, "Summarize:\n\"{text}\"").unwrap();
    /// assert_eq!(t.render("Hello."), "Summarize:\n\"Hello.\"");
    /// ```
    #[must_use]
    pub fn render(&self, chunk: &str) -> String {
        self.body.replace(PLACEHOLDER, chunk)
    }
}

/// Templates for every ratio a run needs, resolved up front.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<Ratio, PromptTemplate>,
}

impl TemplateSet {
    /// Build from already-loaded templates.
    #[must_use]
    pub fn from_templates(templates: impl IntoIterator<Item = PromptTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.ratio, t)).collect(),
        }
    }

    /// The template for `ratio`, if resolved.
    #[must_use]
    pub fn get(&self, ratio: Ratio) -> Option<&PromptTemplate> {
        self.templates.get(&ratio)
    }

    /// Number of resolved templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// A directory of template files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    /// Use templates from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory templates are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the template for `ratio` lives.
    #[must_use]
    pub fn path_for(&self, ratio: Ratio) -> PathBuf {
        self.dir.join(format!("summary_1_to_{}.txt", ratio.denominator()))
    }

    /// Load the template for one ratio.
    pub fn load(&self, ratio: Ratio) -> Result<PromptTemplate> {
        let path = self.path_for(ratio);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::TemplateNotFound {
                    ratio: ratio.to_string(),
                    path,
                });
            }
            Err(source) => return Err(Error::TemplateUnreadable { path, source }),
        };

        debug!(ratio = %ratio, path = %path.display(), "loaded prompt template");
        PromptTemplate::new(ratio, body).ok_or(Error::TemplateMissingPlaceholder { path })
    }

    /// Load every template `selector` needs, failing on the first absent one.
    pub fn resolve(&self, selector: RatioSelector) -> Result<TemplateSet> {
        let templates = selector
            .ratios()
            .into_iter()
            .map(|ratio| self.load(ratio))
            .collect::<Result<Vec<_>>>()?;
        Ok(TemplateSet::from_templates(templates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, TemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_and_render() {
        let (_dir, store) =
            store_with(&[("summary_1_to_20.txt", "Condense 20x:\n{text}\nSummary:")]);

        let template = store.load(Ratio::OneTo20).unwrap();
        assert_eq!(template.ratio(), Ratio::OneTo20);
        assert_eq!(template.render("abc"), "Condense 20x:\nabc\nSummary:");
    }

    #[test]
    fn test_missing_template_fails() {
        let (_dir, store) = store_with(&[]);

        let err = store.load(Ratio::OneTo5).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { ref ratio, .. } if ratio == "1:5"));
    }

    #[test]
    fn test_template_without_placeholder_fails() {
        let (_dir, store) = store_with(&[("summary_1_to_5.txt", "Summarize this.")]);

        assert!(matches!(
            store.load(Ratio::OneTo5),
            Err(Error::TemplateMissingPlaceholder { .. })
        ));
    }

    #[test]
    fn test_resolve_all_requires_every_ratio() {
        let (_dir, store) = store_with(&[
            ("summary_1_to_5.txt", "{text}"),
            ("summary_1_to_10.txt", "{text}"),
            ("summary_1_to_20.txt", "{text}"),
            ("summary_1_to_50.txt", "{text}"),
        ]);

        assert!(store.resolve(RatioSelector::One(Ratio::OneTo10)).is_ok());
        assert!(matches!(
            store.resolve(RatioSelector::All),
            Err(Error::TemplateNotFound { .. })
        ));

        fs::write(store.dir().join("summary_1_to_100.txt"), "{text}").unwrap();
        let set = store.resolve(RatioSelector::All).unwrap();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_bundled_templates_resolve() {
        let store = TemplateStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts"));
        let set = store.resolve(RatioSelector::All).unwrap();
        assert_eq!(set.len(), 5);
    }
}
