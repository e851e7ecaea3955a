//! Output file naming.
//!
//! The output name is derived from the input name and the ratio selection:
//!
//! ```text
//! budget_2024.pdf, --ratio 20   ->  budget_2024_summary_1_to_20.pdf
//! budget_2024.pdf, --ratio all  ->  budget_2024_summary_all_ratios.pdf
//! ```
//!
//! An existing file is never overwritten. Taken names get a numeric suffix,
//! `name (1).pdf`, `name (2).pdf`, and so on. Files are opened with
//! create-new semantics, so a name that appears between the check and the
//! write is skipped too.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::RatioSelector;

/// Derive the output file name for `input` and `selector`.
///
/// ```rust
/// use precis::{output_file_name, Ratio, RatioSelector};
/// use std::path::Path;
///
/// let selector = RatioSelector::One(Ratio::OneTo20);
/// let name = output_file_name(Path::new("docs/act.pdf"), selector, "pdf");
/// assert_eq!(name, "act_summary_1_to_20.pdf");
/// ```
#[must_use]
pub fn output_file_name(input: &Path, selector: RatioSelector, extension: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    match selector {
        RatioSelector::One(ratio) => {
            format!("{stem}_summary_1_to_{}.{extension}", ratio.denominator())
        }
        RatioSelector::All => format!("{stem}_summary_all_ratios.{extension}"),
    }
}

/// The `n`th alternative of `path`: `report.pdf` -> `report (n).pdf`.
#[must_use]
pub fn numbered(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem} ({n}).{}", ext.to_string_lossy()),
        None => format!("{stem} ({n})"),
    };
    path.with_file_name(name)
}

/// Create a new file at `path`, or at the first free numbered alternative.
///
/// Returns the path actually used together with the open file.
pub fn create_unique(path: &Path) -> io::Result<(PathBuf, File)> {
    let mut candidate = path.to_path_buf();
    let mut n = 0;

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                n += 1;
                candidate = numbered(path, n);
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::Ratio;

    #[test]
    fn test_output_file_name() {
        let input = Path::new("/tmp/in/Budget Act.pdf");
        assert_eq!(
            output_file_name(input, RatioSelector::One(Ratio::OneTo100), "pdf"),
            "Budget Act_summary_1_to_100.pdf"
        );
        assert_eq!(
            output_file_name(input, RatioSelector::All, "pdf"),
            "Budget Act_summary_all_ratios.pdf"
        );
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered(Path::new("out/report.pdf"), 1), Path::new("out/report (1).pdf"));
        assert_eq!(numbered(Path::new("report"), 3), Path::new("report (3)"));
    }

    #[test]
    fn test_create_unique_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.pdf");

        let (path, _file) = create_unique(&target).unwrap();
        assert_eq!(path, target);
    }

    #[test]
    fn test_create_unique_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.pdf");
        fs::write(&target, b"original").unwrap();

        let (first, _f1) = create_unique(&target).unwrap();
        assert_eq!(first, dir.path().join("report (1).pdf"));

        let (second, _f2) = create_unique(&target).unwrap();
        assert_eq!(second, dir.path().join("report (2).pdf"));

        assert_eq!(fs::read(&target).unwrap(), b"original");
    }
}
