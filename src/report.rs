/// Per-batch report of what a flow read, skipped and produced.
///
/// Lets a caller tell "no matching inputs" (nothing discovered at all) apart
/// from "some inputs unreadable" (skips present), and lists the location
/// groups that were drawn without a difference panel because their
/// reference was missing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Frequency,
    Profile,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Frequency => "frequency",
            Flow::Profile => "profile",
        }
    }
}

/// An input that was read successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedInput {
    pub path: PathBuf,
    pub series: String,
    pub points: usize,
}

/// An input that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: String,
}

/// A group whose reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreferencedGroup {
    pub group: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub flow: Flow,
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub loaded: Vec<LoadedInput>,
    pub skipped: Vec<SkippedInput>,
    pub groups_without_reference: Vec<UnreferencedGroup>,
    /// Images written, or that would have been written in a dry run.
    pub rendered: Vec<PathBuf>,
}

impl BatchReport {
    pub fn new(flow: Flow, dry_run: bool) -> Self {
        BatchReport {
            flow,
            generated_at: Utc::now(),
            dry_run,
            loaded: Vec::new(),
            skipped: Vec::new(),
            groups_without_reference: Vec::new(),
            rendered: Vec::new(),
        }
    }

    pub fn record_loaded(&mut self, path: &Path, series: &str, points: usize) {
        self.loaded.push(LoadedInput {
            path: path.to_path_buf(),
            series: series.to_string(),
            points,
        });
    }

    pub fn record_skipped(&mut self, path: &Path, reason: impl Into<String>) {
        self.skipped.push(SkippedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        });
    }

    pub fn record_unreferenced(&mut self, group: &str, reason: impl Into<String>) {
        self.groups_without_reference.push(UnreferencedGroup {
            group: group.to_string(),
            reason: reason.into(),
        });
    }

    pub fn record_rendered(&mut self, path: PathBuf) {
        self.rendered.push(path);
    }

    /// Nothing matched the filters: no input was read or skipped.
    pub fn is_empty_batch(&self) -> bool {
        self.loaded.is_empty() && self.skipped.is_empty()
    }

    /// At least one matching input could not be used.
    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} loaded, {} skipped, {} without reference, {} image(s){}",
            self.flow.as_str(),
            self.loaded.len(),
            self.skipped.len(),
            self.groups_without_reference.len(),
            self.rendered.len(),
            if self.dry_run { " (dry run)" } else { "" }
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_versus_skips() {
        let mut report = BatchReport::new(Flow::Frequency, false);
        assert!(report.is_empty_batch());
        assert!(!report.has_skips());

        report.record_skipped(Path::new("a/uitvoer/hfreq.txt"), "has 1 column(s)");
        assert!(!report.is_empty_batch());
        assert!(report.has_skips());

        report.record_loaded(Path::new("b/uitvoer/hfreq.txt"), "2023-totaal-met", 6);
        assert_eq!(report.loaded[0].points, 6);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut report = BatchReport::new(Flow::Profile, true);
        report.record_loaded(Path::new("x.csv"), "Defintf", 3);
        report.record_rendered(PathBuf::from("LP_x.png"));
        let summary = report.summary();
        assert!(summary.starts_with("profile: 1 loaded, 0 skipped"));
        assert!(summary.ends_with("(dry run)"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut report = BatchReport::new(Flow::Frequency, false);
        report.record_unreferenced("as_0001 (as, WS)", "no series containing '2023-totaal-met'");
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["flow"], "frequency");
        assert_eq!(value["groups_without_reference"][0]["group"], "as_0001 (as, WS)");
        assert!(value["generated_at"].is_string());
    }
}
