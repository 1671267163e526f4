//! Corpus validation reports and zone statistics.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::corpus::{discover_json_files, read_units};
use crate::document::{Record, Zone};
use crate::error::Result;

/// Number of issues listed individually in a markdown report.
pub const MAX_LISTED_ISSUES: usize = 10;

/// Number of records per zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneStats {
    counts: BTreeMap<Zone, usize>,
}

impl Default for ZoneStats {
    fn default() -> Self {
        Self { counts: Zone::ALL.into_iter().map(|zone| (zone, 0)).collect() }
    }
}

impl ZoneStats {
    /// Count the zones of `records`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.record(record.zone);
        }
        stats
    }

    /// Count one more unit in `zone`.
    pub fn record(&mut self, zone: Zone) {
        *self.counts.entry(zone).or_default() += 1;
    }

    /// Units counted in `zone`.
    pub fn get(&self, zone: Zone) -> usize {
        self.counts.get(&zone).copied().unwrap_or(0)
    }

    /// Units counted across all zones.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl fmt::Display for ZoneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (zone, count) in &self.counts {
            match zone {
                Zone::Uncategorized => writeln!(f, "Uncategorized: {count} units")?,
                zone => writeln!(f, "Zone {zone}: {count} units")?,
            }
        }
        Ok(())
    }
}

/// Schema check results for a directory of raw units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Directory that was scanned.
    pub dir: PathBuf,
    /// Number of JSON files found.
    pub files: usize,
    /// Number of units found across all files.
    pub units: usize,
    /// Units carrying both `id` and `text_preview`.
    pub valid_units: usize,
    /// One line per problem, in scan order.
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Percentage of valid units, or `None` if there were no units.
    pub fn integrity_rate(&self) -> Option<f64> {
        (self.units > 0).then(|| self.valid_units as f64 / self.units as f64 * 100.0)
    }

    /// Returns `true` if no issues were found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Render the report as markdown.
    pub fn to_markdown(&self, generated_at: DateTime<Utc>) -> String {
        let mut lines = vec![
            "# Data Validation Report".to_string(),
            format!("**Date:** {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            format!("**Directory:** `{}`", self.dir.display()),
            String::new(),
            "---".to_string(),
            "## Summary Statistics".to_string(),
            format!("- **Total JSON Files Scanned:** {}", self.files),
            format!("- **Total Individual Data Units:** {}", self.units),
            format!("- **Successfully Validated Units:** {}", self.valid_units),
            match self.integrity_rate() {
                Some(rate) => format!("- **Integrity Rate:** {rate:.2}%"),
                None => "- **Integrity Rate:** 0%".to_string(),
            },
            String::new(),
            "---".to_string(),
        ];

        if self.issues.is_empty() {
            lines.push("## Quality Assurance".to_string());
            lines.push(
                "All data units passed schema validation. The dataset is ready for ingestion."
                    .to_string(),
            );
        } else {
            lines.push("## Issues Detected".to_string());
            lines.extend(
                self.issues.iter().take(MAX_LISTED_ISSUES).map(|issue| format!("- {issue}")),
            );
            if self.issues.len() > MAX_LISTED_ISSUES {
                lines.push(format!(
                    "- *...and {} more issues.*",
                    self.issues.len() - MAX_LISTED_ISSUES
                ));
            }
        }

        let mut markdown = lines.join("\n");
        markdown.push('\n');
        markdown
    }
}

fn has_mandatory_keys(unit: &Value) -> bool {
    unit.get("id").is_some_and(|id| !id.is_null())
        && unit.get("text_preview").is_some_and(Value::is_string)
}

/// Check every unit under `dir` for the mandatory `id` and `text_preview` keys.
///
/// Unreadable or unparsable files are recorded as issues rather than
/// aborting the scan.
///
/// # Errors
///
/// Returns [`RagError::CorpusError`](crate::RagError::CorpusError) if `dir`
/// does not exist.
pub fn validate_dir(dir: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport { dir: dir.to_path_buf(), ..Default::default() };

    for path in discover_json_files(dir)? {
        report.files += 1;
        let name = path.strip_prefix(dir).unwrap_or(&path).display().to_string();
        let units = match read_units(&path) {
            Ok(units) => units,
            Err(e) => {
                report.issues.push(format!("{name}: {e}"));
                continue;
            }
        };
        for (index, unit) in units.iter().enumerate() {
            report.units += 1;
            if has_mandatory_keys(unit) {
                report.valid_units += 1;
            } else {
                report.issues.push(format!("{name}: unit {index} missing mandatory keys"));
            }
        }
    }

    info!(
        dir = %dir.display(),
        files = report.files,
        units = report.units,
        valid = report.valid_units,
        issues = report.issues.len(),
        "validated corpus"
    );
    Ok(report)
}
