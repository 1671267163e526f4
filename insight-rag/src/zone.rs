//! Keyword-based zone classification and corpus enrichment.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::audit::ZoneStats;
use crate::config::{ZoneConfig, ZoneRule};
use crate::corpus::{discover_json_files, read_units};
use crate::document::Zone;
use crate::error::{RagError, Result};

/// Assigns a [`Zone`] to a text by ordered keyword rules.
///
/// Rules are tried in order and the first rule with a keyword contained in
/// the lowercased text wins, so the configured order is the precedence order
/// (A before B before C by default). Texts matching no rule are
/// [`Zone::Uncategorized`].
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneClassifier {
    rules: Vec<(Zone, Vec<String>)>,
}

impl ZoneClassifier {
    /// Create a classifier from rules in precedence order.
    pub fn new(rules: &[ZoneRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| (rule.zone, rule.keywords.iter().map(|k| k.to_lowercase()).collect()))
            .collect();
        Self { rules }
    }

    /// Create a classifier from the zone section of the configuration.
    pub fn from_config(config: &ZoneConfig) -> Self {
        Self::new(&config.rules)
    }

    /// Classify `text`.
    pub fn classify(&self, text: &str) -> Zone {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword.as_str())))
            .map(|(zone, _)| *zone)
            .unwrap_or(Zone::Uncategorized)
    }
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self::from_config(&ZoneConfig::default())
    }
}

/// Totals from one enrichment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichSummary {
    /// Number of files rewritten.
    pub files: usize,
    /// Units labelled per zone.
    pub zones: ZoneStats,
}

fn unit_text(unit: &Map<String, Value>) -> &str {
    unit.get("text_preview").or_else(|| unit.get("text")).and_then(Value::as_str).unwrap_or("")
}

fn label_unit(unit: &mut Map<String, Value>, zone: Zone) {
    let metadata = unit.entry("metadata").or_insert_with(|| Value::Object(Map::new()));
    if !metadata.is_object() {
        *metadata = Value::Object(Map::new());
    }
    if let Value::Object(fields) = metadata {
        fields.insert("zone".to_string(), Value::String(zone.as_str().to_string()));
    }
}

/// Label every unit under `input` with its zone and write the results to `output`.
///
/// Each input file is written to the same relative path under `output`,
/// with `metadata.zone` set on every unit object. All other fields are
/// preserved. Array elements that are not objects are copied unchanged.
///
/// # Errors
///
/// Returns [`RagError::CorpusError`] if an input file cannot be read or
/// parsed or an output file cannot be written.
pub fn enrich_dir(
    input: &Path,
    output: &Path,
    classifier: &ZoneClassifier,
) -> Result<EnrichSummary> {
    let mut summary = EnrichSummary::default();

    for path in discover_json_files(input)? {
        let mut units = read_units(&path)?;
        for unit in &mut units {
            match unit {
                Value::Object(fields) => {
                    let zone = classifier.classify(unit_text(fields));
                    label_unit(fields, zone);
                    summary.zones.record(zone);
                }
                _ => warn!(file = %path.display(), "leaving non-object unit unlabelled"),
            }
        }

        let relative = path.strip_prefix(input).unwrap_or(&path);
        let target = output.join(relative);
        write_units(&target, units)?;
        summary.files += 1;
    }

    info!(
        input = %input.display(),
        output = %output.display(),
        files = summary.files,
        units = summary.zones.total(),
        "enriched corpus"
    );
    Ok(summary)
}

fn write_units(target: &Path, units: Vec<Value>) -> Result<()> {
    let to_error = |message: String| RagError::CorpusError { path: target.to_path_buf(), message };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| to_error(e.to_string()))?;
    }
    let json = serde_json::to_string_pretty(&Value::Array(units))
        .map_err(|e| to_error(format!("serialization failed: {e}")))?;
    fs::write(target, json).map_err(|e| to_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let classifier = ZoneClassifier::default();
        // "safety" (A) and "market" (B) both match; A takes precedence.
        assert_eq!(classifier.classify("Market safety review"), Zone::A);
        assert_eq!(classifier.classify("Startups raised REVENUE"), Zone::B);
        assert_eq!(classifier.classify("workforce training"), Zone::C);
        assert_eq!(classifier.classify("weather report"), Zone::Uncategorized);
    }

    #[test]
    fn custom_rule_order_changes_precedence() {
        let classifier = ZoneClassifier::new(&[
            ZoneRule { zone: Zone::C, keywords: vec!["Skills".to_string()] },
            ZoneRule { zone: Zone::A, keywords: vec!["policy".to_string()] },
        ]);
        assert_eq!(classifier.classify("skills policy"), Zone::C);
    }

    #[test]
    fn enrichment_sets_zone_and_preserves_fields() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(
            input.join("units.json"),
            r#"[{"id": 1, "nurse": "n1", "text_preview": "NHS staffing"},
                {"id": 2, "text_preview": "nothing here", "metadata": {"source": "p3"}}]"#,
        )
        .unwrap();

        let summary = enrich_dir(&input, &output, &ZoneClassifier::default()).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.zones.get(Zone::A), 1);
        assert_eq!(summary.zones.get(Zone::Uncategorized), 1);

        let written: Value =
            serde_json::from_str(&fs::read_to_string(output.join("units.json")).unwrap()).unwrap();
        assert_eq!(written[0]["nurse"], "n1");
        assert_eq!(written[0]["metadata"]["zone"], "A");
        assert_eq!(written[1]["metadata"]["source"], "p3");
        assert_eq!(written[1]["metadata"]["zone"], "Uncategorized");
    }
}
