//! Tests for the command handlers behind the `insight` binary.

use std::fs;

use insight_cli::commands::{self, AuditArgs, EnrichArgs, ValidateArgs};
use insight_rag::{Config, QueryEngine, Zone, load_store, provider_from_config};

fn write_raw_units(dir: &std::path::Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("report.json"),
        r#"[{"id": 1, "text_preview": "Government safety regulation for the NHS"},
            {"id": 2, "text_preview": "Startups attracted record investment"},
            {"id": 3, "text_preview": "Automation is changing jobs and skills"},
            {"id": 4, "text_preview": "Copyright 2020 NVIDIA Corporation"}]"#,
    )
    .unwrap();
}

fn config_in(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.corpus.dir = root.join("enriched");
    config.store.path = root.join("semantic_vectors.json");
    config.embedding.dimensions = 256;
    config
}

#[tokio::test]
async fn enrich_build_and_query_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let raw = temp.path().join("chunks");
    write_raw_units(&raw);
    let config = config_in(temp.path());

    commands::enrich(&config, &EnrichArgs { input: raw, output: None }).unwrap();
    let stats = commands::audit(&config, &AuditArgs { dir: None }).unwrap();
    assert_eq!(stats.get(Zone::A), 1);
    assert_eq!(stats.get(Zone::B), 1);
    assert_eq!(stats.get(Zone::C), 1);
    assert_eq!(stats.get(Zone::Uncategorized), 1);

    commands::build(&config).await.unwrap();
    assert_eq!(load_store(&config.store.path).await.unwrap().len(), 4);

    let provider = provider_from_config(&config.embedding).unwrap();
    let engine = QueryEngine::open(&config, provider).await.unwrap();
    let result = engine.query("NHS safety regulation", Some(1)).await.unwrap();
    assert_eq!(result.hits[0].record.id.as_str(), "1");
    assert_eq!(result.hits[0].record.zone, Zone::A);
}

#[test]
fn validate_writes_a_markdown_report() {
    let temp = tempfile::tempdir().unwrap();
    let raw = temp.path().join("chunks");
    write_raw_units(&raw);
    let report = temp.path().join("validation_report.md");

    commands::validate(&ValidateArgs { dir: raw, report: report.clone() }).unwrap();

    let markdown = fs::read_to_string(report).unwrap();
    assert!(markdown.contains("- **Total Individual Data Units:** 4"));
    assert!(markdown.contains("All data units passed schema validation."));
}

#[test]
fn missing_config_file_uses_defaults_only_when_omitted() {
    assert_eq!(commands::load_config(None).unwrap(), Config::default());

    let temp = tempfile::tempdir().unwrap();
    assert!(commands::load_config(Some(&temp.path().join("absent.toml"))).is_err());
}
