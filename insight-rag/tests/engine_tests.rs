//! End-to-end tests for store building and the query engine.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use insight_rag::{
    Config, EmbeddingProvider, HashingEmbeddingProvider, QueryConfig, QueryEngine, QueryStatus,
    RagError, Record, RecordCatalog, RecordId, Result, StoreBuilder, VectorStore, Zone,
    save_store,
};

/// A two-dimensional provider keyed on a few words, counting every call.
///
/// Boilerplate and "policy" queries point the same way, so boilerplate
/// outranks genuine content unless it is filtered.
#[derive(Default)]
struct KeywordProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for KeywordProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("Copyright") || text.contains("policy") {
            Ok(vec![1.0, 0.0])
        } else if text.contains("government") {
            Ok(vec![0.6, 0.8])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "keyword-stub"
    }
}

fn scenario_records() -> Vec<Record> {
    vec![
        Record::new(1u64, "government safety regulation", Zone::A),
        Record::new(2u64, "Copyright 2020 Apache License", Zone::Uncategorized),
    ]
}

async fn engine_for(
    records: Vec<Record>,
    provider: Arc<KeywordProvider>,
    top_k: usize,
) -> QueryEngine {
    let store = StoreBuilder::new(provider.clone()).build(&records).await.unwrap();
    QueryEngine::builder()
        .config(QueryConfig::builder().top_k(top_k).build().unwrap())
        .embedding_provider(provider)
        .index(Arc::new(store))
        .resolver(Arc::new(RecordCatalog::new(records)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn boilerplate_never_wins_even_when_it_scores_higher() {
    let engine = engine_for(scenario_records(), Arc::new(KeywordProvider::default()), 1).await;

    let result = engine.query("public policy safety", None).await.unwrap();
    assert_eq!(result.status, QueryStatus::Complete);
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].record.id, RecordId::from(1u64));
    assert_eq!(result.hits[0].record.zone, Zone::A);
    // The boilerplate record ranked first and was skipped.
    assert_eq!(result.hits[0].rank, 2);
}

#[tokio::test]
async fn empty_corpus_yields_insufficient_matches() {
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine_for(Vec::new(), provider.clone(), 3).await;
    assert_eq!(engine.index().len(), 0);

    let result = engine.query("anything at all", None).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(result.status, QueryStatus::InsufficientMatches);
}

#[tokio::test]
async fn blank_queries_never_reach_the_encoder() {
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine_for(scenario_records(), provider.clone(), 1).await;
    let calls_after_build = provider.calls.load(Ordering::SeqCst);

    for text in ["", "   ", "\t\n"] {
        assert!(matches!(engine.query(text, None).await, Err(RagError::EmptyQuery)));
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), calls_after_build);
}

#[tokio::test]
async fn zero_vector_in_store_is_reported_on_ranking() {
    let provider = Arc::new(KeywordProvider::default());
    let store = VectorStore::from_parts(
        "keyword-stub",
        2,
        vec![RecordId::from("ok"), RecordId::from("zero")],
        vec![vec![1.0, 0.0], vec![0.0, 0.0]],
    )
    .unwrap();
    let engine = QueryEngine::builder()
        .embedding_provider(provider)
        .index(Arc::new(store))
        .resolver(Arc::new(RecordCatalog::new(Vec::<Record>::new())))
        .build()
        .unwrap();

    let err = engine.query("policy", None).await.unwrap_err();
    match err {
        RagError::DegenerateVector { id, position } => {
            assert_eq!(id.as_str(), "zero");
            assert_eq!(position, 1);
        }
        other => panic!("expected DegenerateVector, got {other:?}"),
    }
}

#[tokio::test]
async fn builder_skips_blank_text_and_keeps_alignment() {
    let provider = Arc::new(KeywordProvider::default());
    let records = vec![
        Record::new("a", "government report", Zone::A),
        Record::new("b", "   ", Zone::B),
        Record::new("c", "policy", Zone::A),
    ];
    let store = StoreBuilder::new(provider).build(&records).await.unwrap();

    let ids: Vec<_> = store.ids().iter().map(RecordId::as_str).collect();
    assert_eq!(ids, ["a", "c"]);
    assert_eq!(store.vectors(), &[vec![0.6f32, 0.8], vec![1.0f32, 0.0]]);
    assert_eq!(store.model(), "keyword-stub");
}

#[tokio::test]
async fn builder_skips_records_that_encode_to_zero_vectors() {
    let provider = Arc::new(HashingEmbeddingProvider::new(384));
    let records = vec![
        Record::new(1u64, "government safety regulation", Zone::A),
        Record::new(2u64, "-----", Zone::Uncategorized),
    ];
    let store = StoreBuilder::new(provider.clone()).build(&records).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.ids()[0], RecordId::from(1u64));

    let engine = QueryEngine::builder()
        .config(QueryConfig::builder().top_k(1).build().unwrap())
        .embedding_provider(provider)
        .index(Arc::new(store))
        .resolver(Arc::new(RecordCatalog::new(records)))
        .build()
        .unwrap();
    let result = engine.query("government safety", None).await.unwrap();
    assert_eq!(result.status, QueryStatus::Complete);
    assert_eq!(result.hits[0].record.id, RecordId::from(1u64));
}

#[tokio::test]
async fn unresolved_ids_are_flagged_and_do_not_count() {
    let provider = Arc::new(KeywordProvider::default());
    let store = StoreBuilder::new(provider.clone())
        .build(&[
            Record::new("stale", "policy memo", Zone::A),
            Record::new("live", "government policy", Zone::A),
        ])
        .await
        .unwrap();
    // "stale" was removed from the corpus after the store was built.
    let engine = QueryEngine::builder()
        .config(QueryConfig::builder().top_k(1).build().unwrap())
        .embedding_provider(provider)
        .index(Arc::new(store))
        .resolver(Arc::new(RecordCatalog::new([Record::new(
            "live",
            "government policy",
            Zone::A,
        )])))
        .build()
        .unwrap();

    let result = engine.query("policy", None).await.unwrap();
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].record.id.as_str(), "live");
    assert_eq!(result.unresolved.len(), 1);
    assert_eq!(result.unresolved[0].id.as_str(), "stale");
    assert_eq!(result.status, QueryStatus::Complete);
}

#[tokio::test]
async fn open_loads_store_and_corpus_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    let corpus_dir = temp.path().join("enriched");
    fs::create_dir_all(&corpus_dir).unwrap();
    fs::write(
        corpus_dir.join("units.json"),
        r#"[{"id": 1, "text_preview": "NHS safety regulation", "metadata": {"zone": "A"}},
            {"id": 2, "text_preview": "Licensed under the Apache License", "metadata": {"zone": "Uncategorized"}},
            {"id": 3, "text_preview": "startup market revenue", "metadata": {"zone": "B"}}]"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.corpus.dir = corpus_dir.clone();
    config.store.path = temp.path().join("store/semantic_vectors.json");
    config.embedding.dimensions = 128;

    let provider = Arc::new(HashingEmbeddingProvider::new(128));
    let corpus = insight_rag::load_corpus(&corpus_dir).unwrap();
    StoreBuilder::new(provider.clone())
        .build_and_persist(&corpus.records, &config.store.path)
        .await
        .unwrap();

    let engine = QueryEngine::open(&config, provider).await.unwrap();
    let result = engine.query("NHS safety regulation", Some(2)).await.unwrap();
    assert_eq!(result.hits[0].record.id.as_str(), "1");
    assert!(result.hits.iter().all(|h| h.record.id.as_str() != "2"));
}

#[tokio::test]
async fn open_refuses_store_from_another_model() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.corpus.dir = temp.path().to_path_buf();
    config.store.path = temp.path().join("semantic_vectors.json");
    save_store(&VectorStore::new("some-other-model", 128), &config.store.path).await.unwrap();

    let provider = Arc::new(HashingEmbeddingProvider::new(128));
    let err = QueryEngine::open(&config, provider).await.err().unwrap();
    assert!(matches!(err, RagError::ModelMismatch { .. }));
}

#[tokio::test]
async fn open_without_store_asks_for_a_build() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.store.path = temp.path().join("missing.json");

    let provider = Arc::new(HashingEmbeddingProvider::new(384));
    let err = QueryEngine::open(&config, provider).await.err().unwrap();
    assert!(matches!(err, RagError::StoreNotFound { .. }));
}
