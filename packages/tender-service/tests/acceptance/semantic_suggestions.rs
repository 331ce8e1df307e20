use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use tender_service::{Error, Providers};

use super::{FlakyEmbedding, KeywordEmbedding, StubEmbedding, TestDatabase};

#[tokio::test]
async fn unbuilt_index_is_a_distinct_error() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(&service, vec![super::opportunity("op-a", "Executive coaching")]).await;

	let err =
		service.suggest_semantic("coaching").await.expect_err("Expected an index-empty error.");

	assert!(matches!(err, Error::IndexEmpty { .. }), "unexpected error: {err}");

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn short_query_short_circuits_before_the_index_check() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let suggestions = service.suggest_semantic("c").await.expect("Suggest failed.");

	assert!(suggestions.is_empty());

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn mines_shared_phrases_from_similar_records() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers =
		Providers::new(Arc::new(KeywordEmbedding { keywords: vec!["coaching".to_string()] }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let mut exec = super::opportunity("op-exec", "Executive coaching engagement");

	exec.description = Some("Leadership development curriculum".to_string());

	let mut cohort = super::opportunity("op-cohort", "Coaching cohort");

	cohort.description = Some("Leadership development seminars".to_string());

	let janitorial = super::opportunity("op-janitorial", "Janitorial supplies");

	super::import_all(&service, vec![exec, cohort, janitorial]).await;

	let report = service.rebuild_semantic_index().await.expect("Index rebuild failed.");

	assert_eq!(report.indexed_count, 3);
	assert_eq!(report.skipped_count, 0);
	assert_eq!(report.error_count, 0);

	let suggestions = service.suggest_semantic("coaching").await.expect("Suggest failed.");
	let terms: Vec<&str> = suggestions.iter().map(|suggestion| suggestion.term.as_str()).collect();

	// Phrases shared by both coaching records survive the frequency floor;
	// ties rank alphabetically and nothing leaks in from the dissimilar
	// janitorial record.
	assert_eq!(terms, vec!["development", "leadership", "leadership development"]);

	for suggestion in &suggestions {
		assert_eq!(suggestion.frequency, 2);
		assert_eq!(suggestion.confidence, 0.95);
		assert!(!suggestion.term.contains("coaching"));
	}

	let phrase = &suggestions[2];

	assert!(phrase.is_phrase);
	assert!(!suggestions[0].is_phrase);

	let mut sample_ids = phrase.sample_ids.clone();

	sample_ids.sort_unstable();

	assert_eq!(sample_ids, vec!["op-cohort", "op-exec"]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn custom_extractor_replaces_the_field_list() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers =
		Providers::new(Arc::new(KeywordEmbedding { keywords: vec!["coaching".to_string()] }));
	let service = super::build_service(cfg, providers)
		.await
		.expect("Failed to build service.")
		.with_index_extractor(|record| record.title.clone());

	let mut series = super::opportunity("op-series", "Wellness coaching series");

	series.description = Some("Leadership development curriculum".to_string());

	let mut cohort = super::opportunity("op-cohort", "Wellness coaching cohort");

	cohort.description = Some("Leadership development seminars".to_string());

	super::import_all(&service, vec![series, cohort]).await;
	service.rebuild_semantic_index().await.expect("Index rebuild failed.");

	let suggestions = service.suggest_semantic("coaching").await.expect("Suggest failed.");
	let terms: Vec<&str> = suggestions.iter().map(|suggestion| suggestion.term.as_str()).collect();

	// Only title text was embedded and mined, so the phrase the descriptions
	// share never shows up.
	assert_eq!(terms, vec!["wellness"]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn provider_failure_after_indexing_is_a_provider_error() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let fail = Arc::new(AtomicBool::new(false));
	let providers =
		Providers::new(Arc::new(FlakyEmbedding { fail: fail.clone(), dimensions: 3 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(
		&service,
		vec![
			super::opportunity("op-a", "Executive coaching"),
			super::opportunity("op-b", "Leadership seminars"),
		],
	)
	.await;
	service.rebuild_semantic_index().await.expect("Index rebuild failed.");

	fail.store(true, Ordering::SeqCst);

	let err = service.suggest_semantic("coaching").await.expect_err("Expected a provider error.");

	assert!(matches!(err, Error::Provider { .. }), "unexpected error: {err}");

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn rebuild_skips_records_without_indexable_text() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(
		&service,
		vec![super::opportunity("op-blank", "   "), super::opportunity("op-lit", "Runway lighting")],
	)
	.await;

	let report = service.rebuild_semantic_index().await.expect("Index rebuild failed.");

	assert_eq!(report.indexed_count, 1);
	assert_eq!(report.skipped_count, 1);
	assert_eq!(report.error_count, 0);

	let stats = service.semantic_index_stats().await;

	assert_eq!(stats.total_items, 1);
	assert_eq!(stats.avg_text_length, "Runway lighting".len() as u64);
	assert_eq!(stats.embedding_dimension, 4);

	test_db.cleanup().expect("Failed to cleanup test database.");
}
