use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use tender_service::{Error, ImportRequest, Providers};

use super::{SpyEmbedding, StubEmbedding, TestDatabase};

#[tokio::test]
async fn import_upserts_and_resolves_either_identity_key() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let report = service
		.import(ImportRequest {
			opportunities: vec![
				super::opportunity("op-a", "Dredging survey"),
				super::opportunity("op-b", "Harbor maintenance"),
			],
		})
		.await
		.expect("Import failed.");

	assert_eq!(report.imported_count, 2);
	assert!(!report.reindexed);

	let by_id = service.get("op-a").await.expect("Lookup by id failed.");

	assert_eq!(by_id.id, "op-a");

	let by_solicitation = service.get("SOL-op-b").await.expect("Lookup by number failed.");

	assert_eq!(by_solicitation.id, "op-b");

	let err = service.get("op-missing").await.expect_err("Expected a missing-record error.");

	assert!(matches!(err, Error::NotFound { .. }), "unexpected error: {err}");

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn reimporting_the_same_id_replaces_the_record() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(&service, vec![super::opportunity("op-a", "Old title")]).await;
	super::import_all(&service, vec![super::opportunity("op-a", "New title")]).await;

	let record = service.get("op-a").await.expect("Lookup failed.");

	assert_eq!(record.title, "New title");

	let stats = service.stats().await.expect("Stats failed.");

	assert_eq!(stats.total_count, 1);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn import_invalidates_the_lexical_cache() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(
		&service,
		vec![
			super::opportunity("op-review", "Cyber posture review"),
			super::opportunity("op-audit", "Cyber audit prep"),
		],
	)
	.await;

	let baseline = service.suggest("cyber").await.expect("Suggest failed.");

	assert!(baseline.is_empty());

	// A second "posture" record lifts the token over the frequency floor; the
	// follow-up call must see it without waiting out the cache TTL.
	super::import_all(&service, vec![super::opportunity("op-assess", "Cyber posture assessment")])
		.await;

	let refreshed = service.suggest("cyber").await.expect("Suggest failed.");
	let ranked: Vec<(&str, u64)> =
		refreshed.iter().map(|suggestion| (suggestion.term.as_str(), suggestion.frequency)).collect();

	assert_eq!(ranked, vec![("posture", 2)]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn import_rebuilds_the_semantic_index_only_after_first_build() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let calls = Arc::new(AtomicUsize::new(0));
	let providers =
		Providers::new(Arc::new(SpyEmbedding { dimensions: 3, calls: calls.clone() }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let report = service
		.import(ImportRequest {
			opportunities: vec![
				super::opportunity("op-a", "Executive coaching"),
				super::opportunity("op-b", "Leadership seminars"),
			],
		})
		.await
		.expect("Import failed.");

	assert!(!report.reindexed);
	assert_eq!(calls.load(Ordering::SeqCst), 0);

	service.rebuild_semantic_index().await.expect("Index rebuild failed.");

	assert_eq!(calls.load(Ordering::SeqCst), 1);

	let report = service
		.import(ImportRequest {
			opportunities: vec![super::opportunity("op-c", "Mentoring cohort")],
		})
		.await
		.expect("Import failed.");

	assert!(report.reindexed);
	assert_eq!(calls.load(Ordering::SeqCst), 2);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn invalid_imports_are_rejected_before_any_write() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let err = service
		.import(ImportRequest { opportunities: Vec::new() })
		.await
		.expect_err("Expected an empty-import error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "unexpected error: {err}");

	let mut bad_status = super::opportunity("op-bad", "Mystery lot");

	bad_status.status = "bogus".to_string();

	let err = service
		.import(ImportRequest {
			opportunities: vec![super::opportunity("op-ok", "Fence painting"), bad_status],
		})
		.await
		.expect_err("Expected a status validation error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "unexpected error: {err}");

	let stats = service.stats().await.expect("Stats failed.");

	assert_eq!(stats.total_count, 0);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn blank_status_defaults_to_active() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let mut record = super::opportunity("op-a", "Unlabeled lot");

	record.status = String::new();

	super::import_all(&service, vec![record]).await;

	let stored = service.get("op-a").await.expect("Lookup failed.");

	assert_eq!(stored.status, "active");

	test_db.cleanup().expect("Failed to cleanup test database.");
}
