use std::sync::Arc;

use tender_service::Providers;

use super::{StubEmbedding, TestDatabase};

#[tokio::test]
async fn suggests_frequent_terms_from_matching_records() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let mut defense = super::opportunity("op-defense", "Cyber defense staffing");

	defense.description = Some("Cybersecurity compliance audits".to_string());

	let mut range = super::opportunity("op-range", "Cyber range support");

	range.description = Some("Cybersecurity compliance training".to_string());

	let grounds = super::opportunity("op-grounds", "Groundskeeping");

	super::import_all(&service, vec![defense, range, grounds]).await;

	let suggestions = service.suggest("cyber").await.expect("Suggest failed.");
	let ranked: Vec<(&str, u64)> =
		suggestions.iter().map(|suggestion| (suggestion.term.as_str(), suggestion.frequency)).collect();

	// Tokens appearing only once corpus-wide ("defense", "audits", ...) stay
	// below the frequency floor; ties rank alphabetically.
	assert_eq!(ranked, vec![("compliance", 2), ("cybersecurity", 2)]);
	assert!(suggestions.iter().all(|suggestion| suggestion.term != "cyber"));

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn too_short_queries_return_nothing() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	super::import_all(&service, vec![super::opportunity("op-a", "Cyber defense")]).await;

	let suggestions = service.suggest(" c ").await.expect("Suggest failed.");

	assert!(suggestions.is_empty());

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn or_queries_draw_terms_from_either_match_set() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let mut radar = super::opportunity("op-radar", "Radar upgrades");

	radar.description = Some("Phased array modernization".to_string());

	let mut sonar = super::opportunity("op-sonar", "Sonar refit");

	sonar.description = Some("Towed array modernization".to_string());

	let fence = super::opportunity("op-fence", "Fence painting");

	super::import_all(&service, vec![radar, sonar, fence]).await;

	let suggestions = service.suggest("radar or sonar").await.expect("Suggest failed.");
	let ranked: Vec<(&str, u64)> =
		suggestions.iter().map(|suggestion| (suggestion.term.as_str(), suggestion.frequency)).collect();

	assert_eq!(ranked, vec![("array", 2), ("modernization", 2)]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}
