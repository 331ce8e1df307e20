use std::sync::Arc;

use tender_service::{Providers, SearchStrategy};

use super::{StubEmbedding, TestDatabase};

#[tokio::test]
async fn or_query_splits_terms_and_sums_term_scores() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let mut title_hit = super::opportunity("op-cyber", "Cybersecurity assessment");

	title_hit.posted_date = Some("2025-04-01T00:00:00Z".to_string());

	let mut both_hit = super::opportunity("op-both", "Cyber range operations");

	both_hit.description = Some("Includes cloud migration of training enclaves.".to_string());
	both_hit.posted_date = Some("2025-03-01T00:00:00Z".to_string());

	let mut description_hit = super::opportunity("op-datacenter", "Data center consolidation");

	description_hit.description =
		Some("Moves legacy workloads onto cloud infrastructure.".to_string());
	description_hit.posted_date = Some("2025-05-01T00:00:00Z".to_string());

	let unrelated = super::opportunity("op-janitorial", "Janitorial staffing");

	super::import_all(&service, vec![title_hit, both_hit, description_hit, unrelated]).await;

	let response =
		service.search(super::search_request("cyber OR cloud")).await.expect("Search failed.");
	let ids: Vec<&str> = response.opportunities.iter().map(|record| record.id.as_str()).collect();

	// Matching both terms beats the weighted original term alone, which beats
	// an expansion-weight description match; the unrelated record is absent.
	assert_eq!(ids, vec!["op-both", "op-cyber", "op-datacenter"]);
	assert_eq!(response.total_count, 3);
	assert_eq!(response.total_unfiltered_count, 3);
	assert!(!response.has_more);

	let info = response.search_info.expect("An OR search reports its strategy.");

	assert_eq!(info.search_type, SearchStrategy::Or);
	assert_eq!(info.terms_used, vec!["cyber".to_string(), "cloud".to_string()]);
	assert_eq!(info.original_term, "cyber OR cloud");

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn quoted_or_segments_are_unwrapped() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");
	let mut record = super::opportunity("op-radar", "Radar sustainment");

	record.posted_date = Some("2025-05-01T00:00:00Z".to_string());

	super::import_all(&service, vec![record]).await;

	let response = service
		.search(super::search_request("\"radar\" or \"sonar\""))
		.await
		.expect("Search failed.");
	let info = response.search_info.expect("An OR search reports its strategy.");

	assert_eq!(info.terms_used, vec!["radar".to_string(), "sonar".to_string()]);
	assert_eq!(response.total_count, 1);
	assert_eq!(response.opportunities[0].id, "op-radar");

	test_db.cleanup().expect("Failed to cleanup test database.");
}
