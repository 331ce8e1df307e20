use std::sync::Arc;

use tender_service::{Providers, SearchMode, SearchRequest, SearchStrategy};

use super::{StubEmbedding, TestDatabase};

#[tokio::test]
async fn known_phrase_queries_search_the_canonical_phrase() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let phrase_hit =
		super::opportunity("op-webdev", "Web development services for public affairs");
	let near_miss = super::opportunity("op-design", "Web design refresh");

	super::import_all(&service, vec![phrase_hit, near_miss]).await;

	let response = service
		.search(super::search_request("custom web development"))
		.await
		.expect("Search failed.");
	let ids: Vec<&str> = response.opportunities.iter().map(|record| record.id.as_str()).collect();

	// The canonical phrase must appear contiguously; sharing one word of it
	// is not enough.
	assert_eq!(ids, vec!["op-webdev"]);
	assert_eq!(response.total_unfiltered_count, 1);

	let info = response.search_info.expect("A phrase search reports its strategy.");

	assert_eq!(info.search_type, SearchStrategy::Phrase);
	assert_eq!(info.terms_used, vec!["web development".to_string()]);
	assert_eq!(info.original_term, "custom web development");

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn word_inside_a_known_phrase_searches_that_phrase() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let cfg = super::test_config(test_db.dsn());
	let providers = Providers::new(Arc::new(StubEmbedding { dimensions: 4 }));
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	let phrase_hit = super::opportunity("op-desk", "Help desk consolidation");
	let word_hit = super::opportunity("op-tools", "Helpful diagnostic tools");

	super::import_all(&service, vec![phrase_hit, word_hit]).await;

	let auto = service.search(super::search_request("help")).await.expect("Search failed.");
	let auto_ids: Vec<&str> =
		auto.opportunities.iter().map(|record| record.id.as_str()).collect();
	let info = auto.search_info.expect("A phrase search reports its strategy.");

	assert_eq!(auto_ids, vec!["op-desk"]);
	assert_eq!(info.terms_used, vec!["help desk".to_string()]);

	// Exact mode searches the raw word instead, so the substring match on
	// "Helpful" comes back too.
	let exact = SearchRequest {
		query: "help".to_string(),
		mode: SearchMode::Exact,
		..SearchRequest::default()
	};
	let exact = service.search(exact).await.expect("Search failed.");

	assert_eq!(exact.total_count, 2);
	assert_eq!(
		exact.search_info.expect("An exact search reports its strategy.").search_type,
		SearchStrategy::Exact
	);

	test_db.cleanup().expect("Failed to cleanup test database.");
}
