use serde::Deserialize;
use serde_json::{Map, Value};

/// Record fields a substring search may target. Config values are validated
/// against this list so column names never come from the wire.
pub const SEARCHABLE_FIELDS: [&str; 6] =
	["title", "description", "naics_description", "agency", "office", "solicitation_number"];

/// Record fields the semantic indexer may concatenate.
pub const INDEXABLE_FIELDS: [&str; 10] = [
	"title",
	"description",
	"agency",
	"office",
	"naics_code",
	"naics_description",
	"set_aside_description",
	"place_of_performance",
	"contact_info",
	"solicitation_number",
];

#[derive(Debug, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub suggest: Suggest,
	#[serde(default)]
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub bind_http: String,
	pub bind_admin: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self {
			bind_http: "127.0.0.1:8080".to_string(),
			bind_admin: "127.0.0.1:8081".to_string(),
			log_level: "info".to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub path: String,
	#[serde(default = "default_max_connections")]
	pub max_connections: u32,
	#[serde(default = "default_busy_timeout_ms")]
	pub busy_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub fields: Vec<String>,
	pub max_candidates: u32,
	pub default_limit: u32,
	pub max_limit: u32,
	/// Extends the compiled known-phrase list consulted by the query planner.
	pub extra_phrases: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			fields: SEARCHABLE_FIELDS.iter().map(|field| field.to_string()).collect(),
			max_candidates: 1_000,
			default_limit: 20,
			max_limit: 100,
			extra_phrases: Vec::new(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggest {
	pub cache_ttl_secs: u64,
	pub min_query_len: usize,
	pub max_suggestions: usize,
	pub min_frequency: u64,
	pub min_token_len: usize,
	pub semantic: SuggestSemantic,
}
impl Default for Suggest {
	fn default() -> Self {
		Self {
			cache_ttl_secs: 300,
			min_query_len: 2,
			max_suggestions: 6,
			min_frequency: 2,
			min_token_len: 4,
			semantic: SuggestSemantic::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SuggestSemantic {
	pub min_similarity: f32,
	pub max_suggestions: usize,
	pub min_term_frequency: u64,
	pub phrase_len_min: usize,
	pub phrase_len_max: usize,
	pub max_sample_ids: usize,
	pub batch_size: usize,
	pub index_fields: Vec<String>,
}
impl Default for SuggestSemantic {
	fn default() -> Self {
		Self {
			min_similarity: 0.7,
			max_suggestions: 8,
			min_term_frequency: 2,
			phrase_len_min: 1,
			phrase_len_max: 5,
			max_sample_ids: 3,
			batch_size: 10,
			index_fields: vec![
				"title".to_string(),
				"description".to_string(),
				"agency".to_string(),
				"office".to_string(),
				"naics_description".to_string(),
				"set_aside_description".to_string(),
				"place_of_performance".to_string(),
				"contact_info".to_string(),
			],
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmbeddingProviderConfig {
	/// "hash" (deterministic, offline) or "http" (OpenAI-compatible endpoint).
	pub kind: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for EmbeddingProviderConfig {
	fn default() -> Self {
		Self {
			kind: "hash".to_string(),
			api_base: String::new(),
			api_key: String::new(),
			path: "/v1/embeddings".to_string(),
			model: String::new(),
			dimensions: 384,
			timeout_ms: 30_000,
			default_headers: Map::new(),
		}
	}
}

fn default_max_connections() -> u32 {
	5
}

fn default_busy_timeout_ms() -> u64 {
	5_000
}
