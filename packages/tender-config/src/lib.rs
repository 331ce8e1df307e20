mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, INDEXABLE_FIELDS, Providers, SEARCHABLE_FIELDS, Search,
	Service, Storage, Suggest, SuggestSemantic,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.bind_http.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.bind_http must be non-empty.".to_string(),
		});
	}
	if cfg.service.bind_admin.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.bind_admin must be non-empty.".to_string(),
		});
	}
	if cfg.storage.path.trim().is_empty() {
		return Err(Error::Validation { message: "storage.path must be non-empty.".to_string() });
	}
	if cfg.storage.max_connections == 0 {
		return Err(Error::Validation {
			message: "storage.max_connections must be greater than zero.".to_string(),
		});
	}
	if cfg.search.fields.is_empty() {
		return Err(Error::Validation { message: "search.fields must be non-empty.".to_string() });
	}

	for field in &cfg.search.fields {
		if !SEARCHABLE_FIELDS.contains(&field.as_str()) {
			return Err(Error::Validation {
				message: format!("search.fields contains unknown field {field:?}."),
			});
		}
	}

	for required in ["title", "description", "naics_description"] {
		if !cfg.search.fields.iter().any(|field| field == required) {
			return Err(Error::Validation {
				message: format!("search.fields must include {required}."),
			});
		}
	}

	if cfg.search.max_candidates == 0 {
		return Err(Error::Validation {
			message: "search.max_candidates must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit > cfg.search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}
	if cfg.suggest.cache_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "suggest.cache_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.min_query_len == 0 {
		return Err(Error::Validation {
			message: "suggest.min_query_len must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.max_suggestions == 0 {
		return Err(Error::Validation {
			message: "suggest.max_suggestions must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.min_frequency == 0 {
		return Err(Error::Validation {
			message: "suggest.min_frequency must be greater than zero.".to_string(),
		});
	}

	let semantic = &cfg.suggest.semantic;

	if !semantic.min_similarity.is_finite() {
		return Err(Error::Validation {
			message: "suggest.semantic.min_similarity must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&semantic.min_similarity) {
		return Err(Error::Validation {
			message: "suggest.semantic.min_similarity must be in the range 0.0-1.0.".to_string(),
		});
	}
	if semantic.max_suggestions == 0 {
		return Err(Error::Validation {
			message: "suggest.semantic.max_suggestions must be greater than zero.".to_string(),
		});
	}
	if semantic.phrase_len_min == 0 {
		return Err(Error::Validation {
			message: "suggest.semantic.phrase_len_min must be greater than zero.".to_string(),
		});
	}
	if semantic.phrase_len_min > semantic.phrase_len_max {
		return Err(Error::Validation {
			message: "suggest.semantic.phrase_len_min must not exceed phrase_len_max.".to_string(),
		});
	}
	if semantic.max_sample_ids == 0 {
		return Err(Error::Validation {
			message: "suggest.semantic.max_sample_ids must be greater than zero.".to_string(),
		});
	}
	if semantic.batch_size == 0 {
		return Err(Error::Validation {
			message: "suggest.semantic.batch_size must be greater than zero.".to_string(),
		});
	}
	if semantic.index_fields.is_empty() {
		return Err(Error::Validation {
			message: "suggest.semantic.index_fields must be non-empty.".to_string(),
		});
	}

	for field in &semantic.index_fields {
		if !INDEXABLE_FIELDS.contains(&field.as_str()) {
			return Err(Error::Validation {
				message: format!("suggest.semantic.index_fields contains unknown field {field:?}."),
			});
		}
	}

	let embedding = &cfg.providers.embedding;

	if !matches!(embedding.kind.as_str(), "hash" | "http") {
		return Err(Error::Validation {
			message: "providers.embedding.kind must be one of hash or http.".to_string(),
		});
	}
	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if embedding.kind == "http" {
		if embedding.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.embedding.api_base must be non-empty when kind is http."
					.to_string(),
			});
		}
		if embedding.model.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.embedding.model must be non-empty when kind is http."
					.to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for field in &mut cfg.search.fields {
		*field = field.trim().to_lowercase();
	}

	cfg.search.fields.dedup();

	for field in &mut cfg.suggest.semantic.index_fields {
		*field = field.trim().to_lowercase();
	}

	cfg.suggest.semantic.index_fields.dedup();

	cfg.search.extra_phrases = cfg
		.search
		.extra_phrases
		.iter()
		.map(|phrase| phrase.trim().to_lowercase())
		.filter(|phrase| !phrase.is_empty())
		.collect();
}
