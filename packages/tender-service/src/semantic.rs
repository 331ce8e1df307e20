use ahash::{AHashMap, AHashSet};
use tracing::{info, warn};

use tender_domain::phrases;
use tender_providers::embedding::cosine_similarity;
use tender_storage::{
	models::{IndexField, Opportunity},
	queries,
};

use crate::{Error, Result, TenderService};

/// In-memory semantic index. Rebuilds assemble a full replacement and swap it
/// in under the write lock, so readers always see a complete index.
#[derive(Default)]
pub(crate) struct SemanticIndex {
	pub(crate) items: Vec<IndexedItem>,
	/// Whether a rebuild has ever completed; imports re-index only then.
	pub(crate) built: bool,
}

pub(crate) struct IndexedItem {
	pub(crate) id: String,
	pub(crate) text: String,
	pub(crate) embedding: Vec<f32>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct IndexReport {
	pub indexed_count: u64,
	pub skipped_count: u64,
	pub error_count: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct IndexStats {
	pub total_items: u64,
	pub avg_text_length: u64,
	pub embedding_dimension: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SemanticSuggestion {
	pub term: String,
	/// How many similar records contain the phrase.
	pub frequency: u64,
	pub confidence: f32,
	pub sample_ids: Vec<String>,
	pub is_phrase: bool,
}

impl TenderService {
	/// Embeds every record's configured fields and swaps the result in as the
	/// new semantic index. Records without usable text are skipped; a failed
	/// embedding batch is counted and skipped rather than aborting the
	/// rebuild.
	pub async fn rebuild_semantic_index(&self) -> Result<IndexReport> {
		let semantic = &self.cfg.suggest.semantic;
		let fields: Vec<IndexField> =
			semantic.index_fields.iter().filter_map(|name| IndexField::parse(name)).collect();
		let records = queries::list_all(&self.db).await?;
		let mut pending: Vec<(String, String)> = Vec::with_capacity(records.len());
		let mut skipped_count = 0_u64;

		for record in &records {
			if record.id.trim().is_empty() {
				warn!("Skipping a record with a blank id during semantic indexing.");

				skipped_count += 1;

				continue;
			}

			let text = match &self.index_extractor {
				Some(extract) => extract(record).trim().to_string(),
				None => index_text(record, &fields),
			};

			if text.is_empty() {
				warn!(id = %record.id, "Skipping a record with no indexable text.");

				skipped_count += 1;

				continue;
			}

			pending.push((record.id.clone(), text));
		}

		let mut items = Vec::with_capacity(pending.len());
		let mut error_count = 0_u64;
		let mut last_logged = 0_usize;

		for batch in pending.chunks(semantic.batch_size.max(1)) {
			let texts: Vec<String> = batch.iter().map(|(_, text)| text.clone()).collect();

			match self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await {
				Ok(embeddings) if embeddings.len() == batch.len() => {
					for ((id, text), embedding) in batch.iter().cloned().zip(embeddings) {
						items.push(IndexedItem { id, text, embedding });
					}
				},
				Ok(embeddings) => {
					warn!(
						expected = batch.len(),
						returned = embeddings.len(),
						"Embedding batch returned a mismatched count; skipping the batch."
					);

					error_count += batch.len() as u64;
				},
				Err(err) => {
					warn!(
						error = %err,
						batch = batch.len(),
						"Embedding batch failed; skipping the batch."
					);

					error_count += batch.len() as u64;
				},
			}

			if items.len() >= last_logged + 100 {
				info!(indexed = items.len(), total = pending.len(), "Semantic indexing progress.");

				last_logged = items.len();
			}
		}

		let report = IndexReport {
			indexed_count: items.len() as u64,
			skipped_count,
			error_count,
		};

		*self.semantic_index.write().await = SemanticIndex { items, built: true };

		info!(
			indexed = report.indexed_count,
			skipped = report.skipped_count,
			errors = report.error_count,
			"Semantic index rebuilt."
		);

		Ok(report)
	}

	/// Admin rebuild: drops the lexical cache and re-embeds the corpus.
	pub async fn reindex(&self) -> Result<IndexReport> {
		self.invalidate_term_cache().await;
		self.rebuild_semantic_index().await
	}

	/// Related phrases for a query, mined from records whose embeddings sit
	/// near the query's. Errors distinguish an unbuilt index from a failing
	/// provider so callers can answer differently.
	pub async fn suggest_semantic(&self, query: &str) -> Result<Vec<SemanticSuggestion>> {
		let trimmed = query.trim();

		if trimmed.chars().count() < self.cfg.suggest.min_query_len {
			return Ok(Vec::new());
		}

		let semantic = &self.cfg.suggest.semantic;
		let guard = self.semantic_index.read().await;

		if guard.items.is_empty() {
			return Err(Error::IndexEmpty {
				message: "The semantic index has not been built yet.".to_string(),
			});
		}

		let texts = [trimmed.to_string()];
		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;
		let Some(query_embedding) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "The embedding provider returned no vectors.".to_string(),
			});
		};

		let mut similar: Vec<(&IndexedItem, f32)> = Vec::new();

		for item in &guard.items {
			if item.embedding.len() != query_embedding.len() {
				warn!(id = %item.id, "Skipping an item with a mismatched embedding dimension.");

				continue;
			}

			let similarity = cosine_similarity(&query_embedding, &item.embedding);

			if similarity >= semantic.min_similarity {
				similar.push((item, similarity));
			}
		}

		if similar.is_empty() {
			return Ok(Vec::new());
		}

		similar.sort_by(|a, b| b.1.total_cmp(&a.1));

		let query_lower = trimmed.to_lowercase();
		let mut by_phrase: AHashMap<String, (u64, Vec<String>)> = AHashMap::new();

		for (item, _) in &similar {
			// Dedupe within one record so a repeated phrase counts it once.
			let mut seen: AHashSet<String> = AHashSet::new();

			for phrase in
				phrases::extract_phrases(&item.text, semantic.phrase_len_min, semantic.phrase_len_max)
			{
				if phrases::is_phrase_too_similar(&phrase, &query_lower) {
					continue;
				}
				if !seen.insert(phrase.clone()) {
					continue;
				}

				let entry = by_phrase.entry(phrase).or_insert_with(|| (0, Vec::new()));

				entry.0 += 1;

				if entry.1.len() < semantic.max_sample_ids {
					entry.1.push(item.id.clone());
				}
			}
		}

		let mut candidates: Vec<(String, u64, Vec<String>)> = by_phrase
			.into_iter()
			.filter(|(_, (frequency, _))| *frequency >= semantic.min_term_frequency)
			.map(|(term, (frequency, sample_ids))| (term, frequency, sample_ids))
			.collect();

		if candidates.is_empty() {
			return Ok(Vec::new());
		}

		let max_frequency = candidates.iter().map(|(_, frequency, _)| *frequency).max().unwrap_or(1);

		candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		candidates.truncate(semantic.max_suggestions);

		Ok(candidates
			.into_iter()
			.map(|(term, frequency, sample_ids)| SemanticSuggestion {
				confidence: (frequency as f32 / max_frequency as f32).min(0.95),
				is_phrase: term.contains(' '),
				term,
				frequency,
				sample_ids,
			})
			.collect())
	}

	pub async fn semantic_index_stats(&self) -> IndexStats {
		let guard = self.semantic_index.read().await;
		let total_items = guard.items.len() as u64;
		let avg_text_length = if total_items == 0 {
			0
		} else {
			guard.items.iter().map(|item| item.text.chars().count() as u64).sum::<u64>()
				/ total_items
		};
		let embedding_dimension =
			guard.items.first().map(|item| item.embedding.len() as u64).unwrap_or_default();

		IndexStats { total_items, avg_text_length, embedding_dimension }
	}

	pub(crate) async fn semantic_index_built(&self) -> bool {
		self.semantic_index.read().await.built
	}
}

fn index_text(record: &Opportunity, fields: &[IndexField]) -> String {
	let mut parts: Vec<&str> = Vec::with_capacity(fields.len());

	for field in fields {
		if let Some(text) = record.field_text(*field) {
			let trimmed = text.trim();

			if !trimmed.is_empty() {
				parts.push(trimmed);
			}
		}
	}

	parts.join(" ")
}
