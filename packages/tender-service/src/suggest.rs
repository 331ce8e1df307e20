use ahash::AHashMap;
use time::{Duration, OffsetDateTime};
use tracing::info;

use tender_domain::text;
use tender_storage::queries;

use crate::{Result, TenderService};

/// Snapshot backing lexical suggestions: one lowercased text blob per record
/// plus corpus-wide token counts. Rebuilt lazily once the TTL lapses or an
/// import invalidates it.
pub(crate) struct TermCache {
	global_counts: AHashMap<String, u64>,
	record_texts: Vec<String>,
	built_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Suggestion {
	pub term: String,
	pub frequency: u64,
}

impl TenderService {
	/// Completion terms for a partial query: the most frequent tokens drawn
	/// from records whose text contains any parsed query term, excluding stop
	/// words and the query's own terms. Too-short queries return nothing
	/// without touching the cache.
	pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
		let trimmed = query.trim();

		if trimmed.chars().count() < self.cfg.suggest.min_query_len {
			return Ok(Vec::new());
		}

		let terms = text::split_or_terms(trimmed);

		if terms.is_empty() {
			return Ok(Vec::new());
		}

		self.ensure_term_cache().await?;

		let guard = self.term_cache.read().await;
		let Some(cache) = guard.as_ref() else {
			return Ok(Vec::new());
		};
		let mut counts: AHashMap<String, u64> = AHashMap::new();

		for text_blob in &cache.record_texts {
			if !terms.iter().any(|term| text_blob.contains(term.as_str())) {
				continue;
			}

			for token in text::tokenize(text_blob) {
				if token.chars().count() < self.cfg.suggest.min_token_len
					|| text::is_stop_word(&token)
				{
					continue;
				}
				if terms.iter().any(|term| *term == token) {
					continue;
				}
				// A token below the corpus-wide floor can never reach the
				// per-match floor; skip it before counting.
				if cache.global_counts.get(&token).copied().unwrap_or_default()
					< self.cfg.suggest.min_frequency
				{
					continue;
				}

				*counts.entry(token).or_insert(0) += 1;
			}
		}

		let mut ranked: Vec<Suggestion> = counts
			.into_iter()
			.filter(|(_, frequency)| *frequency >= self.cfg.suggest.min_frequency)
			.map(|(term, frequency)| Suggestion { term, frequency })
			.collect();

		ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.term.cmp(&b.term)));
		ranked.truncate(self.cfg.suggest.max_suggestions);

		Ok(ranked)
	}

	pub async fn invalidate_term_cache(&self) {
		*self.term_cache.write().await = None;
	}

	async fn ensure_term_cache(&self) -> Result<()> {
		let ttl = Duration::seconds(self.cfg.suggest.cache_ttl_secs as i64);

		{
			let guard = self.term_cache.read().await;

			if let Some(cache) = guard.as_ref() {
				if OffsetDateTime::now_utc() - cache.built_at < ttl {
					return Ok(());
				}
			}
		}

		let mut guard = self.term_cache.write().await;

		// Another task may have rebuilt while we waited for the write lock.
		if let Some(cache) = guard.as_ref() {
			if OffsetDateTime::now_utc() - cache.built_at < ttl {
				return Ok(());
			}
		}

		let rows = queries::term_sources(&self.db).await?;
		let mut global_counts: AHashMap<String, u64> = AHashMap::new();
		let mut record_texts = Vec::with_capacity(rows.len());

		for row in rows {
			let text_blob = [
				row.title.as_str(),
				row.description.as_deref().unwrap_or_default(),
				row.agency.as_deref().unwrap_or_default(),
			]
			.join(" ")
			.to_lowercase();

			for token in text::tokenize(&text_blob) {
				if token.chars().count() < self.cfg.suggest.min_token_len
					|| text::is_stop_word(&token)
				{
					continue;
				}

				*global_counts.entry(token).or_insert(0) += 1;
			}

			record_texts.push(text_blob);
		}

		info!(
			unique_terms = global_counts.len(),
			records = record_texts.len(),
			"Rebuilt the suggestion term cache."
		);

		*guard = Some(TermCache {
			global_counts,
			record_texts,
			built_at: OffsetDateTime::now_utc(),
		});

		Ok(())
	}
}
