use tender_domain::score::{self, ScoreFields};
use tender_storage::{models::Opportunity, queries};
use tracing::warn;

use crate::{
	Error, Result, SearchFilters, TenderService,
	plan::{self, QueryPlan, SearchMode, SearchStrategy},
};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub query: String,
	pub mode: SearchMode,
	pub filters: SearchFilters,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

/// How a query was actually executed, echoed back so callers can see which
/// strategy fired and with which terms.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchInfo {
	pub search_type: SearchStrategy,
	pub terms_used: Vec<String>,
	pub original_term: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub opportunities: Vec<Opportunity>,
	/// Matches surviving relevance scoring and attribute filters, before
	/// pagination.
	pub total_count: u64,
	/// Predicate matches in the store (browse: corpus size), before scoring
	/// and attribute filters.
	pub total_unfiltered_count: u64,
	pub has_more: bool,
	/// `None` when the request had no query and records were browsed by
	/// recency.
	pub search_info: Option<SearchInfo>,
}

impl TenderService {
	/// Runs a search request end to end: plan, fetch candidates, score and
	/// order the full candidate set, apply attribute filters, then paginate.
	/// Counts are computed on the filtered set as a whole so a page never
	/// changes the totals.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = self.page_limit(req.limit);
		let offset = req.offset.unwrap_or(0) as usize;
		let trimmed = req.query.trim();

		if trimmed.is_empty() {
			return self.browse(&req.filters, limit, offset).await;
		}

		let mut plan =
			plan::plan_query(trimmed, req.mode, &self.cfg.search.extra_phrases);
		let first_attempt = self.fetch_plan_candidates(&plan).await;
		let (candidates, total_unfiltered) = match first_attempt {
			Ok(fetched) => fetched,
			Err(err) if plan.strategy == SearchStrategy::Phrase => {
				warn!(error = %err, "Phrase search failed; retrying with the exact strategy.");

				plan = QueryPlan {
					strategy: SearchStrategy::Exact,
					terms: vec![trimmed.to_lowercase()],
					original_query: plan.original_query.clone(),
					matched_phrase: None,
				};

				self.fetch_plan_candidates(&plan).await?
			},
			Err(err) => return Err(err),
		};

		let weighted = score::weighted_terms(&plan.terms);
		let mut scored: Vec<(i64, Opportunity)> = candidates
			.into_iter()
			.filter_map(|record| {
				let relevance = score::score(&score_fields(&record), &weighted);

				(relevance > 0).then_some((relevance, record))
			})
			.collect();

		scored.sort_by(|a, b| {
			b.0.cmp(&a.0).then_with(|| {
				score::compare_recency(
					a.1.posted_date.as_deref(),
					&a.1.created_at,
					b.1.posted_date.as_deref(),
					&b.1.created_at,
				)
			})
		});

		let mut filtered: Vec<Opportunity> =
			scored.into_iter().map(|(_, record)| record).collect();

		filtered.retain(|record| req.filters.matches(record));

		let total_count = filtered.len() as u64;
		let has_more = offset + limit < filtered.len();
		let opportunities = filtered.into_iter().skip(offset).take(limit).collect();

		Ok(SearchResponse {
			opportunities,
			total_count,
			total_unfiltered_count: total_unfiltered as u64,
			has_more,
			search_info: Some(SearchInfo {
				search_type: plan.strategy,
				terms_used: plan.terms,
				original_term: plan.original_query,
			}),
		})
	}

	/// A single record by id.
	pub async fn get(&self, id: &str) -> Result<Opportunity> {
		let trimmed = id.trim();

		if trimmed.is_empty() {
			return Err(Error::InvalidRequest { message: "id must be non-empty.".to_string() });
		}

		if let Some(record) = queries::fetch_by_id(&self.db, trimmed).await? {
			return Ok(record);
		}

		// Callers sometimes hold the human-assigned number instead of the id;
		// record identity tolerates either key.
		queries::fetch_by_solicitation(&self.db, trimmed)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("No opportunity {trimmed}.") })
	}

	/// Queryless listing: the whole corpus by recency, filtered and paged.
	async fn browse(
		&self,
		filters: &SearchFilters,
		limit: usize,
		offset: usize,
	) -> Result<SearchResponse> {
		let records = queries::list_all(&self.db).await?;
		let total_unfiltered = records.len() as u64;
		let mut filtered = records;

		filtered.retain(|record| filters.matches(record));

		let total_count = filtered.len() as u64;
		let has_more = offset + limit < filtered.len();
		let opportunities = filtered.into_iter().skip(offset).take(limit).collect();

		Ok(SearchResponse {
			opportunities,
			total_count,
			total_unfiltered_count: total_unfiltered,
			has_more,
			search_info: None,
		})
	}

	async fn fetch_plan_candidates(&self, plan: &QueryPlan) -> Result<(Vec<Opportunity>, i64)> {
		let fields = self.search_fields();
		let cap = self.cfg.search.max_candidates;

		if plan.strategy == SearchStrategy::Phrase {
			let Some(phrase) = plan.terms.first() else {
				return Ok((Vec::new(), 0));
			};
			let candidates =
				queries::fetch_phrase_candidates(&self.db, &fields, phrase, cap).await?;
			let total = queries::count_phrase_matches(&self.db, &fields, phrase).await?;

			return Ok((candidates, total));
		}

		let candidates =
			queries::fetch_candidates(&self.db, &fields, &plan.terms, cap).await?;
		let total = queries::count_matches(&self.db, &fields, &plan.terms).await?;

		Ok((candidates, total))
	}

	fn page_limit(&self, requested: Option<u32>) -> usize {
		requested
			.unwrap_or(self.cfg.search.default_limit)
			.min(self.cfg.search.max_limit)
			.max(1) as usize
	}
}

fn score_fields(record: &Opportunity) -> ScoreFields<'_> {
	ScoreFields {
		title: &record.title,
		solicitation_number: &record.solicitation_number,
		description: record.description.as_deref(),
		agency: record.agency.as_deref(),
		office: record.office.as_deref(),
		naics_description: record.naics_description.as_deref(),
	}
}
