use tracing::info;

use tender_storage::{
	models::{Opportunity, STATUSES},
	queries,
};

use crate::{Error, Result, TenderService};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportRequest {
	pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportReport {
	pub imported_count: u64,
	/// Whether the semantic index was rebuilt as part of this import.
	pub reindexed: bool,
}

impl TenderService {
	/// Upserts a batch of records, then invalidates the lexical cache and,
	/// when a semantic index exists, rebuilds it so suggestions never serve
	/// stale text.
	pub async fn import(&self, req: ImportRequest) -> Result<ImportReport> {
		if req.opportunities.is_empty() {
			return Err(Error::InvalidRequest {
				message: "opportunities must be non-empty.".to_string(),
			});
		}

		for record in &req.opportunities {
			// A blank status is filled with "active" at the storage layer.
			if !record.status.is_empty() && !STATUSES.contains(&record.status.as_str()) {
				return Err(Error::InvalidRequest {
					message: format!(
						"Unknown status {:?} on opportunity {:?}.",
						record.status, record.id
					),
				});
			}
		}

		let imported_count = queries::upsert_opportunities(&self.db, &req.opportunities).await?;

		self.invalidate_term_cache().await;

		let reindexed = if self.semantic_index_built().await {
			self.rebuild_semantic_index().await?;

			true
		} else {
			false
		};

		info!(imported = imported_count, reindexed, "Import completed.");

		Ok(ImportReport { imported_count, reindexed })
	}
}
