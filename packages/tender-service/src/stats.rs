use tender_storage::queries;

use crate::{Result, TenderService, filter};

pub const TOP_AGENCY_LIMIT: u32 = 10;
/// Ceiling reported when no award amounts exist yet, so range widgets have a
/// usable upper bound.
pub const DEFAULT_AWARD_CEILING: f64 = 100_000_000.0;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatusStat {
	pub status: String,
	pub count: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AgencyStat {
	pub agency: String,
	pub count: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AwardAmountRange {
	pub min: f64,
	pub max: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CorpusStats {
	pub total_count: i64,
	pub by_status: Vec<StatusStat>,
	pub top_agencies: Vec<AgencyStat>,
	pub award_amount_range: AwardAmountRange,
}

impl TenderService {
	pub async fn stats(&self) -> Result<CorpusStats> {
		let total_count = queries::count_all(&self.db).await?;
		let by_status = queries::count_by_status(&self.db)
			.await?
			.into_iter()
			.map(|row| StatusStat { status: row.status, count: row.count })
			.collect();
		let top_agencies = queries::count_by_agency(&self.db, TOP_AGENCY_LIMIT)
			.await?
			.into_iter()
			.map(|row| AgencyStat { agency: row.agency, count: row.count })
			.collect();
		let award_amount_range = award_range(&queries::award_amounts(&self.db).await?);

		Ok(CorpusStats { total_count, by_status, top_agencies, award_amount_range })
	}
}

/// Positive award values only; formatting noise and placeholders parse to
/// zero and drop out.
fn award_range(raw_amounts: &[String]) -> AwardAmountRange {
	let mut min = f64::INFINITY;
	let mut max = 0.0_f64;
	let mut any = false;

	for raw in raw_amounts {
		let amount = filter::parse_award_amount(raw);

		if amount <= 0.0 {
			continue;
		}

		any = true;
		min = min.min(amount);
		max = max.max(amount);
	}

	if any {
		AwardAmountRange { min, max }
	} else {
		AwardAmountRange { min: 0.0, max: DEFAULT_AWARD_CEILING }
	}
}
