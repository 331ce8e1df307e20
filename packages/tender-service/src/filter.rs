use tender_storage::models::Opportunity;

/// Sentinel agency filter value selecting records whose agency is blank or
/// missing.
pub const NO_AGENCY: &str = "(No Agency)";

/// Post-search filters. All populated filters must hold for a record to
/// survive; an empty filter set passes everything.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchFilters {
	/// `None` disables status filtering entirely.
	pub status: Option<String>,
	pub agencies: Vec<String>,
	pub min_award: Option<f64>,
	pub max_award: Option<f64>,
}

impl SearchFilters {
	pub fn matches(&self, record: &Opportunity) -> bool {
		self.matches_status(record) && self.matches_agency(record) && self.matches_award(record)
	}

	fn matches_status(&self, record: &Opportunity) -> bool {
		match &self.status {
			None => true,
			Some(status) => record.status.eq_ignore_ascii_case(status.trim()),
		}
	}

	fn matches_agency(&self, record: &Opportunity) -> bool {
		if self.agencies.is_empty() {
			return true;
		}

		let record_agency =
			record.agency.as_deref().map(str::trim).unwrap_or_default().to_lowercase();

		self.agencies.iter().any(|selected| {
			let selected = selected.trim();

			if selected == NO_AGENCY {
				return record_agency.is_empty();
			}

			let selected = selected.to_lowercase();

			// An empty side would contains-match everything.
			if record_agency.is_empty() || selected.is_empty() {
				return false;
			}

			record_agency.contains(&selected) || selected.contains(&record_agency)
		})
	}

	fn matches_award(&self, record: &Opportunity) -> bool {
		if self.min_award.is_none() && self.max_award.is_none() {
			return true;
		}

		let amount = parse_award_amount(record.award_amount.as_deref().unwrap_or_default());

		if let Some(min) = self.min_award {
			if amount < min {
				return false;
			}
		}
		if let Some(max) = self.max_award {
			if amount > max {
				return false;
			}
		}

		true
	}
}

/// Numeric value of an upstream award string such as `"$1,500,000"`.
/// Everything outside digits, dots, and minus signs is stripped; blank or
/// unparseable leftovers count as zero.
pub fn parse_award_amount(raw: &str) -> f64 {
	let cleaned: String =
		raw.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-').collect();

	if cleaned.is_empty() {
		return 0.0;
	}

	cleaned.parse::<f64>().unwrap_or(0.0)
}
