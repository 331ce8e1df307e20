use std::cmp::Ordering;

pub const TITLE_WEIGHT: i64 = 10;
pub const SOLICITATION_WEIGHT: i64 = 8;
pub const DESCRIPTION_WEIGHT: i64 = 5;
pub const AGENCY_WEIGHT: i64 = 3;
pub const NAICS_DESCRIPTION_WEIGHT: i64 = 3;
pub const OFFICE_WEIGHT: i64 = 1;

pub const ORIGINAL_TERM_WEIGHT: i64 = 3;
pub const EXPANSION_TERM_WEIGHT: i64 = 1;

/// The text fields a record is scored on, borrowed from the candidate row.
#[derive(Debug)]
pub struct ScoreFields<'a> {
	pub title: &'a str,
	pub solicitation_number: &'a str,
	pub description: Option<&'a str>,
	pub agency: Option<&'a str>,
	pub office: Option<&'a str>,
	pub naics_description: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedTerm {
	pub term: String,
	pub weight: i64,
}

/// Assigns term priorities for a plan's term list: the first term is the
/// caller's original query and weighs [`ORIGINAL_TERM_WEIGHT`]; every
/// expansion term weighs [`EXPANSION_TERM_WEIGHT`].
pub fn weighted_terms(terms: &[String]) -> Vec<WeightedTerm> {
	terms
		.iter()
		.enumerate()
		.map(|(index, term)| WeightedTerm {
			term: term.to_lowercase(),
			weight: if index == 0 { ORIGINAL_TERM_WEIGHT } else { EXPANSION_TERM_WEIGHT },
		})
		.collect()
}

/// Relevance of a record against a weighted term list. Per term, the highest
/// matching field wins (fields are not summed within a term); per record,
/// term scores are summed. Zero means no field matched any term.
pub fn score(fields: &ScoreFields<'_>, terms: &[WeightedTerm]) -> i64 {
	let ranked: [(Option<String>, i64); 6] = [
		(Some(fields.title.to_lowercase()), TITLE_WEIGHT),
		(Some(fields.solicitation_number.to_lowercase()), SOLICITATION_WEIGHT),
		(fields.description.map(str::to_lowercase), DESCRIPTION_WEIGHT),
		(fields.agency.map(str::to_lowercase), AGENCY_WEIGHT),
		(fields.naics_description.map(str::to_lowercase), NAICS_DESCRIPTION_WEIGHT),
		(fields.office.map(str::to_lowercase), OFFICE_WEIGHT),
	];
	let mut total = 0;

	for weighted in terms {
		if weighted.term.is_empty() {
			continue;
		}

		for (text, field_weight) in &ranked {
			let Some(text) = text else { continue };

			if text.contains(&weighted.term) {
				total += weighted.weight * field_weight;

				break;
			}
		}
	}

	total
}

/// Recency ordering for equal scores: `posted_date` descending with missing
/// dates last, then `created_at` descending. Dates are RFC 3339 text, which
/// compares lexicographically in chronological order.
pub fn compare_recency(
	a_posted: Option<&str>,
	a_created: &str,
	b_posted: Option<&str>,
	b_created: &str,
) -> Ordering {
	match (a_posted, b_posted) {
		(Some(a), Some(b)) => b.cmp(a).then_with(|| b_created.cmp(a_created)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => b_created.cmp(a_created),
	}
}
