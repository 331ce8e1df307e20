use tender_domain::{synonyms, text};

/// Two-word topics that read as a single concept. A query containing one of
/// these (or contained by one) searches the canonical phrase instead of being
/// split into looser terms. Config `search.extra_phrases` extends this list.
pub const KNOWN_PHRASES: [&str; 21] = [
	"web development",
	"software development",
	"mobile development",
	"data science",
	"machine learning",
	"artificial intelligence",
	"cloud computing",
	"cyber security",
	"information technology",
	"project management",
	"quality assurance",
	"user experience",
	"database administration",
	"network security",
	"help desk",
	"software engineering",
	"systems analyst",
	"business analyst",
	"technical writing",
	"graphic design",
	"digital marketing",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
	#[default]
	Auto,
	Exact,
	Semantic,
}
impl SearchMode {
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_lowercase().as_str() {
			"" | "auto" => Some(Self::Auto),
			"exact" => Some(Self::Exact),
			"semantic" => Some(Self::Semantic),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
	Or,
	Exact,
	Phrase,
	Semantic,
}

/// The chosen strategy plus the exact term list the executor will run.
/// `terms` is never empty for a non-blank query, and the first entry is
/// always the caller's own wording except under [`SearchStrategy::Phrase`],
/// where it is the matched canonical phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPlan {
	pub strategy: SearchStrategy,
	pub terms: Vec<String>,
	pub original_query: String,
	pub matched_phrase: Option<String>,
}

/// Picks a strategy for a query. In order: a `" or "` disjunction always
/// splits; explicit exact mode short-circuits; a known phrase (matched by
/// bidirectional containment) searches the canonical phrase; anything
/// multi-word, or anything under explicit semantic mode, expands through the
/// synonym table; a lone word is searched exactly.
pub fn plan_query(query: &str, mode: SearchMode, extra_phrases: &[String]) -> QueryPlan {
	let trimmed = query.trim();
	let original_query = trimmed.to_string();

	if trimmed.is_empty() {
		return QueryPlan {
			strategy: SearchStrategy::Exact,
			terms: Vec::new(),
			original_query,
			matched_phrase: None,
		};
	}

	let lowered = trimmed.to_lowercase();

	if text::contains_or_delimiter(trimmed) {
		let terms = text::split_or_terms(trimmed);

		// Fewer than two usable segments means the delimiter was decoration;
		// the whole query degrades to one exact term.
		if terms.len() > 1 {
			return QueryPlan {
				strategy: SearchStrategy::Or,
				terms,
				original_query,
				matched_phrase: None,
			};
		}

		return exact_plan(lowered, original_query);
	}

	if mode == SearchMode::Exact {
		return exact_plan(lowered, original_query);
	}

	if let Some(phrase) = match_known_phrase(&lowered, extra_phrases) {
		return QueryPlan {
			strategy: SearchStrategy::Phrase,
			terms: vec![phrase.clone()],
			original_query,
			matched_phrase: Some(phrase),
		};
	}

	if lowered.split_whitespace().count() > 1 || mode == SearchMode::Semantic {
		return QueryPlan {
			strategy: SearchStrategy::Semantic,
			terms: synonyms::expand(&lowered),
			original_query,
			matched_phrase: None,
		};
	}

	exact_plan(lowered, original_query)
}

fn exact_plan(term: String, original_query: String) -> QueryPlan {
	QueryPlan {
		strategy: SearchStrategy::Exact,
		terms: vec![term],
		original_query,
		matched_phrase: None,
	}
}

fn match_known_phrase(lowered: &str, extra_phrases: &[String]) -> Option<String> {
	KNOWN_PHRASES
		.iter()
		.copied()
		.chain(extra_phrases.iter().map(String::as_str))
		.find(|phrase| lowered.contains(phrase) || phrase.contains(lowered))
		.map(str::to_string)
}
