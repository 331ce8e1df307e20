use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Generic English function words plus the domain filler words that dominate
/// contract-opportunity prose and carry no search value.
pub const STOP_WORDS: [&str; 69] = [
	"the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
	"are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
	"would", "could", "should", "may", "might", "this", "that", "these", "those", "it", "its",
	"as", "if", "not", "no", "than", "then", "there", "their", "they", "them", "from", "about",
	"into", "through", "under", "other", "also", "such", "all", "any", "shall", "must", "work",
	"government", "including", "required", "provide", "services", "contract", "contractor",
];

static OR_DELIMITER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\s+or\s+").ok());

pub fn is_stop_word(token: &str) -> bool {
	STOP_WORDS.contains(&token)
}

/// Lowercases, folds to NFKC, maps punctuation to spaces, and collapses
/// whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
	let mut folded = String::with_capacity(text.len());

	for ch in text.nfkc() {
		if ch.is_alphanumeric() {
			folded.extend(ch.to_lowercase());
		} else {
			folded.push(' ');
		}
	}

	let mut out = String::with_capacity(folded.len());

	for token in folded.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(token);
	}

	out
}

/// Splits normalized text on whitespace and drops tokens of length <= 1.
pub fn tokenize(text: &str) -> Vec<String> {
	normalize(text).split_whitespace().filter(|token| token.len() > 1).map(str::to_string).collect()
}

/// Whether the query carries the literal `" or "` disjunction delimiter.
pub fn contains_or_delimiter(query: &str) -> bool {
	query.to_lowercase().contains(" or ")
}

/// Splits a query on the case-insensitive `" or "` delimiter; each segment is
/// trimmed, stripped of surrounding quotes, and lowercased; empty segments are
/// dropped. A query without the delimiter comes back as a single segment.
pub fn split_or_terms(query: &str) -> Vec<String> {
	let segments: Vec<&str> = match OR_DELIMITER.as_ref() {
		Some(re) => re.split(query).collect(),
		None => query.split(" or ").collect(),
	};

	segments
		.into_iter()
		.map(|segment| strip_quotes(segment.trim()).trim().to_lowercase())
		.filter(|segment| !segment.is_empty())
		.collect()
}

pub fn strip_quotes(term: &str) -> &str {
	term.trim_matches(|ch| ch == '"' || ch == '\'')
}
