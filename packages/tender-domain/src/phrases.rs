use std::collections::HashSet;

use crate::text;

/// Extracts all contiguous word n-grams of `min_words..=max_words` from the
/// normalized text, deduplicated in first-seen order and filtered through
/// [`is_quality_phrase`].
pub fn extract_phrases(input: &str, min_words: usize, max_words: usize) -> Vec<String> {
	if min_words == 0 || min_words > max_words {
		return Vec::new();
	}

	let words = text::tokenize(input);

	if words.len() < min_words {
		return Vec::new();
	}

	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for len in min_words..=max_words.min(words.len()) {
		for window in words.windows(len) {
			let phrase = window.join(" ");

			if !is_quality_phrase(&phrase) {
				continue;
			}
			if seen.insert(phrase.clone()) {
				out.push(phrase);
			}
		}
	}

	out
}

/// Rejects single-token stop-words, phrases dominated (>60%) by stop-words,
/// all-numeric phrases, and phrases shorter than 3 characters.
pub fn is_quality_phrase(phrase: &str) -> bool {
	let words: Vec<&str> = phrase.split_whitespace().collect();

	if words.is_empty() {
		return false;
	}
	if words.len() == 1 && text::is_stop_word(words[0]) {
		return false;
	}

	let stop_count = words.iter().filter(|word| text::is_stop_word(word)).count();

	if stop_count as f32 / words.len() as f32 > 0.6 {
		return false;
	}
	if phrase.chars().all(|ch| ch.is_ascii_digit() || ch.is_whitespace()) {
		return false;
	}

	phrase.len() >= 3
}

/// Whether a candidate phrase is too close to the query to be a useful
/// suggestion: one contains the other (after normalization), or the word
/// overlap ratio exceeds 0.8.
pub fn is_phrase_too_similar(phrase: &str, query: &str) -> bool {
	let normalized_phrase = text::normalize(phrase);
	let normalized_query = text::normalize(query);

	if normalized_phrase.is_empty() || normalized_query.is_empty() {
		return false;
	}
	if normalized_phrase.contains(&normalized_query)
		|| normalized_query.contains(&normalized_phrase)
	{
		return true;
	}

	word_overlap_ratio(&normalized_phrase, &normalized_query) > 0.8
}

/// `|words(a) ∩ words(b)| / max(|words(a)|, |words(b)|)` over distinct words.
pub fn word_overlap_ratio(a: &str, b: &str) -> f32 {
	let a_words: HashSet<&str> = a.split_whitespace().collect();
	let b_words: HashSet<&str> = b.split_whitespace().collect();

	if a_words.is_empty() || b_words.is_empty() {
		return 0.0;
	}

	let shared = a_words.intersection(&b_words).count();

	shared as f32 / a_words.len().max(b_words.len()) as f32
}
