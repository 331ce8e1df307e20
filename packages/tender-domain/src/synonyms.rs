use std::collections::HashSet;

/// Hand-curated expansion table. Keys are lowercase query terms; values are
/// related terms and phrases worth OR-ing into a search. The content is domain
/// knowledge, not logic; extend or replace freely.
pub const SYNONYMS: [(&str, &[&str]); 26] = [
	// AI / ML
	("ai", &["artificial intelligence", "machine learning", "deep learning", "neural networks"]),
	("artificial intelligence", &["ai", "machine learning", "deep learning"]),
	("machine learning", &["ai", "artificial intelligence", "deep learning", "predictive analytics"]),
	("data science", &["analytics", "big data", "statistics", "machine learning"]),
	// Technology
	("web development", &["website", "web design", "frontend", "backend", "full stack"]),
	("software", &["application", "program", "system development"]),
	("it services", &["information technology", "tech support", "computer services"]),
	("cloud", &["aws", "azure", "hosting", "infrastructure", "cloud computing"]),
	("cybersecurity", &["information security", "network security", "cyber"]),
	// Coaching and development
	("coaching", &["leadership development", "executive coaching", "mentoring", "training"]),
	("training", &["education", "instruction", "learning", "professional development"]),
	// Soft skills
	("soft skills", &["communication", "leadership", "teamwork", "interpersonal"]),
	// Professional services
	("consulting", &["advisory", "professional services", "expertise"]),
	("staffing", &["recruiting", "personnel", "workforce", "human capital"]),
	// Human resources
	("human resources", &["hr", "personnel", "workforce management", "benefits"]),
	// Healthcare
	("healthcare", &["medical", "health services", "clinical", "telehealth"]),
	// Security
	("security", &["physical security", "guard services", "surveillance"]),
	// Research
	("research", &["study", "analysis", "investigation", "evaluation"]),
	// Agency acronyms
	("dod", &["defense", "army", "navy", "air force"]),
	("va", &["veterans affairs", "veterans"]),
	("dhs", &["homeland security"]),
	("gsa", &["general services administration"]),
	("nasa", &["aeronautics", "space"]),
	("nih", &["national institutes of health", "health research"]),
	("doe", &["department of energy", "energy"]),
	("epa", &["environmental protection", "environmental"]),
];

/// Expands a term through the synonym table: the term itself first, then the
/// exact-key expansions, then expansions of every key related to the term by
/// bidirectional substring containment. Deduplicated in that order.
pub fn expand(term: &str) -> Vec<String> {
	let needle = term.trim().to_lowercase();

	if needle.is_empty() {
		return Vec::new();
	}

	let mut out = vec![needle.clone()];
	let mut seen: HashSet<String> = out.iter().cloned().collect();

	for (key, expansions) in SYNONYMS {
		if key != needle {
			continue;
		}

		for expansion in expansions {
			if seen.insert(expansion.to_string()) {
				out.push(expansion.to_string());
			}
		}
	}

	for (key, expansions) in SYNONYMS {
		if key == needle || !(needle.contains(key) || key.contains(&needle)) {
			continue;
		}

		for expansion in expansions {
			if seen.insert(expansion.to_string()) {
				out.push(expansion.to_string());
			}
		}
	}

	out
}
