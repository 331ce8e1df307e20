use crate::{
	Error, Result,
	db::Db,
	models::{AgencyCount, Opportunity, SearchField, StatusCount, TermSourceRow},
};

const OPPORTUNITY_COLUMNS: &str = "\
id, solicitation_number, title, description, agency, office, naics_code, naics_description, \
posted_date, response_due_date, archive_date, award_date, award_amount, set_aside_code, \
set_aside_description, place_of_performance, contact_info, sam_url, status, last_updated, \
created_at, updated_at";

const RECENCY_ORDER: &str = "ORDER BY posted_date DESC, created_at DESC";

/// Bulk upsert in one transaction. `INSERT OR REPLACE` resolves identity on
/// either unique key (`id` primary key, `solicitation_number` unique index),
/// so a re-imported record replaces its previous row under both keys.
pub async fn upsert_opportunities(db: &Db, records: &[Opportunity]) -> Result<u64> {
	let mut tx = db.pool.begin().await?;

	for record in records {
		if record.id.trim().is_empty() {
			return Err(Error::InvalidArgument("Opportunity id must be non-empty.".to_string()));
		}
		if record.solicitation_number.trim().is_empty() {
			return Err(Error::InvalidArgument(format!(
				"Opportunity {} solicitation_number must be non-empty.",
				record.id
			)));
		}

		sqlx::query(
			"\
INSERT OR REPLACE INTO opportunities (
	id,
	solicitation_number,
	title,
	description,
	agency,
	office,
	naics_code,
	naics_description,
	posted_date,
	response_due_date,
	archive_date,
	award_date,
	award_amount,
	set_aside_code,
	set_aside_description,
	place_of_performance,
	contact_info,
	sam_url,
	status,
	last_updated,
	created_at,
	updated_at
)
VALUES (
	?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
	COALESCE(NULLIF(?, ''), 'active'),
	?,
	COALESCE(NULLIF(?, ''), strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
	COALESCE(NULLIF(?, ''), strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)",
		)
		.bind(&record.id)
		.bind(&record.solicitation_number)
		.bind(&record.title)
		.bind(&record.description)
		.bind(&record.agency)
		.bind(&record.office)
		.bind(&record.naics_code)
		.bind(&record.naics_description)
		.bind(&record.posted_date)
		.bind(&record.response_due_date)
		.bind(&record.archive_date)
		.bind(&record.award_date)
		.bind(&record.award_amount)
		.bind(&record.set_aside_code)
		.bind(&record.set_aside_description)
		.bind(&record.place_of_performance)
		.bind(&record.contact_info)
		.bind(&record.sam_url)
		.bind(&record.status)
		.bind(&record.last_updated)
		.bind(&record.created_at)
		.bind(&record.updated_at)
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(records.len() as u64)
}

pub async fn fetch_by_id(db: &Db, id: &str) -> Result<Option<Opportunity>> {
	let row = sqlx::query_as::<_, Opportunity>(&format!(
		"SELECT {OPPORTUNITY_COLUMNS} FROM opportunities WHERE id = ?"
	))
	.bind(id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn fetch_by_solicitation(db: &Db, number: &str) -> Result<Option<Opportunity>> {
	let row = sqlx::query_as::<_, Opportunity>(&format!(
		"SELECT {OPPORTUNITY_COLUMNS} FROM opportunities WHERE solicitation_number = ?"
	))
	.bind(number)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

/// Full snapshot read for index building and unsearched listings.
pub async fn list_all(db: &Db) -> Result<Vec<Opportunity>> {
	let rows = sqlx::query_as::<_, Opportunity>(&format!(
		"SELECT {OPPORTUNITY_COLUMNS} FROM opportunities {RECENCY_ORDER}"
	))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn count_all(db: &Db) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM opportunities")
		.fetch_one(&db.pool)
		.await?;

	Ok(count)
}

/// Candidate rows where ANY of `fields` contains ANY of `terms`,
/// case-insensitively. Terms are always bound parameters; columns render
/// through the [`SearchField`] allowlist.
pub async fn fetch_candidates(
	db: &Db,
	fields: &[SearchField],
	terms: &[String],
	limit: u32,
) -> Result<Vec<Opportunity>> {
	if fields.is_empty() || terms.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"SELECT {OPPORTUNITY_COLUMNS} FROM opportunities WHERE {} {RECENCY_ORDER} LIMIT ?",
		substring_clause(fields, terms.len())
	);
	let mut query = sqlx::query_as::<_, Opportunity>(&sql);

	for term in terms {
		for _ in fields {
			query = query.bind(term.to_lowercase());
		}
	}

	let rows = query.bind(i64::from(limit)).fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Exact count of the substring predicate match, uncapped.
pub async fn count_matches(db: &Db, fields: &[SearchField], terms: &[String]) -> Result<i64> {
	if fields.is_empty() || terms.is_empty() {
		return Ok(0);
	}

	let sql = format!(
		"SELECT COUNT(*) FROM opportunities WHERE {}",
		substring_clause(fields, terms.len())
	);
	let mut query = sqlx::query_scalar::<_, i64>(&sql);

	for term in terms {
		for _ in fields {
			query = query.bind(term.to_lowercase());
		}
	}

	let count = query.fetch_one(&db.pool).await?;

	Ok(count)
}

/// The store's phrase-match capability: the whole phrase as one contiguous,
/// case-insensitive unit across the searched fields.
pub async fn fetch_phrase_candidates(
	db: &Db,
	fields: &[SearchField],
	phrase: &str,
	limit: u32,
) -> Result<Vec<Opportunity>> {
	let terms = [phrase.to_string()];

	fetch_candidates(db, fields, &terms, limit).await
}

pub async fn count_phrase_matches(db: &Db, fields: &[SearchField], phrase: &str) -> Result<i64> {
	let terms = [phrase.to_string()];

	count_matches(db, fields, &terms).await
}

/// Source texts for the lexical term-frequency cache.
pub async fn term_sources(db: &Db) -> Result<Vec<TermSourceRow>> {
	let rows = sqlx::query_as::<_, TermSourceRow>(
		"SELECT title, description, agency FROM opportunities",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn count_by_status(db: &Db) -> Result<Vec<StatusCount>> {
	let rows = sqlx::query_as::<_, StatusCount>(
		"\
SELECT status, COUNT(*) AS count
FROM opportunities
GROUP BY status
ORDER BY count DESC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn count_by_agency(db: &Db, limit: u32) -> Result<Vec<AgencyCount>> {
	let rows = sqlx::query_as::<_, AgencyCount>(
		"\
SELECT agency, COUNT(*) AS count
FROM opportunities
WHERE agency IS NOT NULL AND TRIM(agency) != ''
GROUP BY agency
ORDER BY count DESC
LIMIT ?",
	)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn award_amounts(db: &Db) -> Result<Vec<String>> {
	let rows = sqlx::query_scalar::<_, String>(
		"SELECT award_amount FROM opportunities WHERE award_amount IS NOT NULL AND award_amount != ''",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

fn substring_clause(fields: &[SearchField], term_count: usize) -> String {
	let mut clauses = Vec::with_capacity(fields.len() * term_count);

	for _ in 0..term_count {
		for field in fields {
			clauses.push(format!("instr(lower(coalesce({}, '')), ?) > 0", field.column()));
		}
	}

	format!("({})", clauses.join(" OR "))
}
