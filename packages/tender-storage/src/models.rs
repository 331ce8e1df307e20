use serde::{Deserialize, Serialize};

/// A contract opportunity record. Dates are RFC 3339 text; `award_amount`
/// keeps the upstream currency formatting (e.g. "$1,500,000").
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Opportunity {
	pub id: String,
	pub solicitation_number: String,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub agency: Option<String>,
	#[serde(default)]
	pub office: Option<String>,
	#[serde(default)]
	pub naics_code: Option<String>,
	#[serde(default)]
	pub naics_description: Option<String>,
	#[serde(default)]
	pub posted_date: Option<String>,
	#[serde(default)]
	pub response_due_date: Option<String>,
	#[serde(default)]
	pub archive_date: Option<String>,
	#[serde(default)]
	pub award_date: Option<String>,
	#[serde(default)]
	pub award_amount: Option<String>,
	#[serde(default)]
	pub set_aside_code: Option<String>,
	#[serde(default)]
	pub set_aside_description: Option<String>,
	#[serde(default)]
	pub place_of_performance: Option<String>,
	#[serde(default)]
	pub contact_info: Option<String>,
	#[serde(default)]
	pub sam_url: Option<String>,
	#[serde(default = "default_status")]
	pub status: String,
	#[serde(default)]
	pub last_updated: Option<String>,
	#[serde(default)]
	pub created_at: String,
	#[serde(default)]
	pub updated_at: String,
}

pub const STATUSES: [&str; 4] = ["active", "archived", "awarded", "cancelled"];

fn default_status() -> String {
	"active".to_string()
}

/// Columns a substring search predicate may target. Queries render column
/// names only through [`SearchField::column`], never from caller strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
	Title,
	Description,
	NaicsDescription,
	Agency,
	Office,
	SolicitationNumber,
}
impl SearchField {
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"title" => Some(Self::Title),
			"description" => Some(Self::Description),
			"naics_description" => Some(Self::NaicsDescription),
			"agency" => Some(Self::Agency),
			"office" => Some(Self::Office),
			"solicitation_number" => Some(Self::SolicitationNumber),
			_ => None,
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Description => "description",
			Self::NaicsDescription => "naics_description",
			Self::Agency => "agency",
			Self::Office => "office",
			Self::SolicitationNumber => "solicitation_number",
		}
	}
}

/// Record fields the semantic indexer may concatenate, as a typed list
/// instead of a reflective walk over arbitrary shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexField {
	Title,
	Description,
	Agency,
	Office,
	NaicsCode,
	NaicsDescription,
	SetAsideDescription,
	PlaceOfPerformance,
	ContactInfo,
	SolicitationNumber,
}
impl IndexField {
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"title" => Some(Self::Title),
			"description" => Some(Self::Description),
			"agency" => Some(Self::Agency),
			"office" => Some(Self::Office),
			"naics_code" => Some(Self::NaicsCode),
			"naics_description" => Some(Self::NaicsDescription),
			"set_aside_description" => Some(Self::SetAsideDescription),
			"place_of_performance" => Some(Self::PlaceOfPerformance),
			"contact_info" => Some(Self::ContactInfo),
			"solicitation_number" => Some(Self::SolicitationNumber),
			_ => None,
		}
	}
}

impl Opportunity {
	pub fn field_text(&self, field: IndexField) -> Option<&str> {
		match field {
			IndexField::Title => Some(self.title.as_str()),
			IndexField::Description => self.description.as_deref(),
			IndexField::Agency => self.agency.as_deref(),
			IndexField::Office => self.office.as_deref(),
			IndexField::NaicsCode => self.naics_code.as_deref(),
			IndexField::NaicsDescription => self.naics_description.as_deref(),
			IndexField::SetAsideDescription => self.set_aside_description.as_deref(),
			IndexField::PlaceOfPerformance => self.place_of_performance.as_deref(),
			IndexField::ContactInfo => self.contact_info.as_deref(),
			IndexField::SolicitationNumber => Some(self.solicitation_number.as_str()),
		}
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct StatusCount {
	pub status: String,
	pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AgencyCount {
	pub agency: String,
	pub count: i64,
}

/// The concatenation source for the lexical term-frequency cache.
#[derive(Debug, sqlx::FromRow)]
pub struct TermSourceRow {
	pub title: String,
	pub description: Option<String>,
	pub agency: Option<String>,
}
