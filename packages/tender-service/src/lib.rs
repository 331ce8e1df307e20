pub mod filter;
pub mod import;
pub mod plan;
pub mod search;
pub mod semantic;
pub mod stats;
pub mod suggest;

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::sync::RwLock;

pub use filter::SearchFilters;
pub use import::{ImportReport, ImportRequest};
pub use plan::{QueryPlan, SearchMode, SearchStrategy};
pub use search::{SearchInfo, SearchRequest, SearchResponse};
pub use semantic::{IndexReport, IndexStats, SemanticSuggestion};
pub use stats::{AgencyStat, AwardAmountRange, CorpusStats, StatusStat};
pub use suggest::Suggestion;

use tender_config::{Config, EmbeddingProviderConfig};
use tender_providers::embedding;
use tender_storage::{
	db::Db,
	models::{Opportunity, SearchField},
};

use crate::{semantic::SemanticIndex, suggest::TermCache};

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Builds the text embedded for one record when the configured field list is
/// not enough.
pub type IndexTextExtractor = dyn Fn(&Opportunity) -> String + Send + Sync;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Index empty: {message}")]
	IndexEmpty { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct TenderService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub(crate) index_extractor: Option<Box<IndexTextExtractor>>,
	pub(crate) term_cache: RwLock<Option<TermCache>>,
	pub(crate) semantic_index: RwLock<SemanticIndex>,
}

struct DefaultProviders;

impl From<tender_storage::Error> for Error {
	fn from(err: tender_storage::Error) -> Self {
		match err {
			tender_storage::Error::Sqlx(source) => Self::Storage { message: source.to_string() },
			tender_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			tender_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

impl TenderService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self {
			cfg,
			db,
			providers,
			index_extractor: None,
			term_cache: RwLock::new(None),
			semantic_index: RwLock::new(SemanticIndex::default()),
		}
	}

	/// Overrides the configured `index_fields` list with a caller-supplied
	/// extractor for semantic indexing.
	pub fn with_index_extractor<F>(mut self, extractor: F) -> Self
	where
		F: Fn(&Opportunity) -> String + Send + Sync + 'static,
	{
		self.index_extractor = Some(Box::new(extractor));

		self
	}

	/// Configured search fields as typed columns. Unknown names were rejected
	/// at config load, so the filter here drops nothing in practice.
	pub(crate) fn search_fields(&self) -> Vec<SearchField> {
		self.cfg.search.fields.iter().filter_map(|name| SearchField::parse(name)).collect()
	}
}
