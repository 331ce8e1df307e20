use std::sync::Arc;

use tender_service::TenderService;
use tender_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TenderService>,
}
impl AppState {
	pub async fn new(config: tender_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage).await?;

		db.ensure_schema().await?;

		let service = TenderService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
