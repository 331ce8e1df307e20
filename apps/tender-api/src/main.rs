use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tender_api::Args::parse();

	tender_api::run(args).await
}
