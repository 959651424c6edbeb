use anyhow::Result;
use tracing::info;
mod sqlite_store;

use crate::sqlite_store::SqliteStore;
use dashboard_common::{
	config::Config,
	fixtures::load_or_generate,
	server::{ init_tracing, run_server },
};

#[tokio::main]
async fn main() -> Result<()> {
	init_tracing();
	info!("Starting SQLite dashboard backend");

	let config = Config::load()?;
	let store = SqliteStore::open(&config.database_path).await?;
	info!("Opened {}", config.database_path.display());

	// Seed once; later runs serve whatever the database holds
	if store.is_empty().await? {
		let dataset = load_or_generate(&config.fixtures_dir, &config.demo)?;
		store.seed(dataset).await?;
	} else {
		info!("Database already seeded, skipping fixtures");
	}

	run_server(store, &config).await?;

	Ok(())
}
