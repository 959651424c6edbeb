use anyhow::Result;
use tracing::info;

use dashboard_common::{
	config::Config,
	fixtures::load_or_generate,
	server::{ init_tracing, run_server },
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	init_tracing();
	info!("Starting in-memory dashboard backend");

	let config = Config::load()?;
	let dataset = load_or_generate(&config.fixtures_dir, &config.demo)?;
	let store = MemoryStore::new(dataset);

	run_server(store, &config).await?;

	Ok(())
}
