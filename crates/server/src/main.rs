#![forbid(unsafe_code)]

use clap::Parser;
use tissue_server::{Cli, ServerConfig, logging};
use tissue_storage::SqliteStore;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;
    logging::init(&config.log_level);

    SqliteStore::provision(&config.database)?;
    info!(database = %config.database.display(), "database ready");

    actix_web::rt::System::new().block_on(tissue_server::run(config))?;
    Ok(())
}
