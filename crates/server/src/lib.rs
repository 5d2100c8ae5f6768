#![forbid(unsafe_code)]

pub mod api;
pub mod app_state;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod normalize;

pub use app_state::AppState;
pub use config::{Cli, ConfigError, ServerConfig};
pub use error::ApiError;

use actix_web::{App, HttpServer, web};
use tracing::info;

/// Serves the API until the server is stopped. The database must already be
/// provisioned.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(
        AppState::new(config.database.clone()).with_body_limit(config.max_body_bytes),
    );
    info!(
        host = %config.host,
        port = config.port,
        database = %state.database().display(),
        max_body_bytes = state.body_limit(),
        "tissue server listening"
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
