//! User records server entry point.

mod server;

use actix_web::web;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use user_records::inbound::http::health::HealthState;
use user_records::settings::AppSettings;

use server::{ServerConfig, create_server};

fn load_config() -> std::io::Result<ServerConfig> {
    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let collection = settings.collection().map_err(std::io::Error::other)?;
    Ok(ServerConfig::new(bind_addr, collection))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = load_config().inspect_err(|err| error!(error = %err, "startup failed"))?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
