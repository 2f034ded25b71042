mod config;
mod logging;
mod routes;
mod server;
mod shutdown;
mod state;

use anyhow::{Context, Result};
use calendar_core::EventService;
use tokio::net::TcpListener;
use tracing::{Instrument, info, info_span};

use crate::config::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load()?;
    logging::init(settings.env);

    let span = info_span!("calendar", env = settings.env.as_str());
    run(settings).instrument(span).await
}

async fn run(settings: Settings) -> Result<()> {
    let http = settings.http_server;

    let state = AppState::new(EventService::in_memory());
    let app = routes::app(state, http.timeout);

    let listener = TcpListener::bind(&http.address)
        .await
        .with_context(|| format!("failed to bind {}", http.address))?;

    info!(
        address = %http.address,
        timeout = %humantime::format_duration(http.timeout),
        idle_timeout = %humantime::format_duration(http.idle_timeout),
        "starting HTTP server"
    );

    server::serve(listener, app, http.idle_timeout, shutdown::signal()).await
}
