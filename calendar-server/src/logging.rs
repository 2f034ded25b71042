//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Env;

/// Install the global subscriber for `env`.
///
/// - `local`: human-readable text at debug level
/// - `dev`: JSON lines at debug level
/// - `prod`: JSON lines at info level
///
/// `RUST_LOG` takes precedence over the default filter.
pub fn init(env: Env) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Local => registry.with(fmt::layer()).init(),
        Env::Dev | Env::Prod => registry.with(fmt::layer().json()).init(),
    }
}

fn default_filter(env: Env) -> &'static str {
    match env {
        Env::Local | Env::Dev => "info,calendar_server=debug,calendar_core=debug,tower_http=debug",
        Env::Prod => "info",
    }
}
