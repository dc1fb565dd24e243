pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;
pub mod validation;

pub use app::{app, router};
pub use error::ApiError;
pub use state::AppState;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("games_catalogue_api=info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
