pub mod backup;
pub mod billing;
pub mod business_day;
pub mod closing;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod state;
pub mod store;


use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::AppConfig;
pub use error::{PosError, Result};
pub use state::PosState;

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shawaya_pos_lib=debug"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact())
        .try_init();
}

/// Loads configuration from the environment, sets up logging and opens the
/// database. The returned state is what every command takes.
pub fn run() -> Result<PosState> {
    init_tracing();

    let config = AppConfig::from_env();
    let state = PosState::open(config)?;

    tracing::info!(
        business_day = %state.business_day.get(),
        menu_items = state.menu_items.list().len(),
        sales = state.sales.list().len(),
        deals = state.deals.list().len(),
        "point of sale ready"
    );

    Ok(state)
}
