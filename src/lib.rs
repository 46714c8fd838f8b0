pub mod api;
pub mod config;
pub mod db;
pub mod utils;

pub use db::DbPool;

use config::Config;

/// Shared application state, constructed once in main and injected into
/// handlers behind an Arc.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}
