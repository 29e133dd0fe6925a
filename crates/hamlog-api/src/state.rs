//! Application state management

use hamlog_core::{Config, QsoService, Result, Validator};
use hamlog_database::Database;
use std::sync::Arc;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Database handle, also used for health checks
    pub database: Database,
    /// QSO operations backed by `database`
    pub qsos: QsoService,
}

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the reference tables are malformed.
    pub fn new(config: Config, database: Database) -> Result<Self> {
        let validator = Validator::from_config(&config.reference)?;
        let qsos = QsoService::new(Arc::new(database.clone()), validator);

        Ok(Self {
            config,
            database,
            qsos,
        })
    }
}
