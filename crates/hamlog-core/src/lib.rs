//! Core types, validation rules and query engine for the hamlog QSO logbook

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod query;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use query::{ListQuery, Page, SortDirection, SortKey};
pub use service::{QsoError, QsoService};
pub use store::QsoStore;
pub use types::{Qso, QsoId};
pub use validation::{ValidationError, Validator};

use config::LoggingConfig;

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if logging.format.eq_ignore_ascii_case("text") {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    };

    installed.map_err(|e| Error::Configuration {
        message: format!("logging already initialized: {e}"),
    })
}
