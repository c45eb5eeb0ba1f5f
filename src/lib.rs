// Payment Dues - Core Library
// Exposes all modules for use in the CLI/TUI, the API server, and tests

pub mod config;
pub mod payment;
pub mod repository;
pub mod store;
pub mod theme;

// Re-export commonly used types
pub use config::AppConfig;
pub use payment::{
    compose_due_date, format_due_date, parse_due_date, total_due,
    Category, PaymentDue, PaymentFields, MONTHS,
};
pub use repository::{DueError, DueResult, PaymentRepository, STORAGE_KEY, THEME_KEY};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use theme::{Palette, ThemeMode, ThemeProvider};

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber on stderr; `filter` uses `EnvFilter` syntax
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Open the configured SQLite store and wrap it in a repository
pub fn open_repository(config: &AppConfig) -> anyhow::Result<PaymentRepository> {
    let store = SqliteStore::open(&config.db_path)?;
    tracing::info!(path = %config.db_path.display(), "storage ready");
    Ok(PaymentRepository::new(Arc::new(store)))
}
