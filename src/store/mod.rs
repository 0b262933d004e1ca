//! Persistence layer — profile storage behind the `ProfileStore` trait.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use memory::InMemoryProfileStore;
pub use traits::ProfileStore;

use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::error::Result;

/// Open the profile store selected by `config`.
///
/// `:memory:` selects [`InMemoryProfileStore`]; any other path is a libSQL
/// file, created along with its parent directory when missing.
pub async fn open(config: &AssistantConfig) -> Result<Arc<dyn ProfileStore>> {
    if config.is_in_memory() {
        tracing::info!("Using in-memory profile store");
        return Ok(Arc::new(InMemoryProfileStore::new()));
    }
    let backend = LibSqlBackend::new_local(&config.db_path).await?;
    Ok(Arc::new(backend))
}
