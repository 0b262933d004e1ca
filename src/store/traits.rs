//! `ProfileStore` trait — the storage contract the conversation core relies on.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::profile::ProfileRecord;

/// Durable keyed storage of profile records.
///
/// Shared across conversations as `Arc<dyn ProfileStore>`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by id. Absence is `Ok(None)`; errors mean I/O failure.
    async fn get(&self, id: &str) -> Result<Option<ProfileRecord>, StoreError>;

    /// Persist a new profile.
    ///
    /// Fails with [`StoreError::Conflict`] when `record.id` already exists.
    async fn create(&self, record: ProfileRecord) -> Result<ProfileRecord, StoreError>;
}
