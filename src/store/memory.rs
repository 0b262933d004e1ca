//! In-memory `ProfileStore`, for tests and runs that need no durability.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::profile::ProfileRecord;
use crate::store::traits::ProfileStore;

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn create(&self, record: ProfileRecord) -> Result<ProfileRecord, StoreError> {
        match self.profiles.write().await.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict { id: record.id }),
            Entry::Vacant(slot) => Ok(slot.insert(record).clone()),
        }
    }
}
