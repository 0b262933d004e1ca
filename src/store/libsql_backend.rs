//! libSQL backend — durable `ProfileStore` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::profile::ProfileRecord;
use crate::store::migrations;
use crate::store::traits::ProfileStore;

const PROFILE_COLUMNS: &str = "id, name, school, interview_status";

/// libSQL profile store.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db).await?;
        info!(path = %path.display(), "Profile database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests and ephemeral runs).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to create in-memory database: {e}"))
            })?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Unavailable(format!("Failed to create connection: {e}")))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }
}

/// Map a libsql Row to a ProfileRecord.
///
/// Column order matches PROFILE_COLUMNS.
fn row_to_profile(row: &libsql::Row) -> Result<ProfileRecord, libsql::Error> {
    Ok(ProfileRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        school: row.get(2)?,
        interview_status: row.get(3)?,
    })
}

#[async_trait]
impl ProfileStore for LibSqlBackend {
    async fn get(&self, id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("get_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let record = row_to_profile(&row)
                    .map_err(|e| StoreError::Unavailable(format!("get_profile row parse: {e}")))?;
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Unavailable(format!("get_profile: {e}"))),
        }
    }

    async fn create(&self, record: ProfileRecord) -> Result<ProfileRecord, StoreError> {
        let inserted = self
            .conn
            .execute(
                &format!(
                    "INSERT INTO user_profiles ({PROFILE_COLUMNS}) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT (id) DO NOTHING"
                ),
                params![
                    record.id.as_str(),
                    record.name.as_str(),
                    record.school.as_str(),
                    record.interview_status.as_str()
                ],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("create_profile: {e}")))?;

        if inserted == 0 {
            return Err(StoreError::Conflict { id: record.id });
        }

        debug!(profile_id = %record.id, "Profile inserted into DB");
        Ok(record)
    }
}
