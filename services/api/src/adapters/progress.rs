//! services/api/src/adapters/progress.rs
//!
//! The `ProgressRepository` port backed by `progress.json`.

use crate::adapters::json_file::{read_json_array, write_json_array};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reader_core::domain::{BookId, ProgressRecord, UserId};
use reader_core::ports::{PortResult, ProgressRepository};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonProgressStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> PortResult<Vec<ProgressRow>> {
        read_json_array(&self.path).await
    }
}

//=========================================================================================
// File Record Structs
//=========================================================================================

/// One row of `progress.json`. `currentPage` is the 1-based unit index.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRow {
    user_id: UserId,
    book_id: BookId,
    progress: f64,
    #[serde(default)]
    current_page: usize,
    timestamp: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProgressRow {
    fn from_domain(record: &ProgressRecord) -> Self {
        Self {
            user_id: record.user_id,
            book_id: record.book_id,
            progress: record.progress_fraction,
            current_page: record.unit_index,
            timestamp: record.timestamp,
            updated_at: record.updated_at,
        }
    }

    fn to_domain(&self) -> ProgressRecord {
        ProgressRecord {
            user_id: self.user_id,
            book_id: self.book_id,
            unit_index: self.current_page,
            progress_fraction: self.progress,
            timestamp: self.timestamp,
            updated_at: self.updated_at,
        }
    }

    fn is_for(&self, user_id: UserId, book_id: BookId) -> bool {
        self.user_id == user_id && self.book_id == book_id
    }
}

//=========================================================================================
// `ProgressRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProgressRepository for JsonProgressStore {
    async fn upsert_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;

        let row = ProgressRow::from_domain(&record);
        match rows
            .iter_mut()
            .find(|existing| existing.is_for(record.user_id, record.book_id))
        {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }

        write_json_array(&self.path, &rows).await?;
        Ok(record)
    }

    async fn progress_for_user(&self, user_id: UserId) -> PortResult<Vec<ProgressRecord>> {
        Ok(self
            .load()
            .await?
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(ProgressRow::to_domain)
            .collect())
    }

    async fn progress_for_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> PortResult<Option<ProgressRecord>> {
        Ok(self
            .load()
            .await?
            .iter()
            .find(|row| row.is_for(user_id, book_id))
            .map(ProgressRow::to_domain))
    }
}
