//! Typed key-value access to the local store.
//!
//! Every mutation is written through immediately; there is no write-behind
//! buffer, so anything acknowledged here survives a process restart.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use super::init_database;
use crate::errors::AppError;
use crate::models::{Objects, PendingFlag, PendingReport};

/// Names of the persisted snapshots.
pub mod keys {
    pub const CAMPAIGNS: &str = "campaigns";
    pub const VOTERS: &str = "voters";
    pub const FLAGS: &str = "flags";
    pub const IRS: &str = "irs";
    pub const ISSUES: &str = "issues";
    pub const LAST_VOTERS_DOWNLOAD: &str = "last_voters_download";
    pub const LAST_ISSUES_DOWNLOAD: &str = "last_issues_download";
}

/// Handle to the local durable store. Cheap to clone.
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the store at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self, AppError> {
        Ok(Self::new(init_database(db_path).await?))
    }

    // ==================== RAW OPERATIONS ====================

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<Vec<u8>, _>("value")))
    }

    pub async fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    // ==================== TYPED SNAPSHOTS ====================

    /// Load and decode the JSON snapshot under `key`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, &bytes).await
    }

    /// Read an RFC 3339 timestamp. An unparseable value is treated as absent.
    pub async fn load_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        let Some(bytes) = self.get(key).await? else {
            return Ok(None);
        };
        let raw = String::from_utf8_lossy(&bytes);
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(at) => Ok(Some(at.with_timezone(&Utc))),
            Err(e) => {
                tracing::warn!("Ignoring malformed timestamp under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub async fn save_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        self.set(key, at.to_rfc3339().as_bytes()).await
    }

    // ==================== PENDING FLAGS ====================

    pub async fn pending_flags(&self) -> Result<Vec<PendingFlag>, AppError> {
        Ok(self.load(keys::FLAGS).await?.unwrap_or_default())
    }

    /// Append one flag record and write it through.
    pub async fn push_flag(&self, flag: PendingFlag) -> Result<(), AppError> {
        let mut flags = self.pending_flags().await?;
        flags.push(flag);
        self.save(keys::FLAGS, &flags).await
    }

    /// Remove the first `count` flag records (an acknowledged batch).
    pub async fn drain_flags(&self, count: usize) -> Result<(), AppError> {
        let mut flags = self.pending_flags().await?;
        let acknowledged = count.min(flags.len());
        let flags = flags.split_off(acknowledged);
        if flags.is_empty() {
            self.remove(keys::FLAGS).await
        } else {
            self.save(keys::FLAGS, &flags).await
        }
    }

    // ==================== PENDING REPORTS ====================

    pub async fn pending_reports(&self) -> Result<Objects<PendingReport>, AppError> {
        Ok(self.load(keys::IRS).await?.unwrap_or_default())
    }

    /// Append one report record and write it through.
    pub async fn push_report(&self, report: PendingReport) -> Result<(), AppError> {
        let mut reports = self.pending_reports().await?;
        reports.objects.push(report);
        self.save(keys::IRS, &reports).await
    }

    /// Remove the first `count` report records (an acknowledged batch).
    pub async fn drain_reports(&self, count: usize) -> Result<(), AppError> {
        let mut reports = self.pending_reports().await?;
        let acknowledged = count.min(reports.len());
        let reports = Objects::new(reports.objects.split_off(acknowledged));
        if reports.is_empty() {
            self.remove(keys::IRS).await
        } else {
            self.save(keys::IRS, &reports).await
        }
    }
}
