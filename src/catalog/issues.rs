//! Issue list for the report form, cached with its own freshness window.

use std::sync::Arc;

use chrono::Duration;

use crate::clock::{is_fresh, Clock};
use crate::db::{keys, LocalStore};
use crate::errors::AppError;
use crate::gateway::RemoteGateway;
use crate::models::Issue;

pub struct IssueCatalog {
    store: LocalStore,
    gateway: RemoteGateway,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl IssueCatalog {
    pub fn new(
        store: LocalStore,
        gateway: RemoteGateway,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            ttl,
        }
    }

    /// Issues sorted by label: from the cache while fresh, otherwise fetched.
    pub async fn issues(&self) -> Result<Vec<Issue>, AppError> {
        if let Some(issues) = self.fresh_cached().await? {
            tracing::info!("Found {} recent issues in local storage", issues.len());
            return Ok(issues);
        }

        tracing::info!("Requesting issues from the server");
        let issues = self.gateway.fetch_issues().await?;
        self.store.save(keys::ISSUES, &issues).await?;
        self.store
            .save_timestamp(keys::LAST_ISSUES_DOWNLOAD, self.clock.now())
            .await?;
        Ok(issues)
    }

    async fn fresh_cached(&self) -> Result<Option<Vec<Issue>>, AppError> {
        let Some(downloaded) = self.store.load_timestamp(keys::LAST_ISSUES_DOWNLOAD).await? else {
            return Ok(None);
        };
        if !is_fresh(downloaded, self.clock.now(), self.ttl) {
            return Ok(None);
        }
        match self.store.load(keys::ISSUES).await {
            Ok(issues) => Ok(issues),
            Err(AppError::Serialization(e)) => {
                tracing::warn!("Ignoring unreadable cached issues: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
