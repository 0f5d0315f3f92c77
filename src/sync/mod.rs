//! Sync coordinator.
//!
//! Decides whether the cached voter list can be reused, drains pending
//! outcome records to the remote service, and fetches fresh voters.
//!
//! Network work is spawned and returns immediately. Each completion comes
//! back as a [`SyncEvent`] on the channel handed out by
//! [`SyncCoordinator::new`], in whatever order the requests finish; the
//! owner feeds events back through [`SyncCoordinator::apply`]. Applying an
//! event is idempotent with respect to overlapping populate cycles:
//!
//! - at most one delivery per pending list is in flight at a time;
//! - an acknowledged delivery removes only the records that were sent;
//! - a voter fetch older than the newest one already applied is discarded.
//!
//! Nothing here times out. A request that never completes keeps its
//! pending list marked in flight for the life of the coordinator.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::mpsc;

use crate::clock::{is_fresh, Clock};
use crate::db::{keys, LocalStore};
use crate::errors::AppError;
use crate::gateway::{Delivery, RemoteGateway};
use crate::models::{PendingFlag, Voter};

/// Completion of one spawned network exchange.
#[derive(Debug)]
pub enum SyncEvent {
    ReportsDelivered {
        sent: usize,
        result: Result<Delivery, AppError>,
    },
    FlagsDelivered {
        sent: usize,
        result: Result<Delivery, AppError>,
    },
    VotersFetched {
        cycle: u64,
        result: Result<Vec<Voter>, AppError>,
    },
}

/// What a populate call did.
#[derive(Debug, Clone, PartialEq)]
pub enum Population {
    /// The cached list was fresh; no network calls were made
    Cached(Vec<Voter>),
    /// Deliveries and/or a fetch were issued; results arrive as events
    Requested { fetching: bool },
}

pub struct SyncCoordinator {
    store: LocalStore,
    gateway: RemoteGateway,
    clock: Arc<dyn Clock>,
    voter_ttl: Duration,
    events: mpsc::UnboundedSender<SyncEvent>,
    in_flight: usize,
    flags_in_flight: bool,
    reports_in_flight: bool,
    next_cycle: u64,
    applied_cycle: Option<u64>,
}

impl SyncCoordinator {
    /// Build a coordinator and the receiving end of its completion channel.
    pub fn new(
        store: LocalStore,
        gateway: RemoteGateway,
        clock: Arc<dyn Clock>,
        voter_ttl: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            store,
            gateway,
            clock,
            voter_ttl,
            events,
            in_flight: 0,
            flags_in_flight: false,
            reports_in_flight: false,
            next_cycle: 0,
            applied_cycle: None,
        };
        (coordinator, receiver)
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Number of spawned exchanges whose events have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Populate the voter queue for `campaign_ids`.
    ///
    /// A fresh cached list is returned directly and pending records are left
    /// alone. Otherwise pending reports and flags are delivered and, when at
    /// least one campaign is selected, a voter fetch is issued.
    pub async fn populate_voters(&mut self, campaign_ids: &[i64]) -> Result<Population, AppError> {
        if let Some(voters) = self.fresh_cached_voters().await? {
            tracing::info!("Found {} recent voters in local storage", voters.len());
            return Ok(Population::Cached(voters));
        }

        self.deliver_reports().await?;
        self.deliver_flags().await?;

        if campaign_ids.is_empty() {
            tracing::info!("No campaigns selected; skipping voter fetch");
            return Ok(Population::Requested { fetching: false });
        }

        let cycle = self.next_cycle;
        self.next_cycle += 1;
        let gateway = self.gateway.clone();
        let ids = campaign_ids.to_vec();
        tracing::info!("Requesting voters from the server (cycle {})", cycle);
        self.spawn(async move {
            let result = gateway.fetch_voters(&ids).await;
            SyncEvent::VotersFetched { cycle, result }
        });

        Ok(Population::Requested { fetching: true })
    }

    /// Apply one completion. Returns the new voter list when a fetch landed.
    pub async fn apply(&mut self, event: SyncEvent) -> Result<Option<Vec<Voter>>, AppError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            SyncEvent::ReportsDelivered { sent, result } => {
                self.reports_in_flight = false;
                if accepted("intelligence reports", sent, &result) {
                    self.store.drain_reports(sent).await?;
                }
                Ok(None)
            }
            SyncEvent::FlagsDelivered { sent, result } => {
                self.flags_in_flight = false;
                if accepted("flags", sent, &result) {
                    self.store.drain_flags(sent).await?;
                }
                Ok(None)
            }
            SyncEvent::VotersFetched { cycle, result } => {
                let mut voters = match result {
                    Ok(voters) => voters,
                    Err(e) => {
                        tracing::warn!("Voter fetch (cycle {}) failed: {}", cycle, e);
                        return Ok(None);
                    }
                };

                if self.applied_cycle.is_some_and(|applied| cycle < applied) {
                    tracing::info!("Discarding voters from superseded cycle {}", cycle);
                    return Ok(None);
                }
                self.applied_cycle = Some(cycle);

                for voter in &mut voters {
                    voter.reset_flags();
                }
                self.store
                    .save_timestamp(keys::LAST_VOTERS_DOWNLOAD, self.clock.now())
                    .await?;
                self.persist_queue(&voters).await?;
                tracing::info!("Received {} voters (cycle {})", voters.len(), cycle);
                Ok(Some(voters))
            }
        }
    }

    /// Write the working list through. An empty list removes the snapshot.
    pub async fn persist_queue(&self, voters: &[Voter]) -> Result<(), AppError> {
        if voters.is_empty() {
            self.store.remove(keys::VOTERS).await
        } else {
            self.store.save(keys::VOTERS, voters).await
        }
    }

    /// Record a flagged number for later delivery.
    pub async fn record_flag(&self, flag: PendingFlag) -> Result<(), AppError> {
        self.store.push_flag(flag).await
    }

    async fn fresh_cached_voters(&self) -> Result<Option<Vec<Voter>>, AppError> {
        let Some(downloaded) = self.store.load_timestamp(keys::LAST_VOTERS_DOWNLOAD).await? else {
            return Ok(None);
        };
        if !is_fresh(downloaded, self.clock.now(), self.voter_ttl) {
            tracing::info!("Cached voters downloaded at {} have expired", downloaded);
            return Ok(None);
        }

        match self.store.load::<Vec<Voter>>(keys::VOTERS).await {
            Ok(Some(voters)) if !voters.is_empty() => Ok(Some(voters)),
            Ok(_) => Ok(None),
            Err(AppError::Serialization(e)) => {
                tracing::warn!("Ignoring unreadable cached voters: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn deliver_reports(&mut self) -> Result<(), AppError> {
        if self.reports_in_flight {
            tracing::debug!("Report delivery already in flight");
            return Ok(());
        }
        let reports = self.store.pending_reports().await?;
        if reports.is_empty() {
            return Ok(());
        }

        self.reports_in_flight = true;
        let gateway = self.gateway.clone();
        let sent = reports.len();
        tracing::info!("PATCHing {} intelligence reports to the server", sent);
        self.spawn(async move {
            let result = gateway.deliver_reports(&reports).await;
            SyncEvent::ReportsDelivered { sent, result }
        });
        Ok(())
    }

    async fn deliver_flags(&mut self) -> Result<(), AppError> {
        if self.flags_in_flight {
            tracing::debug!("Flag delivery already in flight");
            return Ok(());
        }
        let flags = self.store.pending_flags().await?;
        if flags.is_empty() {
            return Ok(());
        }

        self.flags_in_flight = true;
        let gateway = self.gateway.clone();
        let sent = flags.len();
        tracing::info!("PATCHing {} flags to the server", sent);
        self.spawn(async move {
            let result = gateway.deliver_flags(&flags).await;
            SyncEvent::FlagsDelivered { sent, result }
        });
        Ok(())
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = SyncEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = work.await;
            // A closed receiver means the session ended; the records stay pending.
            let _ = events.send(event);
        });
    }
}

fn accepted(what: &str, sent: usize, result: &Result<Delivery, AppError>) -> bool {
    match result {
        Ok(Delivery::Accepted) => {
            tracing::info!("Server accepted {} {}", sent, what);
            true
        }
        Ok(Delivery::NotAccepted(status)) => {
            tracing::warn!(
                "Server did not accept {} {} (status {}); keeping them for retry",
                sent,
                what,
                status
            );
            false
        }
        Err(e) if e.is_transient() => {
            tracing::warn!("Delivering {} {} failed: {}; keeping them for retry", sent, what, e);
            false
        }
        Err(e) => {
            tracing::error!("Delivering {} {} failed: {}; keeping them pending", sent, what, e);
            false
        }
    }
}
