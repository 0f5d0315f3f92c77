//! Dialing session: the voter queue wired to the sync coordinator.
//!
//! The session is the single consumer of sync completions. It owns the
//! queue, persists it after structural changes, renders through the
//! [`Presenter`], and asks for a repopulation when the queue runs dry.

use tokio::sync::mpsc;

use crate::errors::AppError;
use crate::models::Preferences;
use crate::presenter::{Notice, Presenter, VoterCard};
use crate::queue::{DropOutcome, FlagStep, VoterQueue};
use crate::report::{ReportContext, ResumeDrop};
use crate::sync::{Population, SyncCoordinator, SyncEvent};

pub struct CallSession {
    queue: VoterQueue,
    sync: SyncCoordinator,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    presenter: Box<dyn Presenter>,
    campaign_ids: Vec<i64>,
}

impl CallSession {
    /// Start a session for `campaign_ids`.
    ///
    /// `resume` names the queue index of a voter just reported on; it is
    /// applied before anything else, and only when the queue came from the
    /// cache (a freshly fetched list no longer matches the index).
    pub async fn open(
        sync: SyncCoordinator,
        events: mpsc::UnboundedReceiver<SyncEvent>,
        presenter: Box<dyn Presenter>,
        campaign_ids: Vec<i64>,
        resume: Option<ResumeDrop>,
    ) -> Result<Self, AppError> {
        let mut session = Self {
            queue: VoterQueue::new(),
            sync,
            events,
            presenter,
            campaign_ids,
        };

        let cached = session.populate().await?;
        match resume {
            Some(ResumeDrop(index)) if cached => {
                tracing::info!("Dropping reported voter at index {}", index);
                if session.drop_voter(index).await? == DropOutcome::Ignored {
                    session.render();
                }
            }
            Some(ResumeDrop(index)) => {
                tracing::warn!(
                    "Ignoring drop of index {}: voter list is being refetched",
                    index
                );
                session.render();
            }
            None => session.render(),
        }

        Ok(session)
    }

    pub fn queue(&self) -> &VoterQueue {
        &self.queue
    }

    pub fn campaign_ids(&self) -> &[i64] {
        &self.campaign_ids
    }

    pub fn card(&self) -> VoterCard {
        self.queue.card()
    }

    /// Outstanding network exchanges.
    pub fn in_flight(&self) -> usize {
        self.sync.in_flight()
    }

    /// Show the next voter.
    pub fn advance(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.queue.advance();
        self.render();
    }

    /// Flag the current voter's active number and move on.
    pub async fn flag(&mut self) -> Result<(), AppError> {
        let Some(outcome) = self.queue.flag() else {
            return Ok(());
        };

        if let Some(record) = outcome.record {
            self.sync.record_flag(record).await?;
        }

        match outcome.step {
            FlagStep::Advanced => {
                self.sync.persist_queue(self.queue.voters()).await?;
                self.render();
                Ok(())
            }
            FlagStep::Dropped(dropped) => self.after_drop(dropped).await,
        }
    }

    /// Remove the voter at `index`.
    pub async fn drop_voter(&mut self, index: usize) -> Result<DropOutcome, AppError> {
        let outcome = self.queue.drop_at(index);
        if outcome == DropOutcome::Ignored {
            tracing::warn!(
                "Ignoring drop of index {} (queue holds {})",
                index,
                self.queue.len()
            );
        }
        self.after_drop(outcome).await?;
        Ok(outcome)
    }

    /// Identity of the current voter for the report form.
    pub fn report_context(&self) -> Option<ReportContext> {
        self.queue.current().map(|voter| ReportContext {
            voter_id: voter.id,
            index: self.queue.cursor(),
        })
    }

    /// Queue an intelligence report for the voter in `context`.
    ///
    /// An empty payload shows [`Notice::EmptyReport`] and the validation
    /// error is returned; nothing is written.
    pub async fn submit_report(
        &mut self,
        context: &ReportContext,
        preferences: Preferences,
    ) -> Result<ResumeDrop, AppError> {
        let submitted =
            crate::report::submit_report(self.sync.store(), context, preferences).await;
        if let Err(AppError::Validation(reason)) = &submitted {
            tracing::warn!("Rejected report for voter {}: {}", context.voter_id, reason);
            self.presenter.notify(Notice::EmptyReport);
        }
        submitted
    }

    /// Wait for and apply the next sync completion.
    ///
    /// Returns `false` when nothing is outstanding.
    pub async fn pump(&mut self) -> Result<bool, AppError> {
        if self.sync.in_flight() == 0 {
            return Ok(false);
        }
        match self.events.recv().await {
            Some(event) => {
                self.handle(event).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub async fn poll(&mut self) -> Result<usize, AppError> {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event).await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Wait until every outstanding exchange has been applied.
    pub async fn settle(&mut self) -> Result<(), AppError> {
        while self.pump().await? {}
        Ok(())
    }

    async fn populate(&mut self) -> Result<bool, AppError> {
        match self.sync.populate_voters(&self.campaign_ids).await? {
            Population::Cached(voters) => {
                self.queue.load(voters);
                Ok(true)
            }
            Population::Requested { .. } => Ok(false),
        }
    }

    async fn after_drop(&mut self, outcome: DropOutcome) -> Result<(), AppError> {
        match outcome {
            DropOutcome::Removed => {
                self.sync.persist_queue(self.queue.voters()).await?;
                self.render();
            }
            DropOutcome::Exhausted => {
                self.sync.persist_queue(&[]).await?;
                self.render();
                self.presenter.notify(Notice::NoContactableVoters);
                if self.populate().await? {
                    self.render();
                }
            }
            DropOutcome::Ignored => {}
        }
        Ok(())
    }

    async fn handle(&mut self, event: SyncEvent) -> Result<(), AppError> {
        let Some(voters) = self.sync.apply(event).await? else {
            return Ok(());
        };

        if voters.is_empty() {
            self.queue.clear();
            self.render();
            self.presenter.notify(Notice::NoContactableVoters);
        } else {
            self.queue.load(voters);
            self.render();
        }
        Ok(())
    }

    fn render(&mut self) {
        let card = self.queue.card();
        self.presenter.render(&card);
    }
}
