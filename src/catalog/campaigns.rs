//! Campaign roster with per-campaign contact selection.

use crate::db::{keys, LocalStore};
use crate::errors::AppError;
use crate::gateway::RemoteGateway;
use crate::models::Campaign;

/// The remote service serves voters for at most this many campaigns.
pub const MAX_SELECTED_CAMPAIGNS: usize = 5;

/// Campaigns the volunteer works for, cached locally once fetched.
pub struct CampaignRoster {
    store: LocalStore,
    gateway: RemoteGateway,
    campaigns: Vec<Campaign>,
}

impl CampaignRoster {
    /// Use the cached roster if there is one, otherwise fetch it.
    pub async fn load(store: LocalStore, gateway: RemoteGateway) -> Result<Self, AppError> {
        let cached: Option<Vec<Campaign>> = store.load(keys::CAMPAIGNS).await?;
        let mut roster = Self {
            store,
            gateway,
            campaigns: Vec::new(),
        };

        match cached {
            Some(campaigns) => {
                tracing::info!("Found {} campaigns in local storage", campaigns.len());
                roster.campaigns = campaigns;
            }
            None => roster.fetch().await?,
        }
        Ok(roster)
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Flip the contact choice for the campaign at `index` and save.
    pub async fn toggle(&mut self, index: usize) -> Result<(), AppError> {
        let Some(campaign) = self.campaigns.get_mut(index) else {
            tracing::warn!("Ignoring toggle of unknown campaign index {}", index);
            return Ok(());
        };
        campaign.contact = !campaign.contact;
        tracing::debug!("Campaign {} contact = {}", campaign.id, campaign.contact);
        self.save().await
    }

    /// Discard the cached roster and fetch it again.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.store.remove(keys::CAMPAIGNS).await?;
        self.campaigns.clear();
        self.fetch().await
    }

    /// Ids of the campaigns selected for contact, capped at
    /// [`MAX_SELECTED_CAMPAIGNS`].
    pub fn selected_ids(&self) -> Vec<i64> {
        select_ids(&self.campaigns)
    }

    /// Selected ids read straight from the cache, without any network access.
    pub async fn cached_selection(store: &LocalStore) -> Result<Vec<i64>, AppError> {
        let campaigns: Vec<Campaign> = store.load(keys::CAMPAIGNS).await?.unwrap_or_default();
        Ok(select_ids(&campaigns))
    }

    async fn save(&self) -> Result<(), AppError> {
        if self.campaigns.is_empty() {
            return Ok(());
        }
        self.store.save(keys::CAMPAIGNS, &self.campaigns).await
    }

    async fn fetch(&mut self) -> Result<(), AppError> {
        tracing::info!("Requesting campaigns from the server");
        let mut campaigns = self.gateway.fetch_campaigns().await?;
        for campaign in &mut campaigns {
            campaign.contact = true;
        }
        self.campaigns = campaigns;
        self.save().await
    }
}

fn select_ids(campaigns: &[Campaign]) -> Vec<i64> {
    let selected: Vec<i64> = campaigns
        .iter()
        .filter(|campaign| campaign.contact)
        .map(|campaign| campaign.id)
        .collect();

    if selected.len() > MAX_SELECTED_CAMPAIGNS {
        tracing::warn!(
            "{} campaigns selected; only the first {} are used",
            selected.len(),
            MAX_SELECTED_CAMPAIGNS
        );
    }
    selected.into_iter().take(MAX_SELECTED_CAMPAIGNS).collect()
}
