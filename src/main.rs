//! Campaigner sync runner.
//!
//! Runs one populate cycle for the selected campaigns: delivers any pending
//! flags and intelligence reports, refreshes the voter list if it has
//! expired, and logs the voter to call next.
//!
//! Usage: `campaigner-sync [DROP_INDEX]`

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campaigner_sync::catalog::CampaignRoster;
use campaigner_sync::clock::SystemClock;
use campaigner_sync::presenter::LogPresenter;
use campaigner_sync::report::ResumeDrop;
use campaigner_sync::{CallSession, Config, LocalStore, RemoteGateway, SyncCoordinator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting campaigner sync");
    tracing::info!("API base: {}", config.api_url);
    tracing::info!("Store path: {:?}", config.db_path);

    let store = LocalStore::open(&config.db_path).await?;
    let gateway = RemoteGateway::new(config.api_url.clone())?;

    // Campaign selection; fall back to whatever is cached if the server is unreachable
    let campaign_ids = match CampaignRoster::load(store.clone(), gateway.clone()).await {
        Ok(roster) => roster.selected_ids(),
        Err(e) => {
            tracing::warn!("Could not load campaigns: {}", e);
            CampaignRoster::cached_selection(&store).await?
        }
    };
    tracing::info!("Selected campaigns: {:?}", campaign_ids);

    let resume = ResumeDrop::parse(std::env::args().nth(1).as_deref());

    let (sync, events) = SyncCoordinator::new(
        store.clone(),
        gateway,
        Arc::new(SystemClock),
        config.voter_ttl,
    );
    let mut session = CallSession::open(
        sync,
        events,
        Box::new(LogPresenter),
        campaign_ids,
        resume,
    )
    .await?;

    session.settle().await?;

    let card = session.card();
    tracing::info!(
        "Next call: {} ({}) at {}; {} voters queued",
        card.name,
        card.location,
        card.phone_text(),
        card.remaining
    );
    tracing::info!(
        "Pending: {} flags, {} intelligence reports",
        store.pending_flags().await?.len(),
        store.pending_reports().await?.len()
    );

    Ok(())
}
