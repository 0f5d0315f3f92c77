//! Remote gateway: HTTP exchanges with the campaign service's REST API.
//!
//! Every list endpoint speaks the `{"objects": [...]}` envelope. Fetches
//! accept only `200 OK`; batch deliveries count as applied only on
//! `202 Accepted`. No request timeout is configured, so a wedged request
//! stays outstanding until the transport gives up.

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{Campaign, Issue, Objects, PendingFlag, PendingReport, Voter};

/// Collection paths relative to the API base URL.
pub mod collections {
    pub const VOTER: &str = "voter";
    pub const VOTER_CONTACT: &str = "votercontact";
    pub const CAMPAIGN: &str = "campaign";
    pub const ISSUE: &str = "issue";
}

/// Result of a batch delivery that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// `202 Accepted`: the whole batch was applied
    Accepted,
    /// Any other status: nothing may be assumed about the batch
    NotAccepted(u16),
}

impl Delivery {
    fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::ACCEPTED {
            Delivery::Accepted
        } else {
            Delivery::NotAccepted(status.as_u16())
        }
    }
}

/// Async client for the remote service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: Client,
    base_url: String,
}

impl RemoteGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, collection: &str) -> String {
        format!("{}/{}/", self.base_url, collection)
    }

    /// GET voters belonging to any of `campaign_ids`.
    pub async fn fetch_voters(&self, campaign_ids: &[i64]) -> Result<Vec<Voter>, AppError> {
        let filter = campaign_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        tracing::debug!("Requesting voters for campaigns [{}]", filter);
        let response = self
            .client
            .get(self.url(collections::VOTER))
            .query(&[("campaign_id", filter)])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        read_objects(response, "GET voters").await
    }

    /// PATCH a batch of flagged numbers to the voter collection.
    pub async fn deliver_flags(&self, flags: &[PendingFlag]) -> Result<Delivery, AppError> {
        tracing::debug!("PATCHing {} flags", flags.len());
        let response = self
            .client
            .patch(self.url(collections::VOTER))
            .json(&Objects::new(flags.to_vec()))
            .send()
            .await?;

        Ok(Delivery::from_status(response.status()))
    }

    /// PATCH the pending intelligence reports blob to the voter-contact collection.
    pub async fn deliver_reports(
        &self,
        reports: &Objects<PendingReport>,
    ) -> Result<Delivery, AppError> {
        tracing::debug!("PATCHing {} intelligence reports", reports.len());
        let response = self
            .client
            .patch(self.url(collections::VOTER_CONTACT))
            .json(reports)
            .send()
            .await?;

        Ok(Delivery::from_status(response.status()))
    }

    /// GET the campaigns the volunteer works for.
    pub async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        let response = self
            .client
            .get(self.url(collections::CAMPAIGN))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        read_objects(response, "GET campaigns").await
    }

    /// GET active issues, already sorted by label.
    pub async fn fetch_issues(&self) -> Result<Vec<Issue>, AppError> {
        let response = self
            .client
            .get(self.url(collections::ISSUE))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        read_objects(response, "GET issues").await
    }
}

async fn read_objects<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<Vec<T>, AppError> {
    let status = response.status();
    tracing::debug!("Response received for {}. Status code: {}", context, status);
    if status != StatusCode::OK {
        return Err(AppError::UnexpectedStatus {
            status: status.as_u16(),
            context: context.to_string(),
        });
    }
    let envelope: Objects<T> = response.json().await?;
    Ok(envelope.objects)
}
