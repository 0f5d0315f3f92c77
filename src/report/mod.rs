//! Intelligence report builder.
//!
//! Turns the volunteer's issue selections and notes into a [`Preferences`]
//! payload, rejects empty payloads, and queues accepted reports for the next
//! sync. Submitting hands back a [`ResumeDrop`] so the dialing session can
//! remove the reported voter.

use crate::db::{keys, LocalStore};
use crate::errors::AppError;
use crate::models::{ContactMethod, PendingReport, Preferences, Stance, Voter};

/// One issue row on the report form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSelection {
    pub issue_id: String,
    /// `None` when neither support nor oppose was chosen
    pub stance: Option<Stance>,
}

impl IssueSelection {
    pub fn new(issue_id: impl Into<String>, stance: Option<Stance>) -> Self {
        Self {
            issue_id: issue_id.into(),
            stance,
        }
    }
}

/// Collect selections in form order. The first stance given for an issue
/// wins; later rows for the same issue are ignored, as are rows without a
/// stance. Blank text is dropped.
pub fn build_preferences(selections: &[IssueSelection], text: Option<&str>) -> Preferences {
    let mut preferences = Preferences::default();

    for selection in selections {
        if preferences.contains(&selection.issue_id) {
            continue;
        }
        match selection.stance {
            Some(Stance::Support) => preferences.support.push(selection.issue_id.clone()),
            Some(Stance::Oppose) => preferences.oppose.push(selection.issue_id.clone()),
            None => {}
        }
    }

    preferences.text = text
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string);

    preferences
}

/// Instruction for the dialing session to drop the voter at this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeDrop(pub usize);

impl ResumeDrop {
    /// Parse the handoff value. Absent or non-numeric values are ignored.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        match raw.trim().parse::<usize>() {
            Ok(index) => Some(ResumeDrop(index)),
            Err(_) => {
                tracing::warn!("Ignoring invalid drop parameter {:?}", raw);
                None
            }
        }
    }
}

/// The voter a report is about, and where that voter sat in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub voter_id: i64,
    pub index: usize,
}

impl ReportContext {
    /// Parse the handoff parameters.
    ///
    /// Missing or malformed values yield [`AppError::MissingContext`]; the
    /// caller should send the volunteer back to the dialing screen.
    pub fn from_params(id: Option<&str>, index: Option<&str>) -> Result<Self, AppError> {
        let voter_id = id
            .and_then(|id| id.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::MissingContext("Voter id is required".to_string()))?;
        let index = index
            .and_then(|index| index.trim().parse::<usize>().ok())
            .ok_or_else(|| AppError::MissingContext("Voter index is required".to_string()))?;

        Ok(Self { voter_id, index })
    }

    /// "First Last" of the voter at `index` in the cached list.
    pub async fn voter_name(&self, store: &LocalStore) -> Result<Option<String>, AppError> {
        let voters: Vec<Voter> = store.load(keys::VOTERS).await?.unwrap_or_default();
        Ok(voters
            .get(self.index)
            .map(|voter| format!("{} {}", voter.first_name, voter.last_name)))
    }
}

/// Queue a report for delivery and return the drop instruction.
///
/// An empty payload is rejected and nothing is written.
pub async fn submit_report(
    store: &LocalStore,
    context: &ReportContext,
    preferences: Preferences,
) -> Result<ResumeDrop, AppError> {
    if preferences.is_empty() {
        return Err(AppError::Validation(
            "At least one of support, oppose or text is required".to_string(),
        ));
    }

    store
        .push_report(PendingReport {
            method: ContactMethod::Voice,
            voter: context.voter_id,
            intelligence_report: preferences,
        })
        .await?;
    tracing::info!("Recorded intelligence report for voter {}", context.voter_id);

    Ok(ResumeDrop(context.index))
}
