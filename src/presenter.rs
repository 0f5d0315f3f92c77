//! View models handed to the user interface.
//!
//! Rendering itself lives outside this crate; the session calls a
//! [`Presenter`] whenever the current voter changes or a notice is due.

use crate::models::{format_phone, Voter};

/// What the dialing screen shows for the current voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterCard {
    /// Voters left in the queue
    pub remaining: usize,
    pub name: String,
    pub location: String,
    /// Active number, formatted for display
    pub phone: Option<String>,
}

impl VoterCard {
    /// Defaults shown when no voters are loaded.
    pub fn placeholder() -> Self {
        Self {
            remaining: 0,
            name: "Name: No data".to_string(),
            location: "Location: No data".to_string(),
            phone: None,
        }
    }

    pub fn for_voter(voter: &Voter, remaining: usize) -> Self {
        Self {
            remaining,
            name: voter.display_name(),
            location: voter.location(),
            phone: voter.active_phone().map(format_phone),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.remaining == 0
    }

    /// Text for the phone line.
    pub fn phone_text(&self) -> &str {
        match &self.phone {
            Some(phone) => phone,
            None if self.is_placeholder() => "No phone number",
            None => "No valid phone number",
        }
    }
}

/// User-visible messages that are not part of the voter card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Every voter for the selected campaigns has been exhausted or none were served
    NoContactableVoters,
    /// An intelligence report with no support, oppose or text was submitted
    EmptyReport,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoContactableVoters => {
                "There are no voters for the campaigns you selected. Please alter your selection."
            }
            Notice::EmptyReport => "Please provide useful information to your campaigns.",
        }
    }
}

/// Rendering seam implemented by the user interface.
pub trait Presenter: Send {
    fn render(&mut self, card: &VoterCard);
    fn notify(&mut self, notice: Notice);
}

/// Presenter that writes cards and notices to the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn render(&mut self, card: &VoterCard) {
        tracing::info!(
            remaining = card.remaining,
            "{} | {} | {}",
            card.name,
            card.location,
            card.phone_text()
        );
    }

    fn notify(&mut self, notice: Notice) {
        tracing::warn!("{}", notice.message());
    }
}
