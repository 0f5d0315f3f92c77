//! Outcome records awaiting delivery to the remote service.

use serde::{Deserialize, Serialize};

use super::PhoneSlot;

/// Marker value the remote voter resource interprets as "wrong number".
pub const FLAGGED: &str = "flagged";

/// A flagged phone number not yet acknowledged by the remote side.
///
/// Serializes as `{"resource_uri": ..., "phone_number1": "flagged"}` (or
/// `phone_number2`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFlag {
    pub resource_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number2: Option<String>,
}

impl PendingFlag {
    pub fn new(resource_uri: impl Into<String>, slot: PhoneSlot) -> Self {
        let marker = Some(FLAGGED.to_string());
        let (phone_number1, phone_number2) = match slot {
            PhoneSlot::One => (marker, None),
            PhoneSlot::Two => (None, marker),
        };
        Self {
            resource_uri: resource_uri.into(),
            phone_number1,
            phone_number2,
        }
    }
}

/// How the volunteer reached the voter. Only telephone is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ContactMethod {
    Voice,
}

impl From<ContactMethod> for u8 {
    fn from(method: ContactMethod) -> Self {
        match method {
            ContactMethod::Voice => 1,
        }
    }
}

impl TryFrom<u8> for ContactMethod {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ContactMethod::Voice),
            other => Err(format!("unknown contact method {}", other)),
        }
    }
}

/// A voter's position on one issue, as chosen by the volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Support,
    Oppose,
}

/// Issue preferences and notes gathered during one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub support: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oppose: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Preferences {
    /// True when there is nothing worth reporting.
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.oppose.is_empty() && self.text.is_none()
    }

    pub fn contains(&self, issue_id: &str) -> bool {
        self.support.iter().any(|id| id == issue_id) || self.oppose.iter().any(|id| id == issue_id)
    }
}

/// An intelligence report not yet acknowledged by the remote side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReport {
    pub method: ContactMethod,
    pub voter: i64,
    pub intelligence_report: Preferences,
}
