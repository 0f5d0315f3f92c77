//! Campaign model.

use serde::{Deserialize, Serialize};

/// A campaign the volunteer works for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    /// Whether the volunteer wants to contact voters for this campaign.
    /// Not part of the remote payload; every fetched campaign starts selected.
    #[serde(default = "default_contact")]
    pub contact: bool,
}

fn default_contact() -> bool {
    true
}
