//! Issue model.

use serde::{Deserialize, Serialize};

/// A political issue a voter can support or oppose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    /// Human-readable label
    pub issue: String,
}
