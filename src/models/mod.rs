//! Data models for the campaigner sync engine.
//!
//! Wire and persisted shapes match the remote service's JSON so the same
//! records can be cached locally and sent back without translation.

mod campaign;
mod envelope;
mod issue;
mod outcome;
mod voter;

pub use campaign::*;
pub use envelope::*;
pub use issue::*;
pub use outcome::*;
pub use voter::*;
