//! Campaigner Sync
//!
//! Offline-first voter contact queue for phone-bank volunteers: caches voters
//! locally, serves them one at a time, records flagged numbers and
//! intelligence reports durably, and reconciles with the remote campaign
//! service whenever the queue is repopulated.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod presenter;
pub mod queue;
pub mod report;
pub mod session;
pub mod sync;

pub use config::Config;
pub use db::LocalStore;
pub use errors::AppError;
pub use gateway::RemoteGateway;
pub use session::CallSession;
pub use sync::SyncCoordinator;

#[cfg(test)]
mod tests;
