//! Reference data the dialing flow depends on: the volunteer's campaigns
//! and the issue list used by the report form.

mod campaigns;
mod issues;

pub use campaigns::*;
pub use issues::*;
