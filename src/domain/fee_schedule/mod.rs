//! Fee schedule aggregate
//!
//! Time-of-day fee bands and the table that looks crossings up in them.

pub mod model;

pub use model::{FeeBand, FeeScheduleTable};
