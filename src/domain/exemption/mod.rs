//! Exemption aggregate

pub mod model;

pub use model::{ExemptDateRule, ExemptionPolicy};
