pub mod exemption;
pub mod fee_schedule;
pub mod vehicle;

// Re-export commonly used types
pub use exemption::{ExemptDateRule, ExemptionPolicy};
pub use fee_schedule::{FeeBand, FeeScheduleTable};
pub use vehicle::{Vehicle, VehicleCategory, VehicleCategoryProvider};

pub use crate::shared::errors::{TaxError, TaxResult};
