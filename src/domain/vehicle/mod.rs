//! Vehicle aggregate
//!
//! Vehicle categories and the capability that reports them.

pub mod model;

pub use model::{Vehicle, VehicleCategory, VehicleCategoryProvider};
