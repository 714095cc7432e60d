//! # Congestion Tax
//!
//! Daily congestion tax for vehicles crossing toll points.
//!
//! ## Architecture
//!
//! - **domain**: fee schedule, exemption rules and vehicle categories
//! - **application**: the daily aggregation service
//! - **shared**: error types
//! - **config**: TOML configuration and the default Gothenburg rules
//! - **telemetry**: tracing subscriber setup
//!
//! ```rust
//! use chrono::NaiveDate;
//! use congestion_tax::{AppConfig, VehicleCategory};
//!
//! let calculator = AppConfig::default().build_calculator()?;
//! let crossing = NaiveDate::from_ymd_opt(2013, 2, 7)
//!     .unwrap()
//!     .and_hms_opt(6, 15, 0)
//!     .unwrap();
//! assert_eq!(calculator.daily_tax(&VehicleCategory::Car, &[crossing])?, 8);
//! # Ok::<(), congestion_tax::TaxError>(())
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod shared;
pub mod telemetry;

pub use config::{default_config_path, AppConfig};

pub use application::{ChargingWindow, CongestionTaxCalculator, DailyTaxBreakdown, TaxRules};
pub use domain::{
    ExemptDateRule, ExemptionPolicy, FeeBand, FeeScheduleTable, Vehicle, VehicleCategory,
    VehicleCategoryProvider,
};
pub use shared::errors::{ConfigLoadError, TaxError, TaxResult};
