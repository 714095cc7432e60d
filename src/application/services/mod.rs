//! Application services

mod congestion_tax;

pub use congestion_tax::{ChargingWindow, CongestionTaxCalculator, DailyTaxBreakdown, TaxRules};
