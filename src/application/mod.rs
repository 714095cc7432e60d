pub mod services;

// Re-export key types for convenience
pub use services::{ChargingWindow, CongestionTaxCalculator, DailyTaxBreakdown, TaxRules};
