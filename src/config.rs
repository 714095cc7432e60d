//! Configuration module
//!
//! Application settings are read from a TOML file
//! (default: `~/.config/congestion-tax/config.toml`). Every section is
//! optional; missing sections fall back to the Gothenburg 2013 rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::application::{CongestionTaxCalculator, TaxRules};
use crate::domain::{
    ExemptDateRule, ExemptionPolicy, FeeBand, FeeScheduleTable, TaxError, TaxResult,
    VehicleCategory,
};
use crate::shared::errors::ConfigLoadError;

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("congestion-tax")
        .join("config.toml")
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "congestion_tax=debug"
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Aggregation limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    pub daily_cap: u32,
    pub window_minutes: i64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            daily_cap: TaxRules::DEFAULT_DAILY_CAP,
            window_minutes: TaxRules::DEFAULT_WINDOW_MINUTES,
        }
    }
}

/// One `[[fee_bands]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct FeeBandConfig {
    /// `HH:MM`, inclusive
    pub start: String,
    /// `HH:MM`, inclusive
    pub end: String,
    pub fee: i64,
}

impl FeeBandConfig {
    fn new(start: &str, end: &str, fee: i64) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            fee,
        }
    }
}

/// Calendar exemptions for a single year
#[derive(Debug, Clone, Deserialize)]
pub struct ExemptYearConfig {
    pub year: i32,
    /// `MM-DD` days
    #[serde(default)]
    pub dates: Vec<String>,
    /// Whole months, 1-12
    #[serde(default)]
    pub months: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExemptionConfig {
    pub vehicles: Vec<VehicleCategory>,
    pub weekends: bool,
    pub years: Vec<ExemptYearConfig>,
}

impl Default for ExemptionConfig {
    fn default() -> Self {
        Self {
            vehicles: ExemptionPolicy::DEFAULT_EXEMPT_VEHICLES.to_vec(),
            weekends: true,
            years: vec![gothenburg_2013_holidays()],
        }
    }
}

/// Root of the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tax: TaxConfig,
    pub fee_bands: Vec<FeeBandConfig>,
    pub exemptions: ExemptionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            tax: TaxConfig::default(),
            fee_bands: gothenburg_fee_bands(),
            exemptions: ExemptionConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn fee_schedule(&self) -> TaxResult<FeeScheduleTable> {
        let bands = self
            .fee_bands
            .iter()
            .map(|b| FeeBand::parse(&b.start, &b.end, b.fee))
            .collect::<TaxResult<Vec<_>>>()?;
        FeeScheduleTable::new(bands)
    }

    pub fn exemption_policy(&self) -> TaxResult<ExemptionPolicy> {
        let cfg = &self.exemptions;
        let mut policy = ExemptionPolicy::new(cfg.vehicles.iter().copied());
        if cfg.weekends {
            policy = policy.with_recurring(ExemptDateRule::Weekend);
        }

        for year in &cfg.years {
            let mut rules = year
                .dates
                .iter()
                .map(|d| parse_month_day(d))
                .collect::<TaxResult<Vec<_>>>()?;
            rules.extend(year.months.iter().map(|&m| ExemptDateRule::month(m)));
            policy = policy.with_year(year.year, rules)?;
        }

        Ok(policy)
    }

    pub fn tax_rules(&self) -> TaxResult<TaxRules> {
        TaxRules::new(self.tax.daily_cap, self.tax.window_minutes)
    }

    /// Validate the whole configuration and build a calculator from it.
    pub fn build_calculator(&self) -> TaxResult<CongestionTaxCalculator> {
        Ok(CongestionTaxCalculator::new(
            self.fee_schedule()?,
            self.exemption_policy()?,
            self.tax_rules()?,
        ))
    }
}

fn parse_month_day(value: &str) -> TaxResult<ExemptDateRule> {
    let invalid = || TaxError::config(format!("invalid exempt date {value:?}, expected MM-DD"));

    let (month, day) = value.trim().split_once('-').ok_or_else(invalid)?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    Ok(ExemptDateRule::day(month, day))
}

/// Gothenburg 2013 schedule. Under it 06:15 + 06:50 costs 13 and
/// 06:15 + 08:15 costs 21; the "8" and "8 + 8" day examples assume a flat
/// 8 for 06:00-06:59 and 08:00-08:59, which needs its own `[[fee_bands]]`.
fn gothenburg_fee_bands() -> Vec<FeeBandConfig> {
    vec![
        FeeBandConfig::new("06:00", "06:29", 8),
        FeeBandConfig::new("06:30", "06:59", 13),
        FeeBandConfig::new("07:00", "07:59", 18),
        FeeBandConfig::new("08:00", "08:29", 13),
        FeeBandConfig::new("08:30", "14:59", 8),
        FeeBandConfig::new("15:00", "15:29", 13),
        FeeBandConfig::new("15:30", "16:59", 18),
        FeeBandConfig::new("17:00", "17:59", 13),
        FeeBandConfig::new("18:00", "18:29", 8),
    ]
}

fn gothenburg_2013_holidays() -> ExemptYearConfig {
    let dates = [
        "01-01", "03-28", "03-29", "04-01", "04-30", "05-01", "05-08", "05-09", "06-05",
        "06-06", "06-21", "11-01", "12-24", "12-25", "12-26", "12-31",
    ];
    ExemptYearConfig {
        year: 2013,
        dates: dates.iter().map(|d| d.to_string()).collect(),
        months: vec![7],
    }
}

// ── Tests ──────────────────────────────────────────────────────
