//! Exemption rules for vehicles and dates

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::vehicle::VehicleCategory;
use crate::shared::errors::{TaxError, TaxResult};

/// A rule that makes a date toll free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptDateRule {
    /// Saturdays and Sundays
    Weekend,
    /// A single day of the month
    Day { month: u32, day: u32 },
    /// Every day of a month
    Month { month: u32 },
}

impl ExemptDateRule {
    pub fn day(month: u32, day: u32) -> Self {
        Self::Day { month, day }
    }

    pub fn month(month: u32) -> Self {
        Self::Month { month }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Weekend => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Self::Day { month, day } => date.month() == month && date.day() == day,
            Self::Month { month } => date.month() == month,
        }
    }

    /// Check that the rule can match at least one date of `year`.
    fn validate_for(&self, year: i32) -> TaxResult<()> {
        match *self {
            Self::Weekend => Ok(()),
            Self::Day { month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map(|_| ())
                .ok_or_else(|| {
                    TaxError::config(format!("{year}-{month:02}-{day:02} is not a valid date"))
                }),
            Self::Month { month } if (1..=12).contains(&month) => Ok(()),
            Self::Month { month } => Err(TaxError::config(format!(
                "month {month} is out of range in exemptions for {year}"
            ))),
        }
    }
}

/// Decides which vehicles and dates are never charged.
///
/// Recurring rules apply to every year; calendar rules only to the year
/// they are registered under. A year with no entry simply has no
/// calendar exemptions.
#[derive(Debug, Clone, Default)]
pub struct ExemptionPolicy {
    exempt_vehicles: HashSet<VehicleCategory>,
    recurring: Vec<ExemptDateRule>,
    calendar: BTreeMap<i32, Vec<ExemptDateRule>>,
}

impl ExemptionPolicy {
    /// Categories that are toll free unless configured otherwise.
    pub const DEFAULT_EXEMPT_VEHICLES: [VehicleCategory; 6] = [
        VehicleCategory::Motorcycle,
        VehicleCategory::Tractor,
        VehicleCategory::Emergency,
        VehicleCategory::Diplomat,
        VehicleCategory::Foreign,
        VehicleCategory::Military,
    ];

    pub fn new(exempt_vehicles: impl IntoIterator<Item = VehicleCategory>) -> Self {
        Self {
            exempt_vehicles: exempt_vehicles.into_iter().collect(),
            recurring: Vec::new(),
            calendar: BTreeMap::new(),
        }
    }

    pub fn with_recurring(mut self, rule: ExemptDateRule) -> Self {
        self.recurring.push(rule);
        self
    }

    /// Register calendar exemptions for one year. Rules are appended to any
    /// already registered for that year.
    pub fn with_year(
        mut self,
        year: i32,
        rules: impl IntoIterator<Item = ExemptDateRule>,
    ) -> TaxResult<Self> {
        let rules: Vec<ExemptDateRule> = rules.into_iter().collect();
        for rule in &rules {
            rule.validate_for(year)?;
        }
        self.calendar.entry(year).or_default().extend(rules);
        Ok(self)
    }

    pub fn is_exempt_vehicle(&self, category: VehicleCategory) -> bool {
        self.exempt_vehicles.contains(&category)
    }

    pub fn is_exempt_date(&self, date: NaiveDate) -> bool {
        self.recurring.iter().any(|rule| rule.matches(date))
            || self
                .calendar
                .get(&date.year())
                .is_some_and(|rules| rules.iter().any(|rule| rule.matches(date)))
    }

    pub fn exempt_vehicles(&self) -> impl Iterator<Item = VehicleCategory> + '_ {
        self.exempt_vehicles.iter().copied()
    }

    /// Years that carry calendar exemptions
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.calendar.keys().copied()
    }
}

// ── Tests ──────────────────────────────────────────────────────
