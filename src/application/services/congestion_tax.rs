//! Congestion tax service: daily aggregation of toll crossings

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    ExemptionPolicy, FeeScheduleTable, TaxError, TaxResult, VehicleCategory,
    VehicleCategoryProvider,
};

/// Limits applied when aggregating one day of crossings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRules {
    /// Maximum total charged for one vehicle in one day
    pub daily_cap: u32,
    /// Length of a charging window, measured from its first crossing
    pub window: Duration,
}

impl TaxRules {
    pub const DEFAULT_DAILY_CAP: u32 = 60;
    pub const DEFAULT_WINDOW_MINUTES: i64 = 60;

    pub fn new(daily_cap: u32, window_minutes: i64) -> TaxResult<Self> {
        if window_minutes <= 0 {
            return Err(TaxError::config(format!(
                "charging window must be positive, got {window_minutes} minutes"
            )));
        }
        Ok(Self {
            daily_cap,
            window: Duration::minutes(window_minutes),
        })
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            daily_cap: Self::DEFAULT_DAILY_CAP,
            window: Duration::minutes(Self::DEFAULT_WINDOW_MINUTES),
        }
    }
}

/// Crossings charged together as one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargingWindow {
    /// First crossing of the window; every later crossing is measured against it
    pub anchor: NaiveDateTime,
    pub crossings: usize,
    /// Highest fee seen in the window
    pub charge: u32,
}

impl ChargingWindow {
    fn open(anchor: NaiveDateTime, fee: u32) -> Self {
        Self {
            anchor,
            crossings: 1,
            charge: fee,
        }
    }

    fn absorb(&mut self, fee: u32) {
        self.crossings += 1;
        self.charge = self.charge.max(fee);
    }
}

/// Result of a daily tax computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTaxBreakdown {
    pub category: VehicleCategory,
    pub date: NaiveDate,
    pub vehicle_exempt: bool,
    pub windows: Vec<ChargingWindow>,
    /// Sum of window charges before the daily cap
    pub uncapped_total: u32,
    pub total: u32,
}

#[derive(Debug, Error)]
#[error("fee total overflowed while adding window anchored at {anchor}")]
struct FeeOverflow {
    anchor: NaiveDateTime,
}

/// Computes the congestion tax owed for one vehicle over one day.
///
/// The calculator holds only read-only tables, so a single instance can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct CongestionTaxCalculator {
    schedule: FeeScheduleTable,
    exemptions: ExemptionPolicy,
    rules: TaxRules,
}

impl CongestionTaxCalculator {
    pub fn new(schedule: FeeScheduleTable, exemptions: ExemptionPolicy, rules: TaxRules) -> Self {
        Self {
            schedule,
            exemptions,
            rules,
        }
    }

    pub fn schedule(&self) -> &FeeScheduleTable {
        &self.schedule
    }

    pub fn exemptions(&self) -> &ExemptionPolicy {
        &self.exemptions
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Scheduled fee at the crossing's time of day, ignoring exemptions.
    pub fn fee_at(&self, timestamp: NaiveDateTime) -> u32 {
        self.schedule.fee_at(timestamp)
    }

    /// Fee for a single crossing with vehicle and date exemptions applied.
    pub fn toll_fee(&self, category: VehicleCategory, timestamp: NaiveDateTime) -> u32 {
        if self.exemptions.is_exempt_vehicle(category) {
            return 0;
        }
        self.crossing_fee(timestamp)
    }

    /// Total tax for one day of crossings, after the daily cap.
    pub fn daily_tax<V>(&self, vehicle: &V, crossings: &[NaiveDateTime]) -> TaxResult<u32>
    where
        V: VehicleCategoryProvider + ?Sized,
    {
        self.daily_tax_breakdown(vehicle, crossings)
            .map(|breakdown| breakdown.total)
    }

    /// Same as [`daily_tax`](Self::daily_tax) but keeps the charging windows.
    ///
    /// Crossings are sorted before aggregation. A window is anchored at its
    /// first crossing and takes in every crossing up to and including
    /// `rules.window` later; only the highest fee in a window is charged.
    /// Crossings on exempt dates still open and join windows, they just
    /// contribute a fee of zero.
    pub fn daily_tax_breakdown<V>(
        &self,
        vehicle: &V,
        crossings: &[NaiveDateTime],
    ) -> TaxResult<DailyTaxBreakdown>
    where
        V: VehicleCategoryProvider + ?Sized,
    {
        let category = vehicle
            .vehicle_category()
            .ok_or_else(|| TaxError::invalid_input("vehicle category is required"))?;

        let mut sorted = crossings.to_vec();
        sorted.sort_unstable();
        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(TaxError::invalid_input("at least one crossing is required")),
        };

        let date = first.date();
        if last.date() != date {
            warn!(
                %category,
                first = %first,
                last = %last,
                "Crossings span more than one calendar day"
            );
        }

        if self.exemptions.is_exempt_vehicle(category) {
            debug!(%category, "Vehicle category is exempt");
            return Ok(DailyTaxBreakdown {
                category,
                date,
                vehicle_exempt: true,
                windows: Vec::new(),
                uncapped_total: 0,
                total: 0,
            });
        }

        let windows = self.group_into_windows(&sorted);
        let uncapped_total = windows.iter().try_fold(0u32, |acc, window| {
            acc.checked_add(window.charge).ok_or_else(|| {
                TaxError::computation(
                    format!("summing daily tax for {category} on {date}"),
                    FeeOverflow {
                        anchor: window.anchor,
                    },
                )
            })
        })?;
        let total = uncapped_total.min(self.rules.daily_cap);

        info!(
            %category,
            %date,
            crossings = sorted.len(),
            windows = windows.len(),
            uncapped_total,
            total,
            "Daily congestion tax calculated"
        );

        Ok(DailyTaxBreakdown {
            category,
            date,
            vehicle_exempt: false,
            windows,
            uncapped_total,
            total,
        })
    }

    fn group_into_windows(&self, sorted: &[NaiveDateTime]) -> Vec<ChargingWindow> {
        let mut windows: Vec<ChargingWindow> = Vec::new();

        for &crossing in sorted {
            let fee = self.crossing_fee(crossing);
            match windows.last_mut() {
                Some(window) if self.within_window(window.anchor, crossing) => {
                    window.absorb(fee);
                    debug!(
                        anchor = %window.anchor,
                        %crossing,
                        fee,
                        charge = window.charge,
                        "Crossing joined charging window"
                    );
                }
                _ => {
                    debug!(anchor = %crossing, fee, "Charging window opened");
                    windows.push(ChargingWindow::open(crossing, fee));
                }
            }
        }

        windows
    }

    /// Crossings are compared at minute precision; seconds never push a
    /// crossing out of its window.
    fn within_window(&self, anchor: NaiveDateTime, crossing: NaiveDateTime) -> bool {
        truncate_to_minute(crossing) - truncate_to_minute(anchor) <= self.rules.window
    }

    fn crossing_fee(&self, timestamp: NaiveDateTime) -> u32 {
        if self.exemptions.is_exempt_date(timestamp.date()) {
            0
        } else {
            self.schedule.fee_at(timestamp)
        }
    }
}

fn truncate_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

// ── Tests ──────────────────────────────────────────────────────
