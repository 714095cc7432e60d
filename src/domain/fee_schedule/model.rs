//! Fee schedule domain entity

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::shared::errors::{TaxError, TaxResult};

/// Time-of-day band with the fee charged for a crossing inside it.
///
/// Both ends are inclusive and compared at minute precision, so a band
/// ending at `06:29` still covers `06:29:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBand {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Fee in whole currency units
    pub fee: u32,
}

impl FeeBand {
    pub fn new(start: NaiveTime, end: NaiveTime, fee: i64) -> TaxResult<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);

        if start > end {
            return Err(TaxError::config(format!(
                "fee band {} - {} starts after it ends",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        if fee < 0 {
            return Err(TaxError::config(format!(
                "fee band {} - {} has negative fee {fee}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        let fee = u32::try_from(fee)
            .map_err(|_| TaxError::config(format!("fee {fee} is out of range")))?;

        Ok(Self { start, end, fee })
    }

    /// Build a band from `HH:MM` strings.
    pub fn parse(start: &str, end: &str, fee: i64) -> TaxResult<Self> {
        Self::new(parse_hh_mm(start)?, parse_hh_mm(end)?, fee)
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let time = truncate_to_minute(time);
        self.start <= time && time <= self.end
    }

    fn overlaps(&self, other: &FeeBand) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for FeeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} => {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.fee
        )
    }
}

/// Lookup table from time of day to crossing fee.
///
/// Bands are kept sorted by start time and never overlap. Times not
/// covered by any band are free.
#[derive(Debug, Clone, Default)]
pub struct FeeScheduleTable {
    bands: Vec<FeeBand>,
}

impl FeeScheduleTable {
    pub fn new(bands: impl IntoIterator<Item = FeeBand>) -> TaxResult<Self> {
        let mut bands: Vec<FeeBand> = bands.into_iter().collect();
        bands.sort_by_key(|band| (band.start, band.end));

        for pair in bands.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(TaxError::config(format!(
                    "fee bands overlap: [{}] and [{}]",
                    pair[0], pair[1]
                )));
            }
        }

        Ok(Self { bands })
    }

    /// Fee for a crossing at `timestamp`. Only the hour and minute are read.
    pub fn fee_at(&self, timestamp: NaiveDateTime) -> u32 {
        self.fee_at_time(timestamp.time())
    }

    pub fn fee_at_time(&self, time: NaiveTime) -> u32 {
        self.bands
            .iter()
            .find(|band| band.contains(time))
            .map(|band| band.fee)
            .unwrap_or(0)
    }

    pub fn bands(&self) -> &[FeeBand] {
        &self.bands
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

fn parse_hh_mm(value: &str) -> TaxResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| TaxError::config(format!("invalid time of day {value:?}: {e}")))
}

// ── Tests ──────────────────────────────────────────────────────
