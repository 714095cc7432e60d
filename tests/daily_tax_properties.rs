//! Property-based tests for daily tax aggregation
//!
//! Crossings are generated as second offsets into a single day so every
//! generated set respects the one-calendar-day precondition.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use congestion_tax::{
    AppConfig, CongestionTaxCalculator, ExemptionPolicy, TaxError, VehicleCategory,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn calculator() -> CongestionTaxCalculator {
    AppConfig::default().build_calculator().unwrap()
}

/// Strategy for a date in 2013 (weekdays, weekends and holidays alike)
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2013, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// Strategy for one day of crossings, unsorted
fn crossings_strategy() -> impl Strategy<Value = Vec<NaiveDateTime>> {
    (date_strategy(), vec(0i64..(24 * 60 * 60), 1..40)).prop_map(|(date, seconds)| {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();
        seconds
            .into_iter()
            .map(|s| midnight + Duration::seconds(s))
            .collect()
    })
}

fn to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0).unwrap()
}

fn category_strategy() -> impl Strategy<Value = VehicleCategory> {
    proptest::sample::select(VehicleCategory::ALL.to_vec())
}

proptest! {
    /// The daily cap always holds
    #[test]
    fn total_never_exceeds_cap(
        category in category_strategy(),
        crossings in crossings_strategy(),
    ) {
        let tax = calculator().daily_tax(&category, &crossings).unwrap();
        prop_assert!(tax <= 60);
    }

    /// Exempt categories never pay, whatever the crossings
    #[test]
    fn exempt_vehicles_pay_nothing(
        category in proptest::sample::select(ExemptionPolicy::DEFAULT_EXEMPT_VEHICLES.to_vec()),
        crossings in crossings_strategy(),
    ) {
        prop_assert_eq!(calculator().daily_tax(&category, &crossings).unwrap(), 0);
    }

    /// Input order does not change the result
    #[test]
    fn order_does_not_matter(crossings in crossings_strategy()) {
        let calc = calculator();
        let mut reversed = crossings.clone();
        reversed.reverse();
        prop_assert_eq!(
            calc.daily_tax(&VehicleCategory::Car, &crossings).unwrap(),
            calc.daily_tax(&VehicleCategory::Car, &reversed).unwrap()
        );
    }

    /// Every window is charged at most its highest single fee, so the
    /// uncapped total never exceeds the sum of the individual fees
    #[test]
    fn windows_never_charge_more_than_individual_crossings(crossings in crossings_strategy()) {
        let calc = calculator();
        let breakdown = calc.daily_tax_breakdown(&VehicleCategory::Car, &crossings).unwrap();
        let individual: u32 = crossings
            .iter()
            .map(|&t| calc.toll_fee(VehicleCategory::Car, t))
            .sum();
        prop_assert!(breakdown.uncapped_total <= individual);
        prop_assert_eq!(
            breakdown.windows.iter().map(|w| w.crossings).sum::<usize>(),
            crossings.len()
        );
    }

    /// Window anchors are more than an hour apart at minute precision
    #[test]
    fn window_anchors_are_more_than_an_hour_apart(crossings in crossings_strategy()) {
        let breakdown = calculator()
            .daily_tax_breakdown(&VehicleCategory::Car, &crossings)
            .unwrap();
        for pair in breakdown.windows.windows(2) {
            prop_assert!(to_minute(pair[1].anchor) - to_minute(pair[0].anchor) > Duration::minutes(60));
        }
    }

    /// fee_at depends on the time of day only
    #[test]
    fn fee_at_is_date_independent(
        a in date_strategy(),
        b in date_strategy(),
        minute in 0i64..(24 * 60),
    ) {
        let calc = calculator();
        let t = Duration::minutes(minute);
        prop_assert_eq!(
            calc.fee_at(a.and_hms_opt(0, 0, 0).unwrap() + t),
            calc.fee_at(b.and_hms_opt(0, 0, 0).unwrap() + t)
        );
    }
}

#[test]
fn empty_crossings_are_rejected_for_every_category() {
    let calc = calculator();
    for category in VehicleCategory::ALL {
        let err = calc.daily_tax(&category, &[]).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput(_)), "{category}");
    }
}

#[test]
fn scenario_motorcycle_on_weekday() {
    // 2013-02-07 is a Thursday
    let t = NaiveDate::from_ymd_opt(2013, 2, 7)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();
    assert_eq!(calculator().daily_tax(&VehicleCategory::Motorcycle, &[t]).unwrap(), 0);
}

#[test]
fn crossing_seconds_do_not_split_a_window() {
    let day = NaiveDate::from_ymd_opt(2013, 2, 7).unwrap();
    let breakdown = calculator()
        .daily_tax_breakdown(
            &VehicleCategory::Car,
            &[
                day.and_hms_opt(6, 0, 0).unwrap(),
                day.and_hms_opt(7, 0, 30).unwrap(),
            ],
        )
        .unwrap();
    assert_eq!(breakdown.windows.len(), 1);
    assert_eq!(breakdown.total, 18);
}

#[test]
fn scenario_gothenburg_day() {
    let day = NaiveDate::from_ymd_opt(2013, 2, 8).unwrap();
    let t = |h, m| day.and_hms_opt(h, m, 0).unwrap();
    let calc = calculator();

    // 06:20 (8) and 06:45 (13) share a window: 13
    // 07:30 (18) opens the next one; 08:10 (13) joins it: 18
    // 15:50 (18) stands alone
    let breakdown = calc
        .daily_tax_breakdown(
            &VehicleCategory::Car,
            &[t(6, 20), t(6, 45), t(7, 30), t(8, 10), t(15, 50)],
        )
        .unwrap();
    let charges: Vec<u32> = breakdown.windows.iter().map(|w| w.charge).collect();
    assert_eq!(charges, vec![13, 18, 18]);
    assert_eq!(breakdown.total, 49);
}
