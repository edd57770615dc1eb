//! Integration tests for `BusinessTimeCalculator`.
//!
//! Run with `RUST_LOG=sla_time=debug` to see each reconciliation pass.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use sla_core::{Error, Result};
use sla_time::{
    BusinessOffset, BusinessTimeCalculator, CalendarId, CalendarSettings, ClosureInterval,
    ClosureSet, InMemoryClosureSource, WorkingCalendar,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// 2024-01-08 is a Monday
fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn closure(start: NaiveDateTime, minutes: i64) -> ClosureInterval {
    ClosureInterval::new(start, minutes).unwrap()
}

/// Working minutes of the default calendar inside `[from, to)`.
fn working_minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let mut total = 0;
    let mut date = from.date();
    while date <= to.date() {
        if date.weekday().number_from_monday() <= 5 {
            let open = date.and_hms_opt(9, 0, 0).unwrap().max(from);
            let close = date.and_hms_opt(17, 0, 0).unwrap().min(to);
            if close > open {
                total += (close - open).num_minutes();
            }
        }
        date = date.succ_opt().unwrap();
    }
    total
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn one_day_from_opening() {
    init_tracing();
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::empty();
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    assert_eq!(calc.add_business_time(at(8, 9, 0), 1, 0, 0).unwrap(), at(9, 9, 0));
}

#[test]
fn hours_roll_over_the_weekend() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::empty();
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    assert_eq!(calc.add_business_time(at(12, 16, 0), 0, 2, 0).unwrap(), at(15, 10, 0));
}

#[test]
fn start_at_close_snaps_to_next_opening() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::empty();
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    assert_eq!(calc.add_business_time(at(12, 17, 0), 0, 0, 30).unwrap(), at(15, 9, 30));
}

#[test]
fn closure_time_is_added_back() {
    init_tracing();
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 120)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");

    let outcome = calc
        .calculate(at(8, 8, 0), BusinessOffset::new(0, 3, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(8, 14, 0));
    assert_eq!(outcome.passes, 2);
    assert_eq!(outcome.last_pass_start, at(8, 12, 0));
    assert_eq!(outcome.charged, BusinessOffset::new(0, 2, 0));
}

#[test]
fn full_day_closure_costs_a_whole_day() {
    // Monday closed: 1d 1h of work from Monday morning is Tuesday plus an
    // hour on Wednesday
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 8 * 60).with_label("Monday off")]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(8, 8, 0), BusinessOffset::new(1, 1, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(10, 10, 0));
    assert_eq!(outcome.charged, BusinessOffset::one_day());
}

#[test]
fn multi_day_closure_skips_its_working_days() {
    // Friday 00:00 to Tuesday 00:00 covers Friday and Monday
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(12, 0, 0), 4 * 1440)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(11, 16, 0), BusinessOffset::new(3, 0, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(18, 16, 0));
    assert_eq!(outcome.passes, 2);
    assert_eq!(outcome.charged, BusinessOffset::new(2, 0, 0));
}

#[test]
fn closure_touching_consecutive_windows_is_charged_on_each() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 8 * 60)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    // [Mon 09:00, Mon 10:00] then [Mon 10:00, Tue 10:00] both hold the closure
    let outcome = calc
        .calculate(at(8, 9, 0), BusinessOffset::new(0, 1, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(10, 10, 0));
    assert_eq!(outcome.passes, 3);
    assert_eq!(outcome.charged, BusinessOffset::new(2, 0, 0));
}

#[test]
fn deadline_never_lands_inside_a_long_closure() {
    init_tracing();
    // Monday 16:00 to Wednesday 10:00; each overlapping pass charges the
    // first day's 16:00-17:00 window once per visited day
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 16, 0), 2520)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(8, 15, 0), BusinessOffset::new(0, 2, 0))
        .unwrap();
    assert!(!closures.contains_instant(outcome.deadline));
    assert_eq!(outcome.deadline, at(10, 16, 0));
    assert_eq!(outcome.passes, 6);
    assert_eq!(outcome.charged, BusinessOffset::new(0, 15, 0));
}

#[test]
fn closure_charging_nothing_is_stepped_over() {
    // Saturday 18:00 to Monday 10:00 starts after Saturday's window, so its
    // working time is zero, yet it still covers Monday morning
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(13, 18, 0), 2400)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(12, 16, 0), BusinessOffset::new(0, 1, 30))
        .unwrap();
    assert_eq!(outcome.deadline, at(15, 10, 0));
    assert_eq!(outcome.passes, 2);
    assert!(outcome.charged.is_zero());
}

#[test]
fn closures_outside_the_window_are_ignored() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![
        closure(at(8, 15, 0), 60),
        closure(at(9, 9, 0), 480),
    ]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(8, 9, 0), BusinessOffset::new(0, 2, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(8, 11, 0));
    assert_eq!(outcome.passes, 1);
    assert!(outcome.charged.is_zero());
}

#[test]
fn zero_offset_returns_normalized_start() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::empty();
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    assert_eq!(calc.add(at(13, 10, 0), BusinessOffset::ZERO).unwrap(), at(15, 9, 0));
    assert_eq!(calc.add(at(10, 10, 30), BusinessOffset::ZERO).unwrap(), at(10, 10, 30));
}

#[test]
fn zero_offset_still_reconciles_closures() {
    // windows [08:00, 09:00], [09:00, 11:00] and [11:00, 13:00] all touch
    // the 09:00-11:00 closure
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 120)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc.calculate(at(8, 8, 0), BusinessOffset::ZERO).unwrap();
    assert_eq!(outcome.deadline, at(8, 15, 0));
    assert_eq!(outcome.passes, 4);
}

#[test]
fn reconciling_the_final_window_consumes_nothing() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![
        closure(at(8, 9, 0), 120),
        closure(at(8, 13, 0), 30),
        closure(at(9, 0, 0), 1439),
    ]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let outcome = calc
        .calculate(at(8, 8, 0), BusinessOffset::new(0, 5, 0))
        .unwrap();
    assert_eq!(outcome.deadline, at(8, 16, 30));

    let again = calc
        .reconcile(&closures, outcome.last_pass_start, outcome.deadline)
        .unwrap();
    assert!(again.is_zero());
    assert!(cal.is_valid_instant(outcome.deadline));
}

// ── Closure sources ───────────────────────────────────────────────────────────

#[test]
fn source_failure_aborts_the_calculation() {
    let cal = WorkingCalendar::default();
    let failing = |id: &CalendarId| -> Result<ClosureSet> {
        Err(Error::ClosureSource {
            calendar: id.to_string(),
            reason: "store unavailable".into(),
        })
    };
    let calc = BusinessTimeCalculator::new(&cal, &failing, "org-7");
    let err = calc.add_business_time(at(8, 9, 0), 0, 1, 0).unwrap_err();
    assert!(matches!(err, Error::ClosureSource { ref calendar, .. } if calendar == "org-7"));
}

#[test]
fn in_memory_source_is_keyed_by_calendar() {
    let cal = WorkingCalendar::default();
    let mut source = InMemoryClosureSource::new();
    source.insert("head-office", ClosureSet::new(vec![closure(at(8, 9, 0), 120)]));

    let head_office = BusinessTimeCalculator::new(&cal, &source, "head-office");
    assert_eq!(head_office.add_business_time(at(8, 8, 0), 0, 3, 0).unwrap(), at(8, 14, 0));

    let branch = BusinessTimeCalculator::new(&cal, &source, "branch");
    assert!(matches!(
        branch.add_business_time(at(8, 8, 0), 0, 3, 0),
        Err(Error::ClosureSource { .. })
    ));
}

#[test]
fn pass_cap_stops_a_long_chain() {
    // the Monday-to-Wednesday closure needs six passes
    let cal = WorkingCalendar::default();
    let fetches = AtomicUsize::new(0);
    let source = |_: &CalendarId| -> Result<ClosureSet> {
        fetches.fetch_add(1, Ordering::SeqCst);
        Ok(ClosureSet::new(vec![ClosureInterval::new(at(8, 16, 0), 2520)?]))
    };
    let calc = BusinessTimeCalculator::new(&cal, &source, "org").with_max_passes(4);
    let err = calc.add_business_time(at(8, 15, 0), 0, 2, 0).unwrap_err();
    assert!(matches!(err, Error::NonConvergence { passes: 4 }));
    assert_eq!(fetches.load(Ordering::SeqCst), 4);

    let calc = BusinessTimeCalculator::new(&cal, &source, "org").with_max_passes(6);
    assert_eq!(calc.add_business_time(at(8, 15, 0), 0, 2, 0).unwrap(), at(10, 16, 0));
}

#[test]
fn pass_cap_from_settings() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 120)]);
    let settings = CalendarSettings::from_toml_str("max_passes = 1").unwrap();
    let calc = settings.calculator(&cal, &closures, "org");
    assert!(matches!(
        calc.add_business_time(at(8, 8, 0), 0, 3, 0),
        Err(Error::NonConvergence { passes: 1 })
    ));
}

#[test]
fn calculator_is_shareable_across_threads() {
    let cal = WorkingCalendar::default();
    let closures = ClosureSet::new(vec![closure(at(8, 9, 0), 120)]);
    let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
    let results: HashSet<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| calc.add_business_time(at(8, 8, 0), 0, 3, 0).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, HashSet::from([at(8, 14, 0)]));
}

// ── Properties ────────────────────────────────────────────────────────────────

fn any_instant() -> impl Strategy<Value = NaiveDateTime> {
    (1u32..=28, 0u32..24, 0u32..60).prop_map(|(d, h, m)| at(d, h, m))
}

fn any_offset() -> impl Strategy<Value = BusinessOffset> {
    (0u32..4, 0u32..24, 0u32..180).prop_map(|(d, h, m)| BusinessOffset::new(d, h, m))
}

/// Closures starting on the hour inside the working window, from a minute
/// up to almost three days long.
fn any_closures() -> impl Strategy<Value = ClosureSet> {
    prop::collection::vec(
        (1u32..=28, 9u32..=15, 1i64..=4000).prop_map(|(d, h, minutes)| closure(at(d, h, 0), minutes)),
        0..4,
    )
    .prop_map(ClosureSet::new)
}

proptest! {
    #[test]
    fn result_is_a_valid_instant_not_before_start(start in any_instant(), offset in any_offset()) {
        let cal = WorkingCalendar::default();
        let closures = ClosureSet::empty();
        let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
        let end = calc.add(start, offset).unwrap();
        prop_assert!(end >= start);
        prop_assert!(cal.is_valid_instant(end));
    }

    #[test]
    fn working_time_is_conserved(start in any_instant(), offset in any_offset()) {
        let cal = WorkingCalendar::default();
        let closures = ClosureSet::empty();
        let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
        let end = calc.add(start, offset).unwrap();
        let expected = offset.days * 480 + offset.hours * 60 + offset.minutes;
        prop_assert_eq!(working_minutes_between(start, end), expected);
    }

    #[test]
    fn more_time_never_ends_earlier(start in any_instant(), offset in any_offset()) {
        let cal = WorkingCalendar::default();
        let closures = ClosureSet::empty();
        let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
        let base = calc.add(start, offset).unwrap();
        for extra in [
            BusinessOffset::new(0, 0, 1),
            BusinessOffset::new(0, 1, 0),
            BusinessOffset::one_day(),
        ] {
            let longer = calc.add(start, offset + extra).unwrap();
            prop_assert!(longer > base, "{} + {} ended at {} <= {}", offset, extra, longer, base);
        }
    }

    #[test]
    fn zero_offset_is_next_valid_instant(start in any_instant()) {
        let cal = WorkingCalendar::default();
        let closures = ClosureSet::empty();
        let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
        let (expected, _) = cal.next_valid_instant(start).unwrap();
        prop_assert_eq!(calc.add(start, BusinessOffset::ZERO).unwrap(), expected);
    }

    #[test]
    fn deadline_is_valid_outside_closures_and_settled(
        start in any_instant(),
        offset in any_offset(),
        closures in any_closures(),
    ) {
        let cal = WorkingCalendar::default();
        let calc = BusinessTimeCalculator::new(&cal, &closures, "org");
        let outcome = calc.calculate(start, offset).unwrap();

        prop_assert!(cal.is_valid_instant(outcome.deadline));
        prop_assert!(!closures.contains_instant(outcome.deadline));
        let again = calc
            .reconcile(&closures, outcome.last_pass_start, outcome.deadline)
            .unwrap();
        prop_assert!(again.is_zero());
    }

    #[test]
    fn closures_never_shorten_the_deadline(
        start in any_instant(),
        offset in any_offset(),
        closures in any_closures(),
    ) {
        let cal = WorkingCalendar::default();
        let plain = BusinessTimeCalculator::new(&cal, &ClosureSet::empty(), "org")
            .add(start, offset)
            .unwrap();
        let with_closures = BusinessTimeCalculator::new(&cal, &closures, "org")
            .add(start, offset)
            .unwrap();
        prop_assert!(with_closures >= plain);
    }
}
