#![forbid(unsafe_code)]
use chrono::{Datelike, NaiveDate, Weekday};
use escala::model::{DayStatus, HolidaySet, Turn};
use escala::scheduler::{
    classify_six_by_one, RestTracker, MAX_CONSECUTIVE_WORK_DAYS, MAX_WEEKS_WITHOUT_REST_SUNDAY,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn tracker_starts_from_weeks_since_last_rest() {
    let start = d(2025, 6, 1);
    assert_eq!(RestTracker::new(start, None).control().weeks_without_rest_sunday, 0);
    assert_eq!(
        RestTracker::new(start, Some(d(2025, 5, 25))).control().weeks_without_rest_sunday,
        1
    );
    assert_eq!(
        RestTracker::new(start, Some(d(2025, 4, 13))).control().weeks_without_rest_sunday,
        7
    );
    // dernier repos postérieur au début : plancher à 0
    assert_eq!(
        RestTracker::new(start, Some(d(2025, 6, 8))).control().weeks_without_rest_sunday,
        0
    );
}

#[test]
fn never_more_than_six_consecutive_work_days() {
    let (days, _) = classify_six_by_one(
        Turn::Morning,
        d(2025, 1, 1),
        d(2025, 12, 31),
        &HolidaySet::new(),
        Some(d(2024, 11, 17)),
    );
    let mut run = 0;
    for status in days.values() {
        if status.is_work() {
            run += 1;
            assert!(run <= MAX_CONSECUTIVE_WORK_DAYS);
        } else {
            run = 0;
        }
    }
}

#[test]
fn a_rest_sunday_at_least_every_seven_weeks() {
    let (days, control) = classify_six_by_one(
        Turn::Night,
        d(2025, 1, 1),
        d(2025, 12, 31),
        &HolidaySet::new(),
        None,
    );
    let mut worked_sundays = 0;
    for (day, status) in &days {
        if day.weekday() != Weekday::Sun {
            continue;
        }
        if status.is_work() {
            worked_sundays += 1;
            assert!(worked_sundays <= MAX_WEEKS_WITHOUT_REST_SUNDAY);
        } else {
            worked_sundays = 0;
        }
    }
    assert!(control.sundays_rested > 0);
}

#[test]
fn june_2025_after_rest_on_25_may() {
    let (days, control) = classify_six_by_one(
        Turn::Night,
        d(2025, 6, 1),
        d(2025, 6, 30),
        &HolidaySet::new(),
        Some(d(2025, 5, 25)),
    );
    assert_eq!(days.len(), 30);
    assert_eq!(days[&d(2025, 6, 1)], DayStatus::Work(Turn::Night));
    // six jours travaillés (dim. 1 → ven. 6), puis repos le samedi
    assert_eq!(days[&d(2025, 6, 7)], DayStatus::Rest);
    assert_eq!(days[&d(2025, 6, 14)], DayStatus::Rest);
    assert_eq!(control.last_rest_sunday, Some(d(2025, 5, 25)));
    assert_eq!(control.sundays_rested, 0);
    assert_eq!(control.weeks_without_rest_sunday, 6);
}

#[test]
fn sunday_forced_after_six_weeks_resets_counters() {
    let (days, control) = classify_six_by_one(
        Turn::Night,
        d(2025, 6, 1),
        d(2025, 7, 8),
        &HolidaySet::new(),
        Some(d(2025, 5, 25)),
    );
    assert_eq!(days[&d(2025, 7, 5)], DayStatus::Rest);
    assert_eq!(days[&d(2025, 7, 6)], DayStatus::Rest);
    assert_eq!(days[&d(2025, 7, 7)], DayStatus::Work(Turn::Night));
    assert_eq!(control.last_rest_sunday, Some(d(2025, 7, 6)));
    assert_eq!(control.sundays_rested, 1);
    assert_eq!(control.weeks_without_rest_sunday, 0);
}

#[test]
fn forced_sunday_also_resets_consecutive_days() {
    let mut tracker = RestTracker::new(d(2025, 6, 4), Some(d(2025, 4, 13)));
    // mer. 4 → sam. 7 travaillés
    for day in 4..=7 {
        assert!(tracker.step(d(2025, 6, day), Turn::Day).is_work());
    }
    assert_eq!(tracker.consecutive_work_days(), 4);
    assert_eq!(tracker.step(d(2025, 6, 8), Turn::Day), DayStatus::Rest);
    assert_eq!(tracker.consecutive_work_days(), 0);
    assert_eq!(tracker.control().last_rest_sunday, Some(d(2025, 6, 8)));
}

#[test]
fn holidays_do_not_break_the_cycle() {
    let holidays: HolidaySet = [d(2025, 6, 19)].into_iter().collect();
    let (with, _) = classify_six_by_one(Turn::Morning, d(2025, 6, 1), d(2025, 6, 30), &holidays, None);
    let (without, _) =
        classify_six_by_one(Turn::Morning, d(2025, 6, 1), d(2025, 6, 30), &HolidaySet::new(), None);
    assert_eq!(with, without);
}
