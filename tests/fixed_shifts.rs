#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::model::{DayStatus, HolidaySet, ShiftType, Turn};
use escala::scheduler::classify_fixed;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn full_week_is_five_work_two_rest() {
    // 02/06/2025 est un lundi
    let days = classify_fixed(ShiftType::M44, d(2025, 6, 2), d(2025, 6, 8), &HolidaySet::new());
    let statuses: Vec<_> = days.values().copied().collect();
    assert_eq!(statuses.len(), 7);
    assert!(statuses[..5].iter().all(|s| *s == DayStatus::Work(Turn::Morning)));
    assert_eq!(&statuses[5..], &[DayStatus::Rest, DayStatus::Rest]);
}

#[test]
fn june_2025_counts() {
    let days = classify_fixed(ShiftType::N40, d(2025, 6, 1), d(2025, 6, 30), &HolidaySet::new());
    let work = days.values().filter(|s| **s == DayStatus::Work(Turn::Night)).count();
    let rest = days.values().filter(|s| **s == DayStatus::Rest).count();
    assert_eq!((work, rest), (21, 9));
}

#[test]
fn holiday_wins_over_weekday_and_weekend() {
    let holidays: HolidaySet = [d(2025, 6, 19), d(2025, 6, 7)].into_iter().collect();
    let days = classify_fixed(ShiftType::T44, d(2025, 6, 1), d(2025, 6, 30), &holidays);
    assert_eq!(days[&d(2025, 6, 19)], DayStatus::Holiday);
    assert_eq!(days[&d(2025, 6, 7)], DayStatus::Holiday);
    assert_eq!(days[&d(2025, 6, 18)], DayStatus::Work(Turn::Afternoon));
    assert_eq!(days[&d(2025, 6, 8)], DayStatus::Rest);
}

#[test]
fn reversed_window_is_empty() {
    let days = classify_fixed(ShiftType::M44, d(2025, 6, 2), d(2025, 6, 1), &HolidaySet::new());
    assert!(days.is_empty());
}
