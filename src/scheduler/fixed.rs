use super::types::DayMap;
use crate::calendar::iterate_days;
use crate::model::{DayStatus, HolidaySet, ShiftType};
use chrono::{Datelike, NaiveDate, Weekday};

/// Escalas 44h/40h : lundi-vendredi travaillés, week-end en repos.
///
/// Un jour férié l'emporte sur le jour de la semaine.
pub fn classify_fixed(
    shift: ShiftType,
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HolidaySet,
) -> DayMap {
    let turn = shift.turn();
    iterate_days(start, end)
        .map(|day| {
            let status = if holidays.contains(day) {
                DayStatus::Holiday
            } else if is_weekend(day) {
                DayStatus::Rest
            } else {
                DayStatus::Work(turn)
            };
            (day, status)
        })
        .collect()
}

pub(crate) fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
