use super::types::{ActiveSegment, DayMap};
use crate::calendar::{days_in_month, iterate_days, last_day_of_month, last_day_of_previous_month};
use crate::model::{DayStatus, HolidaySet, Parity, ShiftType};
use chrono::{Datelike, NaiveDate};

/// Un mois de 31 jours casse l'alternance pair/impair d'un jour.
const ALTERNATION_MONTH_LEN: u32 = 31;

/// Statut d'un jour pour un type de plantão donné (fériés ignorés).
pub fn classify_on_call_day(active: ShiftType, day: NaiveDate) -> DayStatus {
    match active.parity() {
        Some(parity) if Parity::of_day(day.day()) == parity => DayStatus::Work(active.turn()),
        _ => DayStatus::Rest,
    }
}

/// Type à appliquer après un mois de référence : inversé si ce mois a 31 jours.
pub fn next_active_type(active: ShiftType, reference: NaiveDate) -> ShiftType {
    if days_in_month(reference) == ALTERNATION_MONTH_LEN {
        active.flip_parity()
    } else {
        active
    }
}

/// Type actif au premier jour de la fenêtre.
///
/// Le mois de référence est celui du dernier plantão connu, à défaut le mois
/// qui précède `start`.
pub fn initial_active_type(
    nominal: ShiftType,
    start: NaiveDate,
    last_on_call: Option<NaiveDate>,
) -> ShiftType {
    match last_on_call.or_else(|| last_day_of_previous_month(start)) {
        Some(reference) => next_active_type(nominal, reference),
        None => nominal,
    }
}

/// Plantão sur `[start, end]`, découpé aux frontières de mois.
pub fn classify_on_call(
    nominal: ShiftType,
    start: NaiveDate,
    end: NaiveDate,
    _holidays: &HolidaySet,
    last_on_call: Option<NaiveDate>,
) -> (DayMap, Vec<ActiveSegment>) {
    let mut days = DayMap::new();
    let mut segments = Vec::new();
    if start > end {
        return (days, segments);
    }

    let mut active = initial_active_type(nominal, start, last_on_call);
    let mut cursor = start;
    loop {
        let month_end = last_day_of_month(cursor);
        let segment_end = month_end.min(end);
        days.extend(iterate_days(cursor, segment_end).map(|d| (d, classify_on_call_day(active, d))));
        segments.push(ActiveSegment {
            start: cursor,
            end: segment_end,
            active,
        });

        if segment_end >= end {
            break;
        }
        let Some(next) = segment_end.succ_opt() else {
            break;
        };
        active = next_active_type(active, month_end);
        cursor = next;
    }

    (days, segments)
}
