use super::types::{DayMap, RestControl};
use crate::calendar::iterate_days;
use crate::model::{DayStatus, HolidaySet, Turn};
use chrono::{Datelike, NaiveDate, Weekday};

/// Jours travaillés consécutifs avant un repos.
pub const MAX_CONSECUTIVE_WORK_DAYS: u32 = 6;

/// Au-delà, le dimanche suivant est chômé d'office (1 dimanche sur 7 semaines).
pub const MAX_WEEKS_WITHOUT_REST_SUNDAY: u32 = 6;

/// État porté d'un jour à l'autre par l'escala 6x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTracker {
    consecutive_work_days: u32,
    control: RestControl,
}

impl RestTracker {
    /// Reprend l'état à partir du dernier dimanche chômé connu.
    pub fn new(start: NaiveDate, last_rest_sunday: Option<NaiveDate>) -> Self {
        let weeks = last_rest_sunday
            .map(|last| (start - last).num_days().div_euclid(7).max(0))
            .unwrap_or(0);
        Self {
            consecutive_work_days: 0,
            control: RestControl {
                last_rest_sunday,
                sundays_rested: 0,
                weeks_without_rest_sunday: u32::try_from(weeks).unwrap_or(u32::MAX),
            },
        }
    }

    pub fn consecutive_work_days(&self) -> u32 {
        self.consecutive_work_days
    }

    pub fn control(&self) -> RestControl {
        self.control
    }

    /// Classe `day` et fait avancer l'état.
    pub fn step(&mut self, day: NaiveDate, turn: Turn) -> DayStatus {
        let sunday = day.weekday() == Weekday::Sun;

        if sunday && self.control.weeks_without_rest_sunday >= MAX_WEEKS_WITHOUT_REST_SUNDAY {
            self.rest_on_sunday(day);
            return DayStatus::Rest;
        }

        if self.consecutive_work_days >= MAX_CONSECUTIVE_WORK_DAYS {
            if sunday {
                self.rest_on_sunday(day);
            } else {
                self.consecutive_work_days = 0;
            }
            return DayStatus::Rest;
        }

        self.consecutive_work_days += 1;
        if sunday {
            self.control.weeks_without_rest_sunday += 1;
        }
        DayStatus::Work(turn)
    }

    fn rest_on_sunday(&mut self, day: NaiveDate) {
        self.consecutive_work_days = 0;
        self.control.weeks_without_rest_sunday = 0;
        self.control.last_rest_sunday = Some(day);
        self.control.sundays_rested += 1;
    }
}

/// Escala 6x1 sur `[start, end]` ; les jours fériés n'interrompent pas le cycle.
pub fn classify_six_by_one(
    turn: Turn,
    start: NaiveDate,
    end: NaiveDate,
    _holidays: &HolidaySet,
    last_rest_sunday: Option<NaiveDate>,
) -> (DayMap, RestControl) {
    let mut tracker = RestTracker::new(start, last_rest_sunday);
    let days = iterate_days(start, end)
        .map(|day| (day, tracker.step(day, turn)))
        .collect();
    (days, tracker.control())
}
