use super::types::{DateField, DayMap, ParseWarning};
use crate::calendar::{parse_date_list, parse_date_span, DateParseError, DateSpan};
use crate::model::{DayStatus, Employee};
use chrono::NaiveDate;

/// Exceptions individuelles déjà parsées.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    pub sick_leave: Vec<NaiveDate>,
    pub vacation: Option<DateSpan>,
    pub manual: Vec<NaiveDate>,
}

impl ExceptionSet {
    /// Parse les champs d'exception d'un colaborateur.
    ///
    /// Dans les listes, une date illisible est ignorée sans bruit ; une
    /// période de congés illisible produit un avertissement.
    pub fn from_employee(employee: &Employee) -> (Self, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let sick_leave = employee
            .sick_leave_dates
            .as_deref()
            .map(parse_date_list)
            .unwrap_or_default();
        let manual = employee
            .manual_override_dates
            .as_deref()
            .map(parse_date_list)
            .unwrap_or_default();
        let vacation = match employee.vacation_range.as_deref().map(parse_date_span) {
            Some(Ok(span)) => Some(span),
            Some(Err(DateParseError::Empty)) | None => None,
            Some(Err(_)) => {
                warnings.push(ParseWarning {
                    employee: employee.name.clone(),
                    field: DateField::Vacation,
                    value: employee.vacation_range.clone().unwrap_or_default(),
                });
                None
            }
        };
        (
            Self {
                sick_leave,
                vacation,
                manual,
            },
            warnings,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.sick_leave.is_empty() && self.vacation.is_none() && self.manual.is_empty()
    }
}

/// Applique atestados, puis férias, puis escalas manuais (le dernier gagne).
///
/// Seules les dates déjà présentes dans `days` sont touchées.
pub fn apply_exceptions(mut days: DayMap, exceptions: &ExceptionSet) -> DayMap {
    let vacation_days = exceptions.vacation.iter().flat_map(DateSpan::days);
    let overlays = exceptions
        .sick_leave
        .iter()
        .map(|d| (*d, DayStatus::SickLeave))
        .chain(vacation_days.map(|d| (d, DayStatus::Vacation)))
        .chain(exceptions.manual.iter().map(|d| (*d, DayStatus::ManualOverride)));

    for (day, status) in overlays {
        if let Some(slot) = days.get_mut(&day) {
            *slot = status;
        }
    }
    days
}
