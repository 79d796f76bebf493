mod exceptions;
mod fixed;
mod on_call;
mod rotating;
mod types;

pub use exceptions::{apply_exceptions, ExceptionSet};
pub use fixed::classify_fixed;
pub use on_call::{classify_on_call, classify_on_call_day, initial_active_type, next_active_type};
pub use rotating::{
    classify_six_by_one, RestTracker, MAX_CONSECUTIVE_WORK_DAYS, MAX_WEEKS_WITHOUT_REST_SUNDAY,
};
pub use types::{
    ActiveSegment, ControlInfo, DateField, DayMap, DayPlan, EmployeeSchedule, ParseWarning,
    Rejection, RestControl, SchedError, Schedule,
};

pub(crate) use fixed::is_weekend;

use crate::calendar::{parse_flexible_date, DateParseError, DateWindow};
use crate::model::{Employee, HolidaySet, ShiftFamily, ShiftType};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Séparateur entre types successifs d'un même colaborateur.
pub const SHIFT_LABEL_SEPARATOR: &str = " - ";

/// Scheduler : une fenêtre et ses jours fériés, partagés par tous les colaborateurs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    window: DateWindow,
    holidays: HolidaySet,
}

impl Scheduler {
    pub fn new(start: NaiveDate, end: NaiveDate, holidays: HolidaySet) -> Self {
        Self {
            window: DateWindow::new(start, end),
            holidays,
        }
    }

    /// Comme `new`, mais refuse une fenêtre inversée.
    pub fn checked(start: NaiveDate, end: NaiveDate, holidays: HolidaySet) -> Result<Self, SchedError> {
        if start > end {
            return Err(SchedError::InvalidWindow { start, end });
        }
        Ok(Self::new(start, end, holidays))
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Calcule la timeline d'un colaborateur.
    ///
    /// Seul un code d'escala inconnu est une erreur ; les dates illisibles
    /// reviennent comme avertissements.
    pub fn schedule_employee(
        &self,
        employee: &Employee,
    ) -> Result<(EmployeeSchedule, Vec<ParseWarning>), SchedError> {
        let nominal: ShiftType = employee.shift_code.parse()?;
        let DateWindow { start, end } = self.window;
        let mut warnings = Vec::new();

        let (base, control) = match nominal.family() {
            ShiftFamily::Fixed => (
                classify_fixed(nominal, start, end, &self.holidays),
                ControlInfo::None,
            ),
            ShiftFamily::Rotating => {
                let last_rest = optional_date(
                    employee,
                    DateField::LastRestSunday,
                    employee.last_rest_sunday_date.as_deref(),
                    &mut warnings,
                );
                let (days, rc) =
                    classify_six_by_one(nominal.turn(), start, end, &self.holidays, last_rest);
                (days, ControlInfo::Rotating(rc))
            }
            ShiftFamily::OnCall => {
                let last_on_call = optional_date(
                    employee,
                    DateField::LastOnCall,
                    employee.last_on_call_date.as_deref(),
                    &mut warnings,
                );
                let (days, segments) =
                    classify_on_call(nominal, start, end, &self.holidays, last_on_call);
                log_type_changes(&employee.name, nominal, &segments);
                (days, ControlInfo::OnCall(segments))
            }
        };

        let (exceptions, exception_warnings) = ExceptionSet::from_employee(employee);
        warnings.extend(exception_warnings);
        let days = apply_exceptions(base, &exceptions);

        let shift_label = shift_label(nominal, &control);
        let days = days
            .into_iter()
            .map(|(date, status)| DayPlan {
                date,
                status,
                active: active_type_on(nominal, &control, date),
            })
            .collect();

        log_warnings(&warnings);
        log_debug!(employee = %employee.name, shift = %shift_label, "employee scheduled");

        Ok((
            EmployeeSchedule {
                name: employee.name.clone(),
                role: employee.role.clone(),
                turn: employee.turn.clone(),
                nominal,
                shift_label,
                days,
                control,
            },
            warnings,
        ))
    }

    /// Génère les escalas de tous les colaborateurs.
    ///
    /// Un colaborateur en erreur est écarté (voir `Schedule::rejections`)
    /// sans interrompre le lot. Fenêtre vide ou liste vide : résultat vide.
    pub fn generate(&self, employees: &[Employee]) -> Schedule {
        let mut schedule = Schedule {
            window: Some(self.window),
            ..Schedule::default()
        };
        if self.window.is_empty() {
            return schedule;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for employee in employees {
            if !seen.insert(employee.name.as_str()) {
                reject(
                    &mut schedule,
                    employee,
                    SchedError::DuplicateEmployee(employee.name.clone()),
                );
                continue;
            }
            match self.schedule_employee(employee) {
                Ok((timeline, warnings)) => {
                    schedule.employees.push(timeline);
                    schedule.warnings.extend(warnings);
                }
                Err(error) => reject(&mut schedule, employee, error),
            }
        }
        schedule
    }
}

/// Point d'entrée : escalas de `employees` sur `[start, end]`.
pub fn generate(
    employees: &[Employee],
    start: NaiveDate,
    end: NaiveDate,
    holidays: &[NaiveDate],
) -> Schedule {
    Scheduler::new(start, end, holidays.iter().copied().collect()).generate(employees)
}

fn reject(schedule: &mut Schedule, employee: &Employee, error: SchedError) {
    log_warn!(employee = %employee.name, error = %error, "employee rejected");
    schedule.rejections.push(Rejection {
        employee: employee.name.clone(),
        error,
    });
}

fn optional_date(
    employee: &Employee,
    field: DateField,
    raw: Option<&str>,
    warnings: &mut Vec<ParseWarning>,
) -> Option<NaiveDate> {
    match parse_flexible_date(raw?) {
        Ok(d) => Some(d),
        Err(DateParseError::Empty) => None,
        Err(_) => {
            warnings.push(ParseWarning {
                employee: employee.name.clone(),
                field,
                value: raw.unwrap_or_default().trim().to_string(),
            });
            None
        }
    }
}

fn active_type_on(nominal: ShiftType, control: &ControlInfo, date: NaiveDate) -> ShiftType {
    match control {
        ControlInfo::OnCall(segments) => segments
            .iter()
            .find(|seg| seg.start <= date && date <= seg.end)
            .map(|seg| seg.active)
            .unwrap_or(nominal),
        _ => nominal,
    }
}

/// Libellé affiché : types successifs dédoublonnés, ou le type nominal.
fn shift_label(nominal: ShiftType, control: &ControlInfo) -> String {
    let types = control.active_types();
    if types.is_empty() {
        return nominal.code().to_string();
    }
    types
        .iter()
        .map(|t| t.code())
        .collect::<Vec<_>>()
        .join(SHIFT_LABEL_SEPARATOR)
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn log_warnings(warnings: &[ParseWarning]) {
    for w in warnings {
        log_warn!(employee = %w.employee, field = w.field.as_str(), value = %w.value, "date field ignored");
    }
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn log_type_changes(name: &str, nominal: ShiftType, segments: &[ActiveSegment]) {
    let mut previous = nominal;
    for seg in segments {
        if seg.active != previous {
            log_info!(employee = name, from = %previous, to = %seg.active, since = %seg.start, "on-call type alternated");
            previous = seg.active;
        }
    }
}
