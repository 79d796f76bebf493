use crate::calendar::DateWindow;
use crate::model::{DayStatus, ScheduleEntry, ShiftType};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Classification brute produite par un moteur : une entrée par date.
pub type DayMap = BTreeMap<NaiveDate, DayStatus>;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("unknown shift type code: {0}")]
    UnknownShiftType(String),
    #[error("duplicate employee name: {0}")]
    DuplicateEmployee(String),
    #[error("invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Champ de date optionnel d'un colaborateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DateField {
    SickLeave,
    Vacation,
    ManualOverride,
    LastOnCall,
    LastRestSunday,
}

impl DateField {
    pub fn as_str(self) -> &'static str {
        match self {
            DateField::SickLeave => "SickLeaveDates",
            DateField::Vacation => "VacationRange",
            DateField::ManualOverride => "ManualOverrideDates",
            DateField::LastOnCall => "LastOnCallDate",
            DateField::LastRestSunday => "LastRestSundayDate",
        }
    }
}

/// Champ illisible, traité comme absent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseWarning {
    pub employee: String,
    pub field: DateField,
    pub value: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: could not parse {} value '{}', field ignored",
            self.employee,
            self.field.as_str(),
            self.value
        )
    }
}

/// Suivi du repos dominical (escalas 6x1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestControl {
    pub last_rest_sunday: Option<NaiveDate>,
    pub sundays_rested: u32,
    pub weeks_without_rest_sunday: u32,
}

/// Segment mensuel d'un plantão avec le type actif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveSegment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub active: ShiftType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControlInfo {
    #[default]
    None,
    Rotating(RestControl),
    OnCall(Vec<ActiveSegment>),
}

impl ControlInfo {
    pub fn rest_control(&self) -> Option<RestControl> {
        match self {
            ControlInfo::Rotating(rc) => Some(*rc),
            _ => None,
        }
    }

    /// Types de plantão en vigueur, dans l'ordre, sans doublons.
    pub fn active_types(&self) -> Vec<ShiftType> {
        let mut out = Vec::new();
        if let ControlInfo::OnCall(segments) = self {
            for seg in segments {
                if !out.contains(&seg.active) {
                    out.push(seg.active);
                }
            }
        }
        out
    }
}

/// Jour planifié avec le type effectivement appliqué.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub active: ShiftType,
}

/// Timeline complète d'un colaborateur sur la fenêtre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSchedule {
    pub name: String,
    pub role: String,
    pub turn: String,
    pub nominal: ShiftType,
    pub shift_label: String,
    pub days: Vec<DayPlan>,
    pub control: ControlInfo,
}

impl EmployeeSchedule {
    pub fn entries(&self) -> impl Iterator<Item = ScheduleEntry> + '_ {
        let rest_control = self.control.rest_control();
        self.days.iter().map(move |day| ScheduleEntry {
            employee: self.name.clone(),
            role: self.role.clone(),
            shift_label: self.shift_label.clone(),
            turn: self.turn.clone(),
            date: day.date,
            status: day.status,
            active_type: day.active,
            rest_control,
        })
    }
}

/// Colaborateur écarté du run, sans interrompre les autres.
#[derive(Debug)]
pub struct Rejection {
    pub employee: String,
    pub error: SchedError,
}

/// Résultat d'un run de génération.
#[derive(Debug, Default)]
pub struct Schedule {
    pub window: Option<DateWindow>,
    pub employees: Vec<EmployeeSchedule>,
    pub warnings: Vec<ParseWarning>,
    pub rejections: Vec<Rejection>,
}

impl Schedule {
    /// Dataset unifié, colaborateur par colaborateur puis date par date.
    pub fn entries(&self) -> Vec<ScheduleEntry> {
        self.employees.iter().flat_map(|e| e.entries()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.rejections.is_empty()
    }
}
