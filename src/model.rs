use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::scheduler::{RestControl, SchedError};

/// Turno de travail associé à un type d'escala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Turn {
    Morning,
    Afternoon,
    Night,
    Day,
}

impl Turn {
    pub fn as_str(self) -> &'static str {
        match self {
            Turn::Morning => "morning",
            Turn::Afternoon => "afternoon",
            Turn::Night => "night",
            Turn::Day => "day",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parité du jour du mois (plantões).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of_day(day: u32) -> Self {
        if day % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

/// Famille de règles appliquée par le moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftFamily {
    /// Lundi-vendredi, week-end et jours fériés chômés.
    Fixed,
    /// 6 jours travaillés, 1 de repos, dimanche obligatoire toutes les 7 semaines.
    Rotating,
    /// Plantão 24h sur les jours pairs ou impairs.
    OnCall,
}

/// Catalogue fermé des codes d'escala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShiftType {
    #[cfg_attr(feature = "serde", serde(rename = "M44"))]
    M44,
    #[cfg_attr(feature = "serde", serde(rename = "T44"))]
    T44,
    #[cfg_attr(feature = "serde", serde(rename = "N44"))]
    N44,
    #[cfg_attr(feature = "serde", serde(rename = "M40"))]
    M40,
    #[cfg_attr(feature = "serde", serde(rename = "T40"))]
    T40,
    #[cfg_attr(feature = "serde", serde(rename = "N40"))]
    N40,
    #[cfg_attr(feature = "serde", serde(rename = "M6X1"))]
    M6x1,
    #[cfg_attr(feature = "serde", serde(rename = "T6X1"))]
    T6x1,
    #[cfg_attr(feature = "serde", serde(rename = "N6X1"))]
    N6x1,
    #[cfg_attr(feature = "serde", serde(rename = "P_D"))]
    EvenDay,
    #[cfg_attr(feature = "serde", serde(rename = "P_N"))]
    EvenNight,
    #[cfg_attr(feature = "serde", serde(rename = "I_D"))]
    OddDay,
    #[cfg_attr(feature = "serde", serde(rename = "I_N"))]
    OddNight,
}

impl ShiftType {
    pub const ALL: [ShiftType; 13] = [
        ShiftType::M44,
        ShiftType::T44,
        ShiftType::N44,
        ShiftType::M40,
        ShiftType::T40,
        ShiftType::N40,
        ShiftType::M6x1,
        ShiftType::T6x1,
        ShiftType::N6x1,
        ShiftType::EvenDay,
        ShiftType::EvenNight,
        ShiftType::OddDay,
        ShiftType::OddNight,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ShiftType::M44 => "M44",
            ShiftType::T44 => "T44",
            ShiftType::N44 => "N44",
            ShiftType::M40 => "M40",
            ShiftType::T40 => "T40",
            ShiftType::N40 => "N40",
            ShiftType::M6x1 => "M6X1",
            ShiftType::T6x1 => "T6X1",
            ShiftType::N6x1 => "N6X1",
            ShiftType::EvenDay => "P_D",
            ShiftType::EvenNight => "P_N",
            ShiftType::OddDay => "I_D",
            ShiftType::OddNight => "I_N",
        }
    }

    pub fn family(self) -> ShiftFamily {
        match self {
            ShiftType::M44
            | ShiftType::T44
            | ShiftType::N44
            | ShiftType::M40
            | ShiftType::T40
            | ShiftType::N40 => ShiftFamily::Fixed,
            ShiftType::M6x1 | ShiftType::T6x1 | ShiftType::N6x1 => ShiftFamily::Rotating,
            ShiftType::EvenDay | ShiftType::EvenNight | ShiftType::OddDay | ShiftType::OddNight => {
                ShiftFamily::OnCall
            }
        }
    }

    /// Turno travaillé les jours de travail.
    pub fn turn(self) -> Turn {
        match self {
            ShiftType::M44 | ShiftType::M40 | ShiftType::M6x1 => Turn::Morning,
            ShiftType::T44 | ShiftType::T40 | ShiftType::T6x1 => Turn::Afternoon,
            ShiftType::N44
            | ShiftType::N40
            | ShiftType::N6x1
            | ShiftType::EvenNight
            | ShiftType::OddNight => Turn::Night,
            ShiftType::EvenDay | ShiftType::OddDay => Turn::Day,
        }
    }

    /// Parité des plantões ; `None` pour les autres familles.
    pub fn parity(self) -> Option<Parity> {
        match self {
            ShiftType::EvenDay | ShiftType::EvenNight => Some(Parity::Even),
            ShiftType::OddDay | ShiftType::OddNight => Some(Parity::Odd),
            _ => None,
        }
    }

    /// Inverse la parité (P ↔ I) en gardant le turno. Sans effet hors plantão.
    pub fn flip_parity(self) -> Self {
        match self {
            ShiftType::EvenDay => ShiftType::OddDay,
            ShiftType::OddDay => ShiftType::EvenDay,
            ShiftType::EvenNight => ShiftType::OddNight,
            ShiftType::OddNight => ShiftType::EvenNight,
            other => other,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ShiftType {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ShiftType::ALL
            .iter()
            .copied()
            .find(|t| t.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| SchedError::UnknownShiftType(code.to_string()))
    }
}

/// Statut d'un jour pour un colaborateur. Exactement un par (colaborateur, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "turn", rename_all = "snake_case"))]
pub enum DayStatus {
    Work(Turn),
    Rest,
    Holiday,
    ManualOverride,
    SickLeave,
    Vacation,
}

impl DayStatus {
    pub fn is_work(self) -> bool {
        matches!(self, DayStatus::Work(_))
    }

    pub fn label(self) -> &'static str {
        match self {
            DayStatus::Work(Turn::Morning) => "WORK_MORNING",
            DayStatus::Work(Turn::Afternoon) => "WORK_AFTERNOON",
            DayStatus::Work(Turn::Night) => "WORK_NIGHT",
            DayStatus::Work(Turn::Day) => "WORK_DAY",
            DayStatus::Rest => "REST",
            DayStatus::Holiday => "HOLIDAY",
            DayStatus::ManualOverride => "MANUAL_OVERRIDE",
            DayStatus::SickLeave => "SICK_LEAVE",
            DayStatus::Vacation => "VACATION",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colaborateur tel que reçu en entrée (tableur ou formulaire).
///
/// Les champs de date optionnels restent bruts : le moteur les parse et
/// remonte un avertissement plutôt qu'une erreur quand ils sont illisibles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Employee {
    pub name: String,
    pub role: String,
    pub shift_code: String,
    pub turn: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sick_leave_dates: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vacation_range: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub manual_override_dates: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_on_call_date: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_rest_sunday_date: Option<String>,
}

impl Employee {
    pub fn new<N, R, C, T>(name: N, role: R, shift_code: C, turn: T) -> Self
    where
        N: Into<String>,
        R: Into<String>,
        C: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            role: role.into(),
            shift_code: shift_code.into(),
            turn: turn.into(),
            ..Self::default()
        }
    }

    pub fn with_sick_leave<S: Into<String>>(mut self, dates: S) -> Self {
        self.sick_leave_dates = Some(dates.into());
        self
    }

    pub fn with_vacation<S: Into<String>>(mut self, range: S) -> Self {
        self.vacation_range = Some(range.into());
        self
    }

    pub fn with_manual_overrides<S: Into<String>>(mut self, dates: S) -> Self {
        self.manual_override_dates = Some(dates.into());
        self
    }

    pub fn with_last_on_call<S: Into<String>>(mut self, date: S) -> Self {
        self.last_on_call_date = Some(date.into());
        self
    }

    pub fn with_last_rest_sunday<S: Into<String>>(mut self, date: S) -> Self {
        self.last_rest_sunday_date = Some(date.into());
        self
    }
}

/// Jour férié (la description n'a aucun effet sur le calcul).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Holiday {
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl Holiday {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            description: None,
        }
    }
}

/// Ensemble de jours fériés partagé en lecture seule par tout un run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet(BTreeSet<NaiveDate>);

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.0.contains(&d)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a Holiday> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = &'a Holiday>>(iter: I) -> Self {
        Self(iter.into_iter().map(|h| h.date).collect())
    }
}

/// Ligne du dataset unifié : un statut pour un colaborateur à une date.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    pub employee: String,
    pub role: String,
    /// Types en vigueur sur la fenêtre, joints par ` - ` (p. ex. `P_D - I_D`).
    pub shift_label: String,
    pub turn: String,
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Type effectivement appliqué ce jour-là.
    pub active_type: ShiftType,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rest_control: Option<RestControl>,
}
