//! Rapports dérivés du dataset unifié.
//!
//! Tous prennent les `ScheduleEntry` produites par `generate` et regroupent
//! par colaborateur dans l'ordre de première apparition.

use crate::calendar::{last_day_of_month, DateWindow};
use crate::model::{DayStatus, Parity, ScheduleEntry, ShiftFamily, ShiftType};
use crate::scheduler::{is_weekend, MAX_WEEKS_WITHOUT_REST_SUNDAY};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Écart nominal entre deux dimanches chômés.
pub const REST_SUNDAY_INTERVAL_WEEKS: i64 = 7;

/// Ligne du rapport de contrôle 6x1.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestRow {
    pub name: String,
    pub role: String,
    pub shift_label: String,
    pub turn: String,
    pub last_rest_sunday: Option<NaiveDate>,
    pub next_due_sunday: Option<NaiveDate>,
    pub sundays_rested: u32,
    pub weeks_without_rest_sunday: u32,
    pub attention: bool,
}

/// Ligne du rapport de contrôle des plantões.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OnCallRow {
    pub name: String,
    pub role: String,
    pub shift_label: String,
    pub turn: String,
    pub work_days: u32,
    pub rest_days: u32,
    pub total_days: u32,
    /// Dernier jour de plantão du mois final de la fenêtre.
    pub last_on_call_of_month: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PivotRow {
    pub name: String,
    pub role: String,
    pub shift_label: String,
    pub turn: String,
    pub cells: Vec<Option<DayStatus>>,
}

/// Une ligne par colaborateur, une colonne par date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<PivotRow>,
}

fn group_by_employee(entries: &[ScheduleEntry]) -> Vec<Vec<&ScheduleEntry>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        let key = entry.employee.as_str();
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(entry);
    }
    order
        .into_iter()
        .filter_map(|key| groups.remove(key))
        .collect()
}

fn family_of(group: &[&ScheduleEntry]) -> Option<ShiftFamily> {
    group.first().map(|e| e.active_type.family())
}

/// Rapport de contrôle du repos dominical pour les escalas 6x1.
pub fn rotating_rest_report(entries: &[ScheduleEntry]) -> Vec<RestRow> {
    group_by_employee(entries)
        .into_iter()
        .filter(|group| family_of(group) == Some(ShiftFamily::Rotating))
        .filter_map(|group| {
            let first = *group.first()?;
            let control = group.iter().find_map(|e| e.rest_control).unwrap_or_default();
            let last = control.last_rest_sunday;
            Some(RestRow {
                name: first.employee.clone(),
                role: first.role.clone(),
                shift_label: first.shift_label.clone(),
                turn: first.turn.clone(),
                last_rest_sunday: last,
                next_due_sunday: last
                    .and_then(|d| d.checked_add_signed(Duration::weeks(REST_SUNDAY_INTERVAL_WEEKS))),
                sundays_rested: control.sundays_rested,
                weeks_without_rest_sunday: control.weeks_without_rest_sunday,
                attention: control.weeks_without_rest_sunday >= MAX_WEEKS_WITHOUT_REST_SUNDAY,
            })
        })
        .collect()
}

/// Rapport de contrôle des plantões : jours travaillés/chômés et dernier plantão.
pub fn on_call_report(entries: &[ScheduleEntry]) -> Vec<OnCallRow> {
    group_by_employee(entries)
        .into_iter()
        .filter(|group| family_of(group) == Some(ShiftFamily::OnCall))
        .filter_map(|group| {
            let first = *group.first()?;
            let last = group.iter().max_by_key(|e| e.date)?;
            let work_days = group.iter().filter(|e| e.status.is_work()).count();
            let rest_days = group.iter().filter(|e| e.status == DayStatus::Rest).count();
            Some(OnCallRow {
                name: first.employee.clone(),
                role: first.role.clone(),
                shift_label: first.shift_label.clone(),
                turn: first.turn.clone(),
                work_days: count_u32(work_days),
                rest_days: count_u32(rest_days),
                total_days: count_u32(group.len()),
                last_on_call_of_month: last_on_call_of_month(last.active_type, last.date),
            })
        })
        .collect()
}

/// Dernier jour du mois de `within` dont la parité correspond à `active`.
pub fn last_on_call_of_month(active: ShiftType, within: NaiveDate) -> Option<NaiveDate> {
    let parity = active.parity()?;
    let mut day = last_day_of_month(within);
    while Parity::of_day(day.day()) != parity {
        day = day.pred_opt()?;
    }
    Some(day)
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Vue calendrier : une ligne par colaborateur, une cellule par date.
pub fn pivot(entries: &[ScheduleEntry]) -> PivotTable {
    let dates: Vec<NaiveDate> = entries
        .iter()
        .map(|e| e.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let rows = group_by_employee(entries)
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;
            let by_date: BTreeMap<NaiveDate, DayStatus> =
                group.iter().map(|e| (e.date, e.status)).collect();
            Some(PivotRow {
                name: first.employee.clone(),
                role: first.role.clone(),
                shift_label: first.shift_label.clone(),
                turn: first.turn.clone(),
                cells: dates.iter().map(|d| by_date.get(d).copied()).collect(),
            })
        })
        .collect();
    PivotTable { dates, rows }
}

/// Répartition des statuts d'un colaborateur.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusSummary {
    pub name: String,
    pub counts: BTreeMap<String, u32>,
    pub total_days: u32,
}

impl StatusSummary {
    /// Pourcentage du statut `label`, arrondi à une décimale.
    pub fn percent(&self, label: &str) -> f64 {
        if self.total_days == 0 {
            return 0.0;
        }
        let n = self.counts.get(label).copied().unwrap_or(0);
        (f64::from(n) * 1000.0 / f64::from(self.total_days)).round() / 10.0
    }
}

pub fn status_summary(entries: &[ScheduleEntry]) -> Vec<StatusSummary> {
    group_by_employee(entries)
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;
            let mut counts = BTreeMap::new();
            for e in &group {
                *counts.entry(e.status.label().to_string()).or_insert(0) += 1;
            }
            Some(StatusSummary {
                name: first.employee.clone(),
                counts,
                total_days: count_u32(group.len()),
            })
        })
        .collect()
}

/// Critères de filtrage ; un champ `None` ne filtre pas.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub name_contains: Option<String>,
    pub turn: Option<String>,
    pub shift_label: Option<String>,
    pub status: Option<DayStatus>,
    pub window: Option<DateWindow>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        let name_ok = self.name_contains.as_ref().map_or(true, |needle| {
            entry
                .employee
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        name_ok
            && self.turn.as_ref().map_or(true, |t| &entry.turn == t)
            && self
                .shift_label
                .as_ref()
                .map_or(true, |l| &entry.shift_label == l)
            && self.status.map_or(true, |s| entry.status == s)
            && self.window.map_or(true, |w| w.contains(entry.date))
    }
}

pub fn filter_entries(entries: &[ScheduleEntry], filter: &EntryFilter) -> Vec<ScheduleEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Finding {
    pub employee: String,
    pub severity: Severity,
    pub message: String,
}

/// Vérifications de conformité a posteriori.
///
/// - escala fixe travaillée un samedi ou un dimanche : erreur ;
/// - 6x1 avec plus de dimanches travaillés que chômés : avertissement.
pub fn compliance_findings(entries: &[ScheduleEntry]) -> Vec<Finding> {
    let mut out = Vec::new();
    for group in group_by_employee(entries) {
        let Some(first) = group.first() else {
            continue;
        };
        match family_of(&group) {
            Some(ShiftFamily::Fixed) => {
                for e in group.iter().filter(|e| e.status.is_work() && is_weekend(e.date)) {
                    out.push(Finding {
                        employee: e.employee.clone(),
                        severity: Severity::Error,
                        message: format!(
                            "{} cannot work on {} (weekend)",
                            e.active_type,
                            e.date.format("%d/%m/%Y")
                        ),
                    });
                }
            }
            Some(ShiftFamily::Rotating) => {
                let sundays = group.iter().filter(|e| e.date.weekday() == Weekday::Sun);
                let (worked, rested) = sundays.fold((0u32, 0u32), |(w, r), e| {
                    if e.status.is_work() {
                        (w + 1, r)
                    } else {
                        (w, r + 1)
                    }
                });
                if worked > rested {
                    out.push(Finding {
                        employee: first.employee.clone(),
                        severity: Severity::Warning,
                        message: format!("too many Sundays worked: {worked} worked, {rested} off"),
                    });
                }
            }
            _ => {}
        }
    }
    out
}
