use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::iter::FusedIterator;
use thiserror::Error;

/// Formats de date acceptés en entrée, dans l'ordre d'essai.
pub const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Variante horodatée produite par certains tableurs (`2025-05-25 00:00:00`).
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("empty date value")]
    Empty,
    #[error("unrecognized date: {0}")]
    Unrecognized(String),
    #[error("invalid date span: {0}")]
    InvalidSpan(String),
}

/// Dernier jour du mois de `d`.
pub fn last_day_of_month(d: NaiveDate) -> NaiveDate {
    let (year, month) = if d.month() == 12 {
        (d.year() + 1, 1)
    } else {
        (d.year(), d.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or_else(|| d.with_day(31).unwrap_or(d))
}

/// Nombre de jours du mois de `d` (28 à 31).
pub fn days_in_month(d: NaiveDate) -> u32 {
    last_day_of_month(d).day()
}

/// Dernier jour du mois précédant celui de `d`.
pub fn last_day_of_previous_month(d: NaiveDate) -> Option<NaiveDate> {
    d.with_day(1).and_then(|first| first.pred_opt())
}

/// Itère de `start` à `end` inclus ; vide si `start > end`.
pub fn iterate_days(start: NaiveDate, end: NaiveDate) -> DayIter {
    DayIter {
        next: (start <= end).then_some(start),
        end,
    }
}

/// Itérateur paresseux sur une plage de dates. `Clone` permet de le rejouer.
#[derive(Debug, Clone)]
pub struct DayIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .next
            .map(|d| (self.end - d).num_days() + 1)
            .unwrap_or(0);
        let n = usize::try_from(n).unwrap_or(0);
        (n, Some(n))
    }
}

impl ExactSizeIterator for DayIter {}
impl FusedIterator for DayIter {}

/// Fenêtre de génération [start, end], bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d <= self.end
    }

    pub fn days(&self) -> DayIter {
        iterate_days(self.start, self.end)
    }

    /// Nombre de jours couverts (0 si vide).
    pub fn len(&self) -> usize {
        self.days().len()
    }
}

/// Intervalle de dates inclusif, p. ex. une période de congés.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateParseError> {
        if end < start {
            return Err(DateParseError::InvalidSpan(format!("{start} > {end}")));
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> DayIter {
        iterate_days(self.start, self.end)
    }
}

/// Parse une date dans l'un des formats connus (`DD/MM/YYYY`, `DD-MM-YYYY`, `YYYY-MM-DD`).
pub fn parse_flexible_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DateParseError::Empty);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
        .ok_or_else(|| DateParseError::Unrecognized(raw.to_string()))
}

/// Parse une liste de dates séparées par des virgules.
///
/// Les éléments illisibles sont ignorés silencieusement.
pub fn parse_date_list(raw: &str) -> Vec<NaiveDate> {
    raw.split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .filter_map(|chunk| parse_flexible_date(chunk).ok())
        .collect()
}

/// Parse une période `début-fin` (ou `début..fin`).
///
/// Le tiret sert aussi de séparateur interne aux formats `DD-MM-YYYY` et ISO :
/// on essaie chaque tiret jusqu'à trouver une coupure où les deux moitiés
/// sont des dates valides.
pub fn parse_date_span(raw: &str) -> Result<DateSpan, DateParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DateParseError::Empty);
    }
    if let Some((start_raw, end_raw)) = raw.split_once("..") {
        let start = parse_flexible_date(start_raw)?;
        let end = parse_flexible_date(end_raw)?;
        return DateSpan::new(start, end);
    }
    let cut = raw
        .match_indices('-')
        .map(|(idx, _)| (&raw[..idx], &raw[idx + 1..]))
        .find_map(|(a, b)| {
            let start = parse_flexible_date(a).ok()?;
            let end = parse_flexible_date(b).ok()?;
            Some((start, end))
        });
    match cut {
        Some((start, end)) => DateSpan::new(start, end),
        None => Err(DateParseError::InvalidSpan(raw.to_string())),
    }
}

/// Format d'affichage `DD/MM/YYYY`.
pub fn format_br(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}
