#![forbid(unsafe_code)]
//! Escala : moteur de règles pour escalas de travail (sans base de données).
//!
//! - Escalas fixes 44h/40h, 6x1 avec repos dominical obligatoire, plantões pair/impair.
//! - Alternance de parité des plantões aux fins de mois de 31 jours.
//! - Exceptions individuelles (atestados, férias, escalas manuais).
//! - Rapports de contrôle 6x1 / plantões et vue pivotée.
//! - Fonctions pures : aucun état global, un run = une requête explicite.

// Les événements `tracing` disparaissent sans la feature `logging`.
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        {
            tracing::warn!($($arg)*);
        }
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        {
            tracing::info!($($arg)*);
        }
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        {
            tracing::debug!($($arg)*);
        }
    }};
}

pub mod calendar;
#[cfg(feature = "serde")]
pub mod config;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;

pub use calendar::{
    days_in_month, iterate_days, last_day_of_month, parse_flexible_date, DateSpan, DateWindow,
};
#[cfg(feature = "serde")]
pub use config::RunConfig;
pub use model::{DayStatus, Employee, Holiday, HolidaySet, ScheduleEntry, ShiftType, Turn};
pub use report::{on_call_report, pivot, rotating_rest_report, OnCallRow, PivotTable, RestRow};
pub use scheduler::{generate, ParseWarning, SchedError, Schedule, Scheduler};
