use crate::calendar::{format_br, parse_flexible_date};
use crate::model::{Employee, Holiday, ScheduleEntry};
use crate::report::{OnCallRow, PivotTable, RestRow};
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Colonnes obligatoires du CSV de colaborateurs.
pub const EMPLOYEE_REQUIRED_COLUMNS: [&str; 4] = ["Name", "Role", "ShiftType", "Turn"];

/// Colonnes optionnelles (absentes = vides).
pub const EMPLOYEE_OPTIONAL_COLUMNS: [&str; 5] = [
    "SickLeaveDates",
    "VacationRange",
    "ManualOverrideDates",
    "LastOnCallDate",
    "LastRestSundayDate",
];

struct Columns {
    required: [usize; 4],
    optional: [Option<usize>; 5],
}

impl Columns {
    fn locate(headers: &StringRecord) -> anyhow::Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let mut required = [0usize; 4];
        for (slot, name) in required.iter_mut().zip(EMPLOYEE_REQUIRED_COLUMNS) {
            *slot = find(name).with_context(|| format!("missing column {name}"))?;
        }
        let mut optional = [None; 5];
        for (slot, name) in optional.iter_mut().zip(EMPLOYEE_OPTIONAL_COLUMNS) {
            *slot = find(name);
        }
        Ok(Self { required, optional })
    }
}

fn cell(rec: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| rec.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Import de colaborateurs depuis CSV (colonnes repérées par en-tête).
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let columns = Columns::locate(rdr.headers()?)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let [name, role, shift, turn] = columns.required.map(|i| cell(&rec, Some(i)));
        let Some(name) = name else {
            bail!("row {}: empty Name", line + 1);
        };
        let Some(shift) = shift else {
            bail!("row {}: empty ShiftType for {name}", line + 1);
        };
        let [sick, vacation, manual, last_on_call, last_rest] =
            columns.optional.map(|i| cell(&rec, i));
        out.push(Employee {
            name,
            role: role.unwrap_or_default(),
            shift_code: shift,
            turn: turn.unwrap_or_default(),
            sick_leave_dates: sick,
            vacation_range: vacation,
            manual_override_dates: manual,
            last_on_call_date: last_on_call,
            last_rest_sunday_date: last_rest,
        });
    }
    Ok(out)
}

/// Import de jours fériés : header `Date[,Description]`.
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Holiday>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let date_idx = find("Date").context("missing column Date")?;
    let desc_idx = find("Description");
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw = rec.get(date_idx).map(str::trim).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        let date = parse_flexible_date(raw).with_context(|| format!("invalid holiday date: {raw}"))?;
        out.push(Holiday {
            date,
            description: cell(&rec, desc_idx),
        });
    }
    Ok(out)
}

/// Écrit `bytes` via un fichier temporaire puis un rename atomique.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

fn csv_bytes<F>(fill: F) -> anyhow::Result<Vec<u8>>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> anyhow::Result<()>,
{
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    fill(&mut w)?;
    w.into_inner()
        .map_err(|e| anyhow!("flushing csv buffer: {}", e.error()))
}

/// CSV des entrées : header `name,role,shift_type,turn,date,status`.
pub fn entries_to_csv(entries: &[ScheduleEntry]) -> anyhow::Result<Vec<u8>> {
    csv_bytes(|w| {
        w.write_record(["name", "role", "shift_type", "turn", "date", "status"])?;
        for e in entries {
            let date = format_br(e.date);
            w.write_record([
                e.employee.as_str(),
                e.role.as_str(),
                e.shift_label.as_str(),
                e.turn.as_str(),
                date.as_str(),
                e.status.label(),
            ])?;
        }
        Ok(())
    })
}

pub fn export_entries_csv<P: AsRef<Path>>(path: P, entries: &[ScheduleEntry]) -> anyhow::Result<()> {
    write_atomic(path, &entries_to_csv(entries)?)
}

/// Export JSON des entrées (jolie mise en forme).
pub fn export_entries_json<P: AsRef<Path>>(path: P, entries: &[ScheduleEntry]) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(entries)?;
    write_atomic(path, &json)
}

/// CSV pivoté : `name,role,shift_type,turn,<DD/MM/YYYY>...`.
pub fn pivot_to_csv(table: &PivotTable) -> anyhow::Result<Vec<u8>> {
    csv_bytes(|w| {
        let mut header: Vec<String> = ["name", "role", "shift_type", "turn"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(table.dates.iter().map(|d| format_br(*d)));
        w.write_record(&header)?;
        for row in &table.rows {
            let mut record = vec![
                row.name.as_str(),
                row.role.as_str(),
                row.shift_label.as_str(),
                row.turn.as_str(),
            ];
            record.extend(row.cells.iter().map(|c| c.map(|s| s.label()).unwrap_or("")));
            w.write_record(&record)?;
        }
        Ok(())
    })
}

pub fn export_pivot_csv<P: AsRef<Path>>(path: P, table: &PivotTable) -> anyhow::Result<()> {
    write_atomic(path, &pivot_to_csv(table)?)
}

fn opt_date(d: Option<NaiveDate>) -> String {
    d.map(format_br).unwrap_or_default()
}

pub fn rest_report_to_csv(rows: &[RestRow]) -> anyhow::Result<Vec<u8>> {
    csv_bytes(|w| {
        w.write_record([
            "name",
            "role",
            "shift_type",
            "turn",
            "last_rest_sunday",
            "next_due_sunday",
            "sundays_rested",
            "weeks_without_rest_sunday",
            "status",
        ])?;
        for r in rows {
            let mut rested = itoa::Buffer::new();
            let mut weeks = itoa::Buffer::new();
            let last = opt_date(r.last_rest_sunday);
            let next = opt_date(r.next_due_sunday);
            w.write_record([
                r.name.as_str(),
                r.role.as_str(),
                r.shift_label.as_str(),
                r.turn.as_str(),
                last.as_str(),
                next.as_str(),
                rested.format(r.sundays_rested),
                weeks.format(r.weeks_without_rest_sunday),
                if r.attention { "ATTENTION" } else { "OK" },
            ])?;
        }
        Ok(())
    })
}

pub fn export_rest_report_csv<P: AsRef<Path>>(path: P, rows: &[RestRow]) -> anyhow::Result<()> {
    write_atomic(path, &rest_report_to_csv(rows)?)
}

pub fn on_call_report_to_csv(rows: &[OnCallRow]) -> anyhow::Result<Vec<u8>> {
    csv_bytes(|w| {
        w.write_record([
            "name",
            "role",
            "shift_type",
            "turn",
            "work_days",
            "rest_days",
            "total_days",
            "last_on_call_of_month",
        ])?;
        for r in rows {
            let mut work = itoa::Buffer::new();
            let mut rest = itoa::Buffer::new();
            let mut total = itoa::Buffer::new();
            let last = opt_date(r.last_on_call_of_month);
            w.write_record([
                r.name.as_str(),
                r.role.as_str(),
                r.shift_label.as_str(),
                r.turn.as_str(),
                work.format(r.work_days),
                rest.format(r.rest_days),
                total.format(r.total_days),
                last.as_str(),
            ])?;
        }
        Ok(())
    })
}

pub fn export_on_call_report_csv<P: AsRef<Path>>(path: P, rows: &[OnCallRow]) -> anyhow::Result<()> {
    write_atomic(path, &on_call_report_to_csv(rows)?)
}

/// Gabarit de CSV de colaborateurs, une ligne d'exemple par famille d'escala.
pub fn write_employee_template<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let samples = [
        ["João Silva", "Analista", "M44", "Manhã", "", "", "", "", ""],
        ["Maria Santos", "Técnico", "T44", "Tarde", "15/06/2025", "", "", "", ""],
        ["Pedro Oliveira", "Auxiliar", "N6X1", "Noite", "", "10/06/2025-20/06/2025", "", "", "25/05/2025"],
        ["Ana Costa", "Supervisor", "P_D", "Dia", "", "", "", "30/05/2025", ""],
        ["Carlos Lima", "Operador", "I_N", "Noite", "20/06/2025", "", "", "29/05/2025", ""],
    ];
    let bytes = csv_bytes(|w| {
        let header: Vec<&str> = EMPLOYEE_REQUIRED_COLUMNS
            .iter()
            .chain(EMPLOYEE_OPTIONAL_COLUMNS.iter())
            .copied()
            .collect();
        w.write_record(&header)?;
        for row in &samples {
            w.write_record(row)?;
        }
        Ok(())
    })?;
    write_atomic(path, &bytes)
}
