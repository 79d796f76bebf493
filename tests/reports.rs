#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::calendar::DateWindow;
use escala::io::{on_call_report_to_csv, rest_report_to_csv};
use escala::model::{DayStatus, Employee, ScheduleEntry, ShiftType, Turn};
use escala::report::{
    compliance_findings, filter_entries, last_on_call_of_month, on_call_report, pivot,
    rotating_rest_report, status_summary, EntryFilter, Severity,
};
use escala::scheduler::generate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn june_entries() -> Vec<ScheduleEntry> {
    let employees = vec![
        Employee::new("João Silva", "Analista", "M44", "Manhã"),
        Employee::new("Pedro Oliveira", "Auxiliar", "N6X1", "Noite").with_last_rest_sunday("25/05/2025"),
        Employee::new("Ana Costa", "Supervisor", "P_D", "Dia").with_last_on_call("30/06/2025"),
    ];
    generate(&employees, d(2025, 6, 1), d(2025, 6, 30), &[]).entries()
}

#[test]
fn rest_report_flags_overdue_sunday() {
    let rows = rotating_rest_report(&june_entries());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name, "Pedro Oliveira");
    assert_eq!(row.last_rest_sunday, Some(d(2025, 5, 25)));
    assert_eq!(row.next_due_sunday, Some(d(2025, 7, 13)));
    assert_eq!(row.weeks_without_rest_sunday, 6);
    assert!(row.attention);

    let csv = String::from_utf8(rest_report_to_csv(&rows).unwrap()).unwrap();
    let line = csv.lines().nth(1).unwrap();
    insta::assert_snapshot!(line, @"Pedro Oliveira,Auxiliar,N6X1,Noite,25/05/2025,13/07/2025,0,6,ATTENTION");
}

#[test]
fn on_call_report_counts_days() {
    // dernier plantão le 30/06 : juin (30 jours) ne fait pas alterner
    let employees = vec![Employee::new("Ana Costa", "Supervisor", "P_D", "Dia").with_last_on_call("30/06/2025")];
    let entries = generate(&employees, d(2025, 7, 1), d(2025, 7, 31), &[]).entries();
    let rows = on_call_report(&entries);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!((row.work_days, row.rest_days, row.total_days), (15, 16, 31));
    assert_eq!(row.last_on_call_of_month, Some(d(2025, 7, 30)));

    let csv = String::from_utf8(on_call_report_to_csv(&rows).unwrap()).unwrap();
    assert_eq!(
        csv.lines().next().unwrap(),
        "name,role,shift_type,turn,work_days,rest_days,total_days,last_on_call_of_month"
    );
}

#[test]
fn last_on_call_follows_parity() {
    assert_eq!(last_on_call_of_month(ShiftType::OddNight, d(2025, 6, 3)), Some(d(2025, 6, 29)));
    assert_eq!(last_on_call_of_month(ShiftType::OddDay, d(2025, 7, 3)), Some(d(2025, 7, 31)));
    assert_eq!(last_on_call_of_month(ShiftType::EvenDay, d(2024, 2, 3)), Some(d(2024, 2, 28)));
    assert_eq!(last_on_call_of_month(ShiftType::M44, d(2025, 7, 3)), None);
}

#[test]
fn pivot_has_one_row_per_employee() {
    let table = pivot(&june_entries());
    assert_eq!(table.dates.len(), 30);
    let names: Vec<_> = table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["João Silva", "Pedro Oliveira", "Ana Costa"]);
    assert!(table.rows.iter().all(|r| r.cells.iter().all(Option::is_some)));
    assert_eq!(table.rows[0].cells[1], Some(DayStatus::Work(Turn::Morning)));
}

#[test]
fn status_summary_percentages() {
    let summaries = status_summary(&june_entries());
    let joao = &summaries[0];
    assert_eq!(joao.total_days, 30);
    assert_eq!(joao.counts["WORK_MORNING"], 21);
    assert_eq!(joao.counts["REST"], 9);
    assert_eq!(joao.percent("WORK_MORNING"), 70.0);
    assert_eq!(joao.percent("VACATION"), 0.0);
}

#[test]
fn filters_combine() {
    let entries = june_entries();
    let rest = filter_entries(
        &entries,
        &EntryFilter {
            name_contains: Some("joão".into()),
            status: Some(DayStatus::Rest),
            ..EntryFilter::default()
        },
    );
    assert_eq!(rest.len(), 9);

    let first_week = filter_entries(
        &entries,
        &EntryFilter {
            window: Some(DateWindow::new(d(2025, 6, 1), d(2025, 6, 7))),
            shift_label: Some("P_D".into()),
            ..EntryFilter::default()
        },
    );
    assert_eq!(first_week.len(), 7);
    assert_eq!(filter_entries(&entries, &EntryFilter::default()).len(), entries.len());
}

#[test]
fn compliance_checks() {
    let mut entries = june_entries();
    // 6x1 : dimanches 1, 8, 15, 22 et 29 travaillés
    let findings = compliance_findings(&entries);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].employee, "Pedro Oliveira");
    assert_eq!(findings[0].severity, Severity::Warning);

    let saturday = entries
        .iter_mut()
        .find(|e| e.employee == "João Silva" && e.date == d(2025, 6, 7))
        .unwrap();
    saturday.status = DayStatus::Work(Turn::Morning);
    let findings = compliance_findings(&entries);
    let error = findings.iter().find(|f| f.severity == Severity::Error).unwrap();
    assert_eq!(error.employee, "João Silva");
    assert_eq!(error.message, "M44 cannot work on 07/06/2025 (weekend)");
}
