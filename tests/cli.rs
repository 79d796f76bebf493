#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("escala-cli").unwrap()
}

#[test]
fn template_then_generate() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("colaboradores.csv");
    let out_csv = dir.path().join("escala.csv");

    cli()
        .args(["template", "--out"])
        .arg(&employees)
        .assert()
        .success()
        .stdout(predicate::str::contains("Template written"));

    cli()
        .args(["generate", "--start", "01/06/2025", "--end", "30/06/2025", "--employees"])
        .arg(&employees)
        .arg("--out-csv")
        .arg(&out_csv)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Ana Costa | I_D | 30 day(s)"));

    let csv = fs::read_to_string(&out_csv).unwrap();
    assert_eq!(csv.lines().count(), 1 + 5 * 30);
}

#[test]
fn rest_report_prints_attention() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("colaboradores.csv");
    cli().args(["template", "--out"]).arg(&employees).assert().success();

    cli()
        .args(["rest-report", "--start", "2025-06-01", "--end", "2025-06-30", "--employees"])
        .arg(&employees)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pedro Oliveira").and(predicate::str::contains("ATTENTION")));
}

#[test]
fn rejected_employee_exits_with_2() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("colaboradores.csv");
    fs::write(&employees, "Name,Role,ShiftType,Turn\nZé,Temp,X99,Manhã\nAna,Supervisor,M40,Manhã\n").unwrap();

    cli()
        .args(["generate", "--start", "01/06/2025", "--end", "07/06/2025", "--employees"])
        .arg(&employees)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Ana | M40"))
        .stderr(predicate::str::contains("unknown shift type code: X99"));
}

#[test]
fn config_file_drives_on_call_report() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("colaboradores.csv");
    fs::write(
        &employees,
        "Name,Role,ShiftType,Turn,LastOnCallDate\nAna Costa,Supervisor,P_D,Dia,30/06/2025\n",
    )
    .unwrap();
    let config = dir.path().join("run.json");
    fs::write(
        &config,
        format!(
            r#"{{"start":"01/07/2025","end":"31/07/2025","employees":{}}}"#,
            serde_json::to_string(&employees).unwrap()
        ),
    )
    .unwrap();
    let out = dir.path().join("plantoes.csv");

    cli()
        .args(["on-call-report", "--config"])
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("15 worked, 16 off of 31 | last on-call 30/07/2025"));
    assert!(fs::read_to_string(&out).unwrap().contains("Ana Costa,Supervisor,P_D,Dia,15,16,31,30/07/2025"));
}

#[test]
fn missing_inputs_fail() {
    cli()
        .args(["generate", "--start", "01/06/2025", "--end", "30/06/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--employees is required"));

    let dir = tempdir().unwrap();
    let employees = dir.path().join("colaboradores.csv");
    fs::write(&employees, "Name,Role,ShiftType,Turn\nAna,Supervisor,M40,Manhã\n").unwrap();
    cli()
        .args(["summary", "--start", "30/06/2025", "--end", "01/06/2025", "--employees"])
        .arg(&employees)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid window"));
}
