#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use escala::{
    calendar::{format_br, parse_flexible_date, DateWindow},
    config::RunConfig,
    io,
    model::{Employee, HolidaySet},
    report::{self, Severity},
    scheduler::{Schedule, Scheduler},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération d'escalas (44h/40h, 6x1, plantões)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Entrées communes : soit `--config`, soit les fichiers et la période.
#[derive(Args, Debug)]
struct Inputs {
    /// Requête JSON (remplace les options ci-dessous)
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV de colaborateurs
    #[arg(long)]
    employees: Option<PathBuf>,
    /// CSV de jours fériés
    #[arg(long)]
    holidays: Option<PathBuf>,
    /// Début de période (DD/MM/YYYY, DD-MM-YYYY ou YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// Fin de période (incluse)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer l'escala complète
    Generate {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        out_csv: Option<PathBuf>,
        #[arg(long)]
        out_json: Option<PathBuf>,
        #[arg(long)]
        pivot_csv: Option<PathBuf>,
    },

    /// Rapport de contrôle du repos dominical (6x1)
    RestReport {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Rapport de contrôle des plantões
    OnCallReport {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Répartition des statuts et vérifications de conformité
    Summary {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Écrire un CSV de colaborateurs d'exemple
    Template {
        #[arg(long)]
        out: PathBuf,
    },
}

struct Run {
    employees: Vec<Employee>,
    scheduler: Scheduler,
}

impl Inputs {
    fn load(self) -> Result<Run> {
        let (employees_path, holidays_path, window) = match self.config {
            Some(path) => {
                let config = RunConfig::load(&path)?;
                let window = config.window()?;
                (config.employees, config.holidays, window)
            }
            None => {
                let employees = self.employees.context("--employees is required without --config")?;
                let start = self.start.context("--start is required without --config")?;
                let end = self.end.context("--end is required without --config")?;
                let start = parse_flexible_date(&start).with_context(|| format!("invalid --start: {start}"))?;
                let end = parse_flexible_date(&end).with_context(|| format!("invalid --end: {end}"))?;
                (employees, self.holidays, DateWindow::new(start, end))
            }
        };
        let employees = io::import_employees_csv(&employees_path)
            .with_context(|| format!("importing {}", employees_path.display()))?;
        let holidays: HolidaySet = match holidays_path {
            Some(path) => io::import_holidays_csv(&path)
                .with_context(|| format!("importing {}", path.display()))?
                .iter()
                .collect(),
            None => HolidaySet::new(),
        };
        Ok(Run {
            employees,
            scheduler: Scheduler::checked(window.start, window.end, holidays)?,
        })
    }
}

impl Run {
    fn generate(&self) -> Schedule {
        self.scheduler.generate(&self.employees)
    }
}

/// Affiche avertissements et rejets ; 2 si le run n'est pas propre.
fn report_issues(schedule: &Schedule) -> i32 {
    for w in &schedule.warnings {
        eprintln!("warning: {w}");
    }
    for r in &schedule.rejections {
        eprintln!("rejected: {}: {}", r.employee, r.error);
    }
    if schedule.is_clean() {
        0
    } else {
        // Code 2 = WARNING/INCOMPLETE
        2
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            inputs,
            out_csv,
            out_json,
            pivot_csv,
        } => {
            let run = inputs.load()?;
            let schedule = run.generate();
            let entries = schedule.entries();
            if let Some(path) = out_csv {
                io::export_entries_csv(path, &entries)?;
            }
            if let Some(path) = out_json {
                io::export_entries_json(path, &entries)?;
            }
            if let Some(path) = pivot_csv {
                io::export_pivot_csv(path, &report::pivot(&entries))?;
            }
            // impression compacte : une ligne par colaborateur
            for timeline in &schedule.employees {
                let work = timeline.days.iter().filter(|d| d.status.is_work()).count();
                println!(
                    "{} | {} | {} day(s), {} worked",
                    timeline.name,
                    timeline.shift_label,
                    timeline.days.len(),
                    work
                );
            }
            report_issues(&schedule)
        }
        Commands::RestReport { inputs, out } => {
            let schedule = inputs.load()?.generate();
            let rows = report::rotating_rest_report(&schedule.entries());
            if let Some(path) = out {
                io::export_rest_report_csv(path, &rows)?;
            }
            for r in &rows {
                println!(
                    "{} | last {} | next {} | {} Sunday(s) off | {} week(s) without | {}",
                    r.name,
                    r.last_rest_sunday.map(format_br).unwrap_or_else(|| "-".into()),
                    r.next_due_sunday.map(format_br).unwrap_or_else(|| "-".into()),
                    r.sundays_rested,
                    r.weeks_without_rest_sunday,
                    if r.attention { "ATTENTION" } else { "OK" }
                );
            }
            report_issues(&schedule)
        }
        Commands::OnCallReport { inputs, out } => {
            let schedule = inputs.load()?.generate();
            let rows = report::on_call_report(&schedule.entries());
            if let Some(path) = out {
                io::export_on_call_report_csv(path, &rows)?;
            }
            for r in &rows {
                println!(
                    "{} | {} | {} worked, {} off of {} | last on-call {}",
                    r.name,
                    r.shift_label,
                    r.work_days,
                    r.rest_days,
                    r.total_days,
                    r.last_on_call_of_month.map(format_br).unwrap_or_else(|| "-".into())
                );
            }
            report_issues(&schedule)
        }
        Commands::Summary { inputs } => {
            let schedule = inputs.load()?.generate();
            let entries = schedule.entries();
            for s in report::status_summary(&entries) {
                let parts: Vec<String> = s
                    .counts
                    .iter()
                    .map(|(label, n)| format!("{label}={n} ({:.1}%)", s.percent(label)))
                    .collect();
                println!("{} | {} day(s) | {}", s.name, s.total_days, parts.join(", "));
            }
            let findings = report::compliance_findings(&entries);
            for f in &findings {
                let tag = match f.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                eprintln!("{tag}: {}: {}", f.employee, f.message);
            }
            let code = report_issues(&schedule);
            if findings.iter().any(|f| f.severity == Severity::Error) {
                2
            } else {
                code
            }
        }
        Commands::Template { out } => {
            io::write_employee_template(&out)?;
            println!("Template written to {}", out.display());
            0
        }
    };

    std::process::exit(code);
}
