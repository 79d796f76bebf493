use crate::calendar::{parse_flexible_date, DateWindow};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Requête de génération persistée en JSON.
///
/// ```json
/// { "start": "01/06/2025", "end": "30/06/2025",
///   "employees": "colaboradores.csv", "holidays": "feriados.csv" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub start: String,
    pub end: String,
    pub employees: PathBuf,
    #[serde(default)]
    pub holidays: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: RunConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        crate::io::write_atomic(path, json.as_bytes())
    }

    pub fn validate(&self) -> Result<()> {
        if self.employees.as_os_str().is_empty() {
            bail!("employees path cannot be empty");
        }
        let window = self.window()?;
        if window.is_empty() {
            bail!("start date must not be after end date");
        }
        Ok(())
    }

    pub fn window(&self) -> Result<DateWindow> {
        let start = parse_flexible_date(&self.start)
            .with_context(|| format!("invalid start date: {}", self.start))?;
        let end = parse_flexible_date(&self.end)
            .with_context(|| format!("invalid end date: {}", self.end))?;
        Ok(DateWindow::new(start, end))
    }

    /// Chemin de sortie `name` dans `output_dir` (ou le répertoire courant).
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join(name)
    }
}
