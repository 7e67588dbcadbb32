use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_DIR: &str = "network-monitor-log";
pub const LOG_FILE: &str = "log.txt";

/// Append-only transition log. Each write opens the file, appends a single
/// newline-terminated line and closes it again, so nothing is ever buffered
/// across cycles.
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Creates the log directory if missing and truncates any log file left
    /// over from a previous run.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let path = dir.join(LOG_FILE);
        File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write to log file {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Local timestamp prefix shared by every log line.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
