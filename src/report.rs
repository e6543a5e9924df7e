use chrono::prelude::*;
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One finished run, ready to be appended to the practice log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub snippet_id: String,
    pub wpm: u32,
    pub accuracy: u8,
    pub elapsed: Duration,
}

fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "typedrill").map(|pd| pd.config_dir().join("log.csv"))
}

/// Append a completed run to the CSV practice log. The caller ignores the
/// result; a missing or unwritable log never interrupts a session.
pub fn append_run(record: &RunRecord) -> io::Result<()> {
    match default_log_path() {
        Some(path) => append_run_at(&path, record),
        None => Ok(()),
    }
}

pub fn append_run_at(path: &Path, record: &RunRecord) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = !path.exists();

    let mut log_file = OpenOptions::new().create(true).append(true).open(path)?;

    if needs_header {
        writeln!(log_file, "date,snippet,wpm,accuracy,elapsed_secs")?;
    }

    writeln!(
        log_file,
        "{},{},{},{},{:.1}",
        Local::now().format("%c"),
        record.snippet_id,
        record.wpm,
        record.accuracy,
        record.elapsed.as_secs_f64(),
    )
}
