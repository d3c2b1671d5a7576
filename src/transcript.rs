//! Recorded chat transcript.
//!
//! When recording is on, every accepted line is appended to a plain text file
//! as `[hh:mm:ss]name: message`.

use crate::Result;
use chrono::{Local, NaiveTime};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default transcript location, one file per day.
pub fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("courtroom-sim")
        .join("logs")
        .join(format!("{}.log", Local::now().format("%Y-%m-%d")))
}

pub fn format_line(time: NaiveTime, name: &str, message: &str) -> String {
    format!("[{}]{}: {}", time.format("%H:%M:%S"), name, message)
}

#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line stamped with the local time.
    pub fn record(&self, name: &str, message: &str) -> Result<()> {
        self.record_at(Local::now().time(), name, message)
    }

    pub fn record_at(&self, time: NaiveTime, name: &str, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(time, name, message))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lines_are_appended() {
        let dir = tempdir().unwrap();
        let transcript = Transcript::new(dir.path().join("logs").join("today.log"));
        let t = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        transcript.record_at(t, "Phoenix", "Objection!").unwrap();
        transcript.record_at(t, "(OOC)CLIENT", "ding").unwrap();

        let text = std::fs::read_to_string(transcript.path()).unwrap();
        assert_eq!(text, "[09:05:07]Phoenix: Objection!\n[09:05:07](OOC)CLIENT: ding\n");
    }
}
