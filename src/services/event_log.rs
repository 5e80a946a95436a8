//! Append-only event log files (`errLog.log`, `reqLog.log`, ...).
//!
//! Each line is `<yyyyMMdd>\t<HH:mm:ss>\t<uuid>\t<message>`. These files are
//! kept next to the `tracing` output for operators who grep them directly.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

pub struct EventLog {
    dir: PathBuf,
}

impl EventLog {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    #[must_use]
    pub fn format_line(at: DateTime<Local>, id: Uuid, message: &str) -> String {
        format!("{}\t{id}\t{message}\n", at.format("%Y%m%d\t%H:%M:%S"))
    }

    /// Appends one line to `file_name`, creating the directory and the file
    /// as needed.
    pub async fn append(&self, file_name: &str, message: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create log dir: {}", self.dir.display()))?;

        let path = self.dir.join(file_name);
        let line = Self::format_line(Local::now(), Uuid::new_v4(), message);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write log file: {}", path.display()))?;

        Ok(())
    }

    /// Like [`append`](Self::append) but only reports failures through
    /// `tracing`; a broken log file must not fail the request.
    pub async fn record(&self, file_name: &str, message: &str) {
        if let Err(e) = self.append(file_name, message).await {
            warn!(error = %e, file = file_name, "Failed to write event log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            EventLog::format_line(at, id, "hello"),
            "20260304\t05:06:07\t00000000-0000-0000-0000-000000000000\thello\n"
        );
    }

    #[tokio::test]
    async fn test_append_creates_dir_and_appends() {
        let dir = std::env::temp_dir().join(format!("technotes-log-test-{}", Uuid::new_v4()));
        let log = EventLog::new(dir.join("nested"));

        log.append("errLog.log", "first").await.unwrap();
        log.record("errLog.log", "second").await;

        let content = tokio::fs::read_to_string(log.dir().join("errLog.log"))
            .await
            .unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\tfirst"));
        assert!(lines[1].ends_with("\tsecond"));
        assert_eq!(lines[0].split('\t').count(), 4);
    }
}
