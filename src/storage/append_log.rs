use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::Mutex;

/// Line-oriented append log. One logical record per newline-terminated
/// line; a record is written with a single `write_all` on an append-mode
/// handle, so it is either fully on disk or absent. The mutex serializes
/// writers for this file only; different files never contend.
pub struct AppendLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Appends one record. `record` must not contain newlines; callers
    /// normalize payloads before handing them over.
    pub async fn append(&self, record: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {} for append", self.path.display()))?;
        let line = format!("{record}\n");
        file.write_all(line.as_bytes())
            .with_context(|| format!("append to {}", self.path.display()))?;
        file.flush()?;
        Ok(())
    }

    /// Full linear scan. A missing file is an empty log; any other read
    /// failure degrades to empty with an operator-facing warning.
    pub fn read_all(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents.lines().map(str::to_owned).collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("failed to read {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, record: &str) -> bool {
        self.read_all().iter().any(|line| line == record)
    }

    pub fn count(&self) -> usize {
        self.read_all().len()
    }

    /// Removes the first line equal to `record`, keeping any duplicates.
    /// The remaining lines go through a temp file in the same directory
    /// and replace the original atomically. Returns whether a line was
    /// removed; absent records are a no-op.
    pub async fn remove_first(&self, record: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut lines = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents.lines().map(str::to_owned).collect::<Vec<_>>(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e).context(format!("read {}", self.path.display())),
        };
        let Some(pos) = lines.iter().position(|line| line == record) else {
            return Ok(false);
        };
        lines.remove(pos);

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        for line in &lines {
            writeln!(tmp, "{line}")?;
        }
        tmp.flush()?;
        tmp.persist(&self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(true)
    }

    /// Drops every record by deleting the file. Missing file is a no-op.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context(format!("remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> (tempfile::TempDir, AppendLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join(name));
        (dir, log)
    }

    #[tokio::test]
    async fn append_and_read_back() {
        let (_dir, log) = temp_log("users.txt");
        log.append("1001").await.unwrap();
        log.append("1002").await.unwrap();
        assert_eq!(log.read_all(), vec!["1001", "1002"]);
        assert!(log.contains("1001"));
        assert!(!log.contains("100"));
        assert_eq!(log.count(), 2);
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let (_dir, log) = temp_log("absent.txt");
        assert!(log.read_all().is_empty());
        assert_eq!(log.count(), 0);
        assert!(!log.contains("42"));
    }

    #[tokio::test]
    async fn remove_first_keeps_duplicates() {
        let (_dir, log) = temp_log("blocked.txt");
        log.append("42").await.unwrap();
        log.append("7").await.unwrap();
        log.append("42").await.unwrap();

        assert!(log.remove_first("42").await.unwrap());
        assert_eq!(log.read_all(), vec!["7", "42"]);

        assert!(log.remove_first("42").await.unwrap());
        assert!(!log.remove_first("42").await.unwrap());
        assert_eq!(log.read_all(), vec!["7"]);
    }

    #[tokio::test]
    async fn remove_from_missing_file_is_noop() {
        let (_dir, log) = temp_log("blocked.txt");
        assert!(!log.remove_first("42").await.unwrap());
    }

    #[tokio::test]
    async fn clear_deletes_and_tolerates_absence() {
        let (_dir, log) = temp_log("feedback.txt");
        log.append("1: hi").await.unwrap();
        log.clear().await.unwrap();
        assert!(log.read_all().is_empty());
        log.clear().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_appends_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = std::sync::Arc::new(AppendLog::new(dir.path().join("log.txt")));

        let mut tasks = Vec::new();
        for i in 0..20 {
            let log = log.clone();
            tasks.push(tokio::spawn(async move {
                log.append(&format!("record-{i}")).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let lines = log.read_all();
        assert_eq!(lines.len(), 20);
        for line in lines {
            assert!(line.starts_with("record-"));
        }
    }
}
