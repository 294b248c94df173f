use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::Mutex;

pub mod append_log;

use append_log::AppendLog;

/// Flat-file store backing the bot. Every entity is a line file under
/// the data directory; reads are linear scans and writes are serialized
/// per file. There are no cross-file transactions: a crash between
/// "record written" and "user notified" is tolerated.
pub struct Store {
    users: AppendLog,
    blocked: AppendLog,
    feedback: AppendLog,
    registrations: AppendLog,
    access: AppendLog,
    lang_dir: PathBuf,
    lang_lock: Mutex<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub users: usize,
    pub blocked: usize,
    pub feedback: usize,
}

/// Payloads are stored one record per line; embedded newlines would
/// corrupt the scan, so they become spaces.
fn one_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

impl Store {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("create data dir {}", data_dir.display()))?;
        let lang_dir = data_dir.join("lang_prefs");
        std::fs::create_dir_all(&lang_dir)
            .with_context(|| format!("create lang prefs dir {}", lang_dir.display()))?;

        Ok(Self {
            users: AppendLog::new(data_dir.join("users.txt")),
            blocked: AppendLog::new(data_dir.join("blocked_users.txt")),
            feedback: AppendLog::new(data_dir.join("feedback.txt")),
            registrations: AppendLog::new(data_dir.join("registrations.txt")),
            access: AppendLog::new(data_dir.join("access_log.txt")),
            lang_dir,
            lang_lock: Mutex::new(()),
        })
    }

    /// Records an approved user. Ids are unique in this store, so a
    /// second approval of the same id is a no-op. Returns whether the
    /// id was actually added.
    pub async fn append_user(&self, id: i64) -> Result<bool> {
        if self.contains_user(id) {
            return Ok(false);
        }
        self.users.append(&id.to_string()).await?;
        Ok(true)
    }

    pub fn contains_user(&self, id: i64) -> bool {
        self.users.contains(&id.to_string())
    }

    pub fn read_users(&self) -> Vec<i64> {
        self.users
            .read_all()
            .iter()
            .filter_map(|line| line.trim().parse().ok())
            .collect()
    }

    /// The blocked store is a plain append; duplicates are possible and
    /// `remove_blocked` peels them off one occurrence at a time.
    pub async fn append_blocked(&self, id: i64) -> Result<()> {
        self.blocked.append(&id.to_string()).await
    }

    pub async fn remove_blocked(&self, id: i64) -> Result<bool> {
        self.blocked.remove_first(&id.to_string()).await
    }

    pub fn is_blocked(&self, id: i64) -> bool {
        self.blocked.contains(&id.to_string())
    }

    pub fn read_blocked(&self) -> Vec<i64> {
        self.blocked
            .read_all()
            .iter()
            .filter_map(|line| line.trim().parse().ok())
            .collect()
    }

    pub async fn append_feedback(&self, id: i64, text: &str) -> Result<()> {
        self.feedback
            .append(&format!("{id}: {}", one_line(text)))
            .await
    }

    pub fn read_feedback(&self) -> Vec<String> {
        self.feedback.read_all()
    }

    pub async fn clear_feedback(&self) -> Result<()> {
        self.feedback.clear().await
    }

    /// `entry` is either "name - phone" from a shared contact or the
    /// free-form text the user typed.
    pub async fn append_registration(&self, id: i64, entry: &str) -> Result<()> {
        self.registrations
            .append(&format!("{id}: {}", one_line(entry)))
            .await
    }

    pub async fn append_access(&self, line: &str) -> Result<()> {
        self.access.append(&one_line(line)).await
    }

    /// Last `n` access-log lines in their original order.
    pub fn tail_access(&self, n: usize) -> Vec<String> {
        let mut lines = self.access.read_all();
        let skip = lines.len().saturating_sub(n);
        lines.split_off(skip)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.count(),
            blocked: self.blocked.count(),
            feedback: self.feedback.count(),
        }
    }

    fn lang_path(&self, id: i64) -> PathBuf {
        self.lang_dir.join(format!("{id}.txt"))
    }

    /// Stored language preference, if any. Unreadable records degrade
    /// to "no preference".
    pub fn user_language(&self, id: i64) -> Option<String> {
        match std::fs::read_to_string(self.lang_path(id)) {
            Ok(code) => {
                let code = code.trim().to_owned();
                (!code.is_empty()).then_some(code)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("failed to read language preference for {id}: {e}");
                None
            }
        }
    }

    /// Persists a language preference. The code is not validated against
    /// the loaded tables; an unknown code makes later lookups fall back
    /// to the raw key.
    pub async fn set_user_language(&self, id: i64, code: &str) -> Result<()> {
        let _guard = self.lang_lock.lock().await;
        let path = self.lang_path(id);
        std::fs::write(&path, code.trim())
            .with_context(|| format!("write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn users_are_unique() {
        let (_dir, store) = temp_store();
        assert!(store.append_user(42).await.unwrap());
        assert!(!store.append_user(42).await.unwrap());
        assert_eq!(store.read_users(), vec![42]);
        assert!(store.contains_user(42));
        assert!(!store.contains_user(7));
    }

    #[tokio::test]
    async fn blocked_allows_duplicates_and_unblocks_one_at_a_time() {
        let (_dir, store) = temp_store();
        store.append_blocked(42).await.unwrap();
        store.append_blocked(42).await.unwrap();
        assert!(store.is_blocked(42));

        assert!(store.remove_blocked(42).await.unwrap());
        assert!(store.is_blocked(42));
        assert!(store.remove_blocked(42).await.unwrap());
        assert!(!store.is_blocked(42));
        assert!(!store.remove_blocked(42).await.unwrap());
    }

    #[tokio::test]
    async fn user_can_sit_in_both_stores() {
        // No mutual exclusion between stores; the gate resolves the
        // conflict in favour of the block list.
        let (_dir, store) = temp_store();
        store.append_user(42).await.unwrap();
        store.append_blocked(42).await.unwrap();
        assert!(store.contains_user(42));
        assert!(store.is_blocked(42));
    }

    #[tokio::test]
    async fn feedback_records_are_flattened_to_one_line() {
        let (_dir, store) = temp_store();
        store.append_feedback(7, "great\nbot").await.unwrap();
        assert_eq!(store.read_feedback(), vec!["7: great bot"]);
        assert_eq!(store.stats().feedback, 1);

        store.clear_feedback().await.unwrap();
        assert!(store.read_feedback().is_empty());
    }

    #[tokio::test]
    async fn registration_record_format() {
        let (dir, store) = temp_store();
        store.append_registration(7, "Ali Valiev - +998901234567").await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join("registrations.txt")).unwrap();
        assert_eq!(raw, "7: Ali Valiev - +998901234567\n");
    }

    #[tokio::test]
    async fn access_tail_returns_most_recent_in_order() {
        let (_dir, store) = temp_store();
        for i in 0..5 {
            store.append_access(&format!("line-{i}")).await.unwrap();
        }
        assert_eq!(store.tail_access(2), vec!["line-3", "line-4"]);
        assert_eq!(store.tail_access(10).len(), 5);
    }

    #[tokio::test]
    async fn stats_count_lines_and_tolerate_missing_files() {
        let (_dir, store) = temp_store();
        assert_eq!(
            store.stats(),
            StoreStats { users: 0, blocked: 0, feedback: 0 }
        );

        store.append_user(1).await.unwrap();
        store.append_user(2).await.unwrap();
        store.append_blocked(3).await.unwrap();
        store.append_feedback(1, "ok").await.unwrap();
        assert_eq!(
            store.stats(),
            StoreStats { users: 2, blocked: 1, feedback: 1 }
        );
    }

    #[tokio::test]
    async fn language_preference_roundtrip() {
        let (_dir, store) = temp_store();
        assert_eq!(store.user_language(7), None);

        store.set_user_language(7, "en").await.unwrap();
        assert_eq!(store.user_language(7).as_deref(), Some("en"));

        // Unknown codes persist as-is; validation happens nowhere.
        store.set_user_language(7, "xx").await.unwrap();
        assert_eq!(store.user_language(7).as_deref(), Some("xx"));
    }
}
