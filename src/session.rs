use std::collections::HashMap;
use std::sync::Mutex;

/// The single pending multi-step interaction a user is inside. Exactly
/// one mode per user; entering a wizard replaces whatever was active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    AwaitingFeedback,
    AwaitingRegistration,
    AwaitingBroadcastText,
    AwaitingBroadcastFile,
}

/// In-memory conversation tracker keyed by user id. Deliberately not
/// persisted: a restart silently resets every user to `Idle` and
/// mid-wizard users have to restart their flow.
pub struct SessionStore {
    modes: Mutex<HashMap<i64, Mode>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            modes: Mutex::new(HashMap::new()),
        }
    }

    pub fn mode(&self, user_id: i64) -> Mode {
        self.modes
            .lock()
            .expect("session map poisoned")
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_mode(&self, user_id: i64, mode: Mode) {
        let mut modes = self.modes.lock().expect("session map poisoned");
        if mode == Mode::Idle {
            modes.remove(&user_id);
        } else {
            modes.insert(user_id, mode);
        }
    }

    pub fn clear(&self, user_id: i64) {
        self.set_mode(user_id, Mode::Idle);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn defaults_to_idle() {
        let sessions = SessionStore::new();
        assert_eq!(sessions.mode(1), Mode::Idle);
    }

    #[test]
    fn set_mode_replaces_previous_mode() {
        let sessions = SessionStore::new();
        sessions.set_mode(1, Mode::AwaitingFeedback);
        sessions.set_mode(1, Mode::AwaitingBroadcastText);
        assert_eq!(sessions.mode(1), Mode::AwaitingBroadcastText);
    }

    #[test]
    fn clear_resets_to_idle() {
        let sessions = SessionStore::new();
        sessions.set_mode(1, Mode::AwaitingRegistration);
        sessions.clear(1);
        assert_eq!(sessions.mode(1), Mode::Idle);
    }

    #[test]
    fn users_do_not_share_modes() {
        let sessions = SessionStore::new();
        sessions.set_mode(1, Mode::AwaitingFeedback);
        assert_eq!(sessions.mode(2), Mode::Idle);
    }

    #[test]
    fn concurrent_updates_for_distinct_users() {
        let sessions = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let sessions = sessions.clone();
                std::thread::spawn(move || {
                    sessions.set_mode(i, Mode::AwaitingFeedback);
                    assert_eq!(sessions.mode(i), Mode::AwaitingFeedback);
                    sessions.clear(i);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for i in 0..16 {
            assert_eq!(sessions.mode(i), Mode::Idle);
        }
    }
}
