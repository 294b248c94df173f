use crate::config::AdminPolicy;
use crate::i18n::{DEFAULT_LANG, Translations};
use crate::session::SessionStore;
use crate::storage::Store;

/// Shared state threaded through every handler via the dispatcher's
/// dependency map. No global singletons: the session store and admin
/// policy live here so their backing can change without touching call
/// sites.
pub struct App {
    pub store: Store,
    pub i18n: Translations,
    pub sessions: SessionStore,
    pub admins: AdminPolicy,
}

impl App {
    /// Localizes `key` for the user's stored language ("uz" when no
    /// preference exists); unknown languages or keys fall back to the
    /// key itself.
    pub fn text(&self, user_id: i64, key: &str) -> String {
        let lang = self
            .store
            .user_language(user_id)
            .unwrap_or_else(|| DEFAULT_LANG.to_string());
        self.i18n.resolve(&lang, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        let i18n = Translations::load(dir.path().join("lang")).unwrap();
        let app = App {
            store,
            i18n,
            sessions: SessionStore::new(),
            admins: AdminPolicy::new(vec![1]),
        };
        (dir, app)
    }

    #[tokio::test]
    async fn resolves_with_default_language_then_preference() {
        let (_dir, app) = temp_app();

        // No stored preference: the uz table answers.
        assert_eq!(app.text(7, "📚 IT kurslar"), "📚 IT kurslar");

        app.store.set_user_language(7, "en").await.unwrap();
        assert_eq!(app.text(7, "📚 IT kurslar"), "📚 IT Courses");

        // Unknown code falls through to the raw key.
        app.store.set_user_language(7, "xx").await.unwrap();
        assert_eq!(app.text(7, "📚 IT kurslar"), "📚 IT kurslar");
    }
}
