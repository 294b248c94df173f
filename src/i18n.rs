use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Language used when a user has no stored preference.
pub const DEFAULT_LANG: &str = "uz";

/// Default tables shipped with the binary; written out on first start so
/// operators can edit them in place. Preferences are not validated
/// against this set: a table added on disk is picked up on restart.
static DEFAULT_TABLES: &[(&str, &str)] = &[
    ("uz", include_str!("../lang/uz.json")),
    ("ru", include_str!("../lang/ru.json")),
    ("en", include_str!("../lang/en.json")),
];

/// Read-only translation tables: language code → (key → localized text).
/// Loaded once at startup, immutable afterwards.
pub struct Translations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    /// Loads every `*.json` table under `lang_dir`, seeding the embedded
    /// defaults for any of uz/ru/en that is missing on disk. A table
    /// that fails to parse is skipped with a warning; lookups against it
    /// then fall back to the raw key.
    pub fn load(lang_dir: impl AsRef<Path>) -> Result<Self> {
        let lang_dir = lang_dir.as_ref();
        std::fs::create_dir_all(lang_dir)
            .with_context(|| format!("create lang dir {}", lang_dir.display()))?;

        for (code, json) in DEFAULT_TABLES {
            let path = lang_dir.join(format!("{code}.json"));
            if !path.exists() {
                std::fs::write(&path, json)
                    .with_context(|| format!("seed {}", path.display()))?;
            }
        }

        let mut tables = HashMap::new();
        for entry in std::fs::read_dir(lang_dir)
            .with_context(|| format!("read lang dir {}", lang_dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            match serde_json::from_str::<HashMap<String, String>>(&json) {
                Ok(table) => {
                    tables.insert(code.to_owned(), table);
                }
                Err(e) => log::warn!("skipping malformed table {}: {}", path.display(), e),
            }
        }
        log::info!("loaded {} translation tables", tables.len());
        Ok(Self { tables })
    }

    /// Resolution never fails: a missing language or key yields the key
    /// itself verbatim.
    pub fn resolve(&self, lang: &str, key: &str) -> String {
        self.tables
            .get(lang)
            .and_then(|table| table.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}
