use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Startup configuration. `BOT_TOKEN` and `ADMIN_IDS` are mandatory;
/// missing or empty values abort before any update is served.
pub struct Config {
    pub bot_token: String,
    pub admin_ids: Vec<i64>,
    pub data_dir: PathBuf,
    pub lang_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = match env::var("BOT_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ => bail!("BOT_TOKEN must be set"),
        };

        let raw_admins = env::var("ADMIN_IDS").unwrap_or_default();
        let admin_ids = parse_admin_ids(&raw_admins);
        if admin_ids.is_empty() {
            bail!("ADMIN_IDS must contain at least one telegram id");
        }

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let lang_dir = env::var("LANG_DIR").unwrap_or_else(|_| "lang".to_string());

        Ok(Self {
            bot_token,
            admin_ids,
            data_dir: PathBuf::from(data_dir),
            lang_dir: PathBuf::from(lang_dir),
        })
    }
}

/// Comma-separated id list; entries that do not parse (or parse to zero)
/// are dropped.
pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .filter(|&id| id != 0)
        .collect()
}

/// Fixed allowlist of privileged ids, threaded through every handler so
/// the backing policy can change without touching call sites.
pub struct AdminPolicy {
    ids: Vec<i64>,
}

impl AdminPolicy {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        assert_eq!(
            parse_admin_ids("123456,789012, 345678"),
            vec![123456, 789012, 345678]
        );
    }

    #[test]
    fn tolerates_spaces_and_garbage() {
        assert_eq!(parse_admin_ids(" 111 , abc, 222 "), vec![111, 222]);
        assert_eq!(parse_admin_ids(""), Vec::<i64>::new());
    }

    #[test]
    fn zero_is_not_a_valid_admin_id() {
        assert_eq!(parse_admin_ids("0,42,0"), vec![42]);
    }

    #[test]
    fn policy_matches_only_listed_ids() {
        let policy = AdminPolicy::new(vec![123456, 789012]);
        assert!(policy.is_admin(123456));
        assert!(!policy.is_admin(555555));
        assert_eq!(policy.ids(), &[123456, 789012]);
    }
}
