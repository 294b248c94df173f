use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::app::App;

pub const APPROVE_PREFIX: &str = "tasdiqla_";
pub const BLOCK_PREFIX: &str = "blokla_";

/// How many candidates a picker shows. The window is fixed at the first
/// ten eligible ids and never advances; repeated calls return the same
/// window until the underlying set changes.
const PICKER_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationCommand {
    Approve(i64),
    Block(i64),
    /// Prefix matched but the id segment did not parse to a non-zero
    /// integer. Consumed without a reply or state change.
    Malformed,
}

/// Classifies privileged `prefix_<id>` text, with or without a leading
/// slash. Returns `None` for text that is not a moderation command at
/// all, so non-admin routing can treat it as ordinary input.
pub fn classify_moderation(text: &str) -> Option<ModerationCommand> {
    let text = text.strip_prefix('/').unwrap_or(text);
    if let Some(rest) = text.strip_prefix(APPROVE_PREFIX) {
        return Some(
            parse_target(rest)
                .map(ModerationCommand::Approve)
                .unwrap_or(ModerationCommand::Malformed),
        );
    }
    if let Some(rest) = text.strip_prefix(BLOCK_PREFIX) {
        return Some(
            parse_target(rest)
                .map(ModerationCommand::Block)
                .unwrap_or(ModerationCommand::Malformed),
        );
    }
    None
}

/// The id segment must parse as a non-zero integer.
pub fn parse_target(segment: &str) -> Option<i64> {
    match segment.trim().parse::<i64>() {
        Ok(id) if id != 0 => Some(id),
        _ => None,
    }
}

/// Records the approval and notifies both sides. The target's welcome is
/// best-effort: a crash or send failure after the record is written
/// leaves the approval in place (at-most-once notification).
pub async fn approve(bot: &Bot, app: &App, actor: ChatId, target: i64) -> Result<()> {
    if let Err(e) = app.store.append_user(target).await {
        log::warn!("approve of {target} not recorded: {e}");
        return Ok(());
    }
    bot.send_message(actor, "✅ Foydalanuvchi tasdiqlandi.").await?;
    if let Err(e) = bot
        .send_message(ChatId(target), "👋 Siz botdan foydalanishingiz mumkin.")
        .await
    {
        log::warn!("welcome to {target} failed: {e}");
    }
    Ok(())
}

pub async fn block(bot: &Bot, app: &App, actor: ChatId, target: i64) -> Result<()> {
    if let Err(e) = app.store.append_blocked(target).await {
        log::warn!("block of {target} not recorded: {e}");
        return Ok(());
    }
    bot.send_message(actor, "🚫 Foydalanuvchi bloklandi.").await?;
    if let Err(e) = bot.send_message(ChatId(target), "🚫 Siz bloklandingiz.").await {
        log::warn!("block notice to {target} failed: {e}");
    }
    Ok(())
}

/// Approved-and-not-blocked ids, first-ten window, insertion order.
pub fn block_candidates(users: &[i64], blocked: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    users
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .filter(|id| !blocked.contains(id))
        .take(PICKER_WINDOW)
        .collect()
}

/// Blocked ids, deduplicated, first-ten window.
pub fn unblock_candidates(blocked: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    blocked
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .take(PICKER_WINDOW)
        .collect()
}

pub async fn send_block_picker(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let users = app.store.read_users();
    let blocked = app.store.read_blocked();
    for id in block_candidates(&users, &blocked) {
        let button = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "🚫 Bloklash",
            format!("block_{id}"),
        )]]);
        bot.send_message(chat, format!("🆔 {id}"))
            .reply_markup(button)
            .await?;
    }
    bot.send_message(chat, "🧾 Bloklanadigan foydalanuvchini tanlang.")
        .await?;
    Ok(())
}

pub async fn send_unblock_picker(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let blocked = app.store.read_blocked();
    let candidates = unblock_candidates(&blocked);
    if candidates.is_empty() {
        bot.send_message(chat, "🚫 Hozirda hech kim bloklanmagan.")
            .await?;
        return Ok(());
    }
    for id in candidates {
        let button = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "✅ Blokdan chiqarish",
            format!("unblock_{id}"),
        )]]);
        bot.send_message(chat, format!("🆔 {id}"))
            .reply_markup(button)
            .await?;
    }
    bot.send_message(chat, "🧾 Blokdan chiqariladigan foydalanuvchini tanlang.")
        .await?;
    Ok(())
}

/// One notification per admin about an unseen sender, with ready-made
/// approve/block commands. Failures per admin are swallowed so the rest
/// of the allowlist still hears about the user.
pub async fn notify_admins_new_user(bot: &Bot, app: &App, user: &teloxide::types::User) {
    let full_name = user.full_name();
    let username = user.username.as_deref().unwrap_or("no-username");
    let id = user.id.0 as i64;
    let text = format!(
        "🆕 Yangi foydalanuvchi:\n👤 {full_name}\n🆔 {id}\n@{username}\n\n\
         ✅ Tasdiqlash: /{APPROVE_PREFIX}{id}\n❌ Bloklash: /{BLOCK_PREFIX}{id}"
    );
    for admin in app.admins.ids() {
        if let Err(e) = bot.send_message(ChatId(*admin), &text).await {
            log::warn!("new-user notice to admin {admin} failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_approve_and_block_with_optional_slash() {
        assert_eq!(
            classify_moderation("/tasdiqla_42"),
            Some(ModerationCommand::Approve(42))
        );
        assert_eq!(
            classify_moderation("blokla_42"),
            Some(ModerationCommand::Block(42))
        );
    }

    #[test]
    fn malformed_ids_are_consumed_silently() {
        assert_eq!(
            classify_moderation("/blokla_abc"),
            Some(ModerationCommand::Malformed)
        );
        assert_eq!(
            classify_moderation("/tasdiqla_0"),
            Some(ModerationCommand::Malformed)
        );
        assert_eq!(
            classify_moderation("/tasdiqla_"),
            Some(ModerationCommand::Malformed)
        );
    }

    #[test]
    fn unrelated_text_is_not_a_moderation_command() {
        assert_eq!(classify_moderation("📚 IT kurslar"), None);
        assert_eq!(classify_moderation("/start"), None);
        assert_eq!(classify_moderation("tasdiqlanmagan"), None);
    }

    #[test]
    fn block_picker_window_is_first_ten_eligible() {
        let users: Vec<i64> = (1..=15).collect();
        let blocked = vec![2, 4];
        let candidates = block_candidates(&users, &blocked);
        assert_eq!(candidates, vec![1, 3, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn block_picker_deduplicates_users() {
        let users = vec![5, 5, 7, 5, 9];
        assert_eq!(block_candidates(&users, &[]), vec![5, 7, 9]);
    }

    #[test]
    fn unblock_picker_deduplicates_and_windows() {
        let blocked: Vec<i64> = (1..=12).chain([1, 2]).collect();
        assert_eq!(
            unblock_candidates(&blocked),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn picker_window_is_stable_until_the_set_changes() {
        let users: Vec<i64> = (1..=20).collect();
        let first = block_candidates(&users, &[]);
        let second = block_candidates(&users, &[]);
        assert_eq!(first, second);

        // Blocking a candidate shifts the window.
        let third = block_candidates(&users, &[1]);
        assert_ne!(first, third);
        assert_eq!(third[0], 2);
    }
}
