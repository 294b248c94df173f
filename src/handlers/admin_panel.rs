use anyhow::Result;
use teloxide::prelude::*;

use crate::app::App;
use crate::handlers::ui;

/// Telegram caps messages at 4096 chars; keep the log reply under that.
const LOG_REPLY_BUDGET: usize = 4000;
const LOG_TAIL_LINES: usize = 20;
const FEEDBACK_TAIL: usize = 10;
const USER_LIST_WINDOW: usize = 10;

pub async fn send_panel(bot: &Bot, chat: ChatId) -> Result<()> {
    bot.send_message(chat, "🛠 Admin paneliga xush kelibsiz:")
        .reply_markup(ui::admin_panel())
        .await?;
    Ok(())
}

/// Last lines of the access log, clipped to the reply budget.
pub async fn send_logs(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let lines = app.store.tail_access(LOG_TAIL_LINES);
    let text = if lines.is_empty() {
        "📭 Loglar mavjud emas.".to_string()
    } else {
        let joined = lines.join("\n");
        format!("📋 Oxirgi loglar:\n\n{}", clip_tail(&joined, LOG_REPLY_BUDGET))
    };
    bot.send_message(chat, text).await?;
    Ok(())
}

pub async fn send_stats(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let stats = app.store.stats();
    let text = format!(
        "📊 Statistika:\n\
         👥 Umumiy foydalanuvchilar: {}\n\
         🚫 Bloklangan foydalanuvchilar: {}\n\
         💬 Fikrlar soni: {}",
        stats.users, stats.blocked, stats.feedback
    );
    bot.send_message(chat, text).await?;
    Ok(())
}

pub async fn send_feedback_list(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let entries = app.store.read_feedback();
    let text = if entries.is_empty() {
        "📭 Hozircha hech qanday fikr mavjud emas.".to_string()
    } else {
        let skip = entries.len().saturating_sub(FEEDBACK_TAIL);
        format!("📋 Oxirgi fikrlar:\n\n{}", entries[skip..].join("\n\n"))
    };
    bot.send_message(chat, text).await?;
    Ok(())
}

pub async fn clear_feedback(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    match app.store.clear_feedback().await {
        Ok(()) => {
            bot.send_message(chat, "🧹 Barcha fikrlar tozalandi.").await?;
        }
        // A missing file already counts as cleared; this branch is a
        // genuine I/O failure.
        Err(e) => {
            log::warn!("clearing feedback failed: {e}");
            bot.send_message(chat, "⚠️ Fikrlarni tozalab bo‘lmadi.").await?;
        }
    }
    Ok(())
}

/// First ten approved ids plus the total count. Same fixed window as
/// the pickers.
pub async fn send_user_list(bot: &Bot, app: &App, chat: ChatId) -> Result<()> {
    let users = app.store.read_users();
    if users.is_empty() {
        bot.send_message(chat, "📂 Hech qanday foydalanuvchi topilmadi.")
            .await?;
        return Ok(());
    }
    let lines: Vec<String> = users
        .iter()
        .take(USER_LIST_WINDOW)
        .map(|id| format!("🆔 {id}"))
        .collect();
    let text = format!(
        "👥 Foydalanuvchilar ro‘yxati ({} ta):\n\n{}",
        users.len(),
        lines.join("\n")
    );
    bot.send_message(chat, text).await?;
    Ok(())
}

/// Last `max` bytes of `s`, nudged forward to a char boundary.
fn clip_tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut idx = s.len() - max;
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    &s[idx..]
}
