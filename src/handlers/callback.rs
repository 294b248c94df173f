use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::app::App;
use crate::handlers::admin::parse_target;
use crate::handlers::content;

/// Callback pipeline: blocked gate, then admin moderation triggers
/// (`block_<id>` / `unblock_<id>`), then the public resource menu.
/// Every query is answered; unknown data is ignored.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, app: Arc<App>) -> Result<()> {
    let from_id = q.from.id.0 as i64;
    let chat = ChatId(from_id);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    if app.store.is_blocked(from_id) {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    }

    if app.admins.is_admin(from_id) {
        if let Some(segment) = data.strip_prefix("block_") {
            // A malformed target is dropped without an answer text.
            if let Some(target) = parse_target(segment) {
                if let Err(e) = app.store.append_blocked(target).await {
                    log::warn!("block of {target} not recorded: {e}");
                    bot.answer_callback_query(q.id).await?;
                    return Ok(());
                }
                if let Err(e) = bot
                    .send_message(ChatId(target), "🚫 Siz admin tomonidan bloklandingiz.")
                    .await
                {
                    log::warn!("block notice to {target} failed: {e}");
                }
                bot.answer_callback_query(q.id).text("✅ Bloklandi").await?;
            } else {
                bot.answer_callback_query(q.id).await?;
            }
            return Ok(());
        }

        if let Some(segment) = data.strip_prefix("unblock_") {
            if let Some(target) = parse_target(segment) {
                // Removes one occurrence; pressing again on an absent id
                // is a no-op.
                match app.store.remove_blocked(target).await {
                    Ok(true) => {
                        if let Err(e) = bot
                            .send_message(ChatId(target), "✅ Siz endi blokdan chiqdingiz.")
                            .await
                        {
                            log::warn!("unblock notice to {target} failed: {e}");
                        }
                        bot.answer_callback_query(q.id)
                            .text("✅ Blokdan chiqarildi")
                            .await?;
                        return Ok(());
                    }
                    Ok(false) => {}
                    Err(e) => log::warn!("unblock of {target} not recorded: {e}"),
                }
            }
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    }

    if let Some(text) = content::resource_text(&data) {
        bot.send_message(chat, text)
            .parse_mode(ParseMode::Markdown)
            .await?;
    }
    bot.answer_callback_query(q.id).await?;
    Ok(())
}
