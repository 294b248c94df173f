use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{Me, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::app::App;
use crate::commands::Command;
use crate::handlers::admin::{self, ModerationCommand};
use crate::handlers::{admin_panel, broadcast, content, ui};
use crate::session::Mode;

/// Inbound message pipeline, strict priority order:
/// access log → blocked gate → new-user notice → moderation subcommands
/// (admins) → admin panel labels (admins) → active session continuation
/// → end-user menu. Evaluation stops at the first matching category.
pub async fn message_handler(bot: Bot, msg: Message, me: Me, app: Arc<App>) -> Result<()> {
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or_default().to_string();

    log_access(&app, &msg).await;

    // The block list gates everything, admins included.
    if app.store.is_blocked(user_id) {
        bot.send_message(chat_id, "🚫 Siz bloklangansiz.").await?;
        return Ok(());
    }

    if !app.store.contains_user(user_id) {
        admin::notify_admins_new_user(&bot, &app, &user).await;
    }

    let is_admin = app.admins.is_admin(user_id);

    // (1) Moderation subcommands. Only admins reach this category; the
    // same text from anyone else is ordinary menu input. A matching
    // prefix with a malformed id is consumed without a reply.
    if is_admin {
        match admin::classify_moderation(&text) {
            Some(ModerationCommand::Approve(target)) => {
                return admin::approve(&bot, &app, chat_id, target).await;
            }
            Some(ModerationCommand::Block(target)) => {
                return admin::block(&bot, &app, chat_id, target).await;
            }
            Some(ModerationCommand::Malformed) => return Ok(()),
            None => {}
        }
    }

    // (2) Admin panel labels.
    if is_admin && ui::is_admin_panel_button(&text) {
        return panel_action(&bot, &app, chat_id, user_id, &text).await;
    }

    // (3) Continuation of an active session mode. Only a qualifying
    // payload resolves the mode; anything else leaves it untouched and
    // falls through.
    if continue_session(&bot, &app, &msg, user_id).await? {
        return Ok(());
    }

    // (4) End-user menu.
    user_menu(&bot, &app, &msg, &me, user_id, &text).await
}

async fn log_access(app: &App, msg: &Message) {
    let Some(user) = msg.from.as_ref() else { return };
    let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let username = user.username.as_deref().unwrap_or("no-username");
    let text = msg
        .text()
        .or_else(|| msg.caption())
        .unwrap_or("(non-text message)");
    let entry = format!(
        "{time} | {} | @{username} | {} | \"{text}\"",
        user.id.0,
        user.full_name()
    );
    log::info!("{entry}");
    if let Err(e) = app.store.append_access(&entry).await {
        log::warn!("access log append failed: {e}");
    }
}

async fn panel_action(bot: &Bot, app: &App, chat: ChatId, user_id: i64, text: &str) -> Result<()> {
    match text {
        ui::BTN_LOGS => admin_panel::send_logs(bot, app, chat).await,
        ui::BTN_STATS => admin_panel::send_stats(bot, app, chat).await,
        ui::BTN_FEEDBACK_LIST => admin_panel::send_feedback_list(bot, app, chat).await,
        ui::BTN_CLEAR_FEEDBACK => admin_panel::clear_feedback(bot, app, chat).await,
        ui::BTN_USERS => admin_panel::send_user_list(bot, app, chat).await,
        ui::BTN_BLOCK => admin::send_block_picker(bot, app, chat).await,
        ui::BTN_UNBLOCK => admin::send_unblock_picker(bot, app, chat).await,
        ui::BTN_BROADCAST_TEXT => {
            app.sessions.set_mode(user_id, Mode::AwaitingBroadcastText);
            bot.send_message(chat, "✏️ Xabar matnini yozing:").await?;
            Ok(())
        }
        ui::BTN_BROADCAST_FILE => {
            app.sessions.set_mode(user_id, Mode::AwaitingBroadcastFile);
            bot.send_message(chat, "📤 Rasm, video yoki fayl yuboring:")
                .await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// What an inbound message carries, as far as the wizards care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    Text,
    Contact,
    Media,
    Other,
}

fn payload_kind(msg: &Message) -> Payload {
    if msg.text().is_some() {
        Payload::Text
    } else if msg.contact().is_some() {
        Payload::Contact
    } else if broadcast::media_ref(msg).is_some() {
        Payload::Media
    } else {
        Payload::Other
    }
}

/// Whether a payload resolves the given mode. Feedback and broadcast
/// text take text only; registration also accepts a shared contact;
/// broadcast file wants a photo, video or document. Anything else
/// leaves the mode untouched.
fn qualifies(mode: Mode, payload: Payload) -> bool {
    match mode {
        Mode::Idle => false,
        Mode::AwaitingFeedback | Mode::AwaitingBroadcastText => payload == Payload::Text,
        Mode::AwaitingRegistration => matches!(payload, Payload::Text | Payload::Contact),
        Mode::AwaitingBroadcastFile => payload == Payload::Media,
    }
}

/// Resolves the user's active mode when the payload qualifies. Returns
/// whether the message was consumed.
async fn continue_session(bot: &Bot, app: &App, msg: &Message, user_id: i64) -> Result<bool> {
    let mode = app.sessions.mode(user_id);
    if !qualifies(mode, payload_kind(msg)) {
        return Ok(false);
    }
    let chat_id = msg.chat.id;
    match mode {
        Mode::Idle => Ok(false),

        Mode::AwaitingFeedback => {
            let Some(text) = msg.text() else {
                return Ok(false);
            };
            app.sessions.clear(user_id);
            if let Err(e) = app.store.append_feedback(user_id, text).await {
                log::warn!("feedback from {user_id} not recorded: {e}");
            }
            bot.send_message(chat_id, "✅ Fikringiz uchun rahmat!").await?;
            notify_admins_feedback(bot, app, msg, text).await;
            Ok(true)
        }

        Mode::AwaitingRegistration => {
            if let Some(contact) = msg.contact() {
                app.sessions.clear(user_id);
                let mut name = contact.first_name.clone();
                if let Some(last) = contact.last_name.as_deref() {
                    name = format!("{name} {last}");
                }
                let entry = format!("{name} - {}", contact.phone_number);
                if let Err(e) = app.store.append_registration(user_id, &entry).await {
                    log::warn!("registration from {user_id} not recorded: {e}");
                }
                bot.send_message(
                    chat_id,
                    "✅ Kontakt qabul qilindi. Tez orada siz bilan bog‘lanamiz.",
                )
                .await?;
                notify_admins_registration(bot, app, user_id, &name, &contact.phone_number).await;
                return Ok(true);
            }
            let Some(text) = msg.text() else {
                return Ok(false);
            };
            app.sessions.clear(user_id);
            if let Err(e) = app.store.append_registration(user_id, text).await {
                log::warn!("registration from {user_id} not recorded: {e}");
            }
            bot.send_message(
                chat_id,
                "📩 Ro‘yxatdan o‘tdingiz. Tez orada siz bilan bog‘lanamiz.",
            )
            .await?;
            Ok(true)
        }

        Mode::AwaitingBroadcastText => {
            let Some(text) = msg.text() else {
                return Ok(false);
            };
            app.sessions.clear(user_id);
            let report = broadcast::broadcast_text(bot, app, text).await;
            bot.send_message(
                chat_id,
                format!(
                    "✅ Xabar yuborildi ({}/{}).",
                    report.delivered,
                    report.attempted()
                ),
            )
            .await?;
            Ok(true)
        }

        Mode::AwaitingBroadcastFile => {
            let Some(media) = broadcast::media_ref(msg) else {
                return Ok(false);
            };
            app.sessions.clear(user_id);
            let report = broadcast::broadcast_media(bot, app, &media).await;
            bot.send_message(
                chat_id,
                format!(
                    "✅ Fayl yuborildi ({}/{}).",
                    report.delivered,
                    report.attempted()
                ),
            )
            .await?;
            Ok(true)
        }
    }
}

async fn user_menu(
    bot: &Bot,
    app: &App,
    msg: &Message,
    me: &Me,
    user_id: i64,
    text: &str,
) -> Result<()> {
    let chat_id = msg.chat.id;

    if let Ok(cmd) = Command::parse(text, me.username()) {
        match cmd {
            Command::Start => {
                bot.send_message(chat_id, "Tilni tanlang / Choose language / Выберите язык:")
                    .reply_markup(ui::language_menu())
                    .await?;
                return Ok(());
            }
            Command::Help => {
                bot.send_message(chat_id, Command::descriptions().to_string())
                    .await?;
                return Ok(());
            }
            Command::Admin if app.admins.is_admin(user_id) => {
                return admin_panel::send_panel(bot, chat_id).await;
            }
            // /admin from anyone else falls through to the menu prompt.
            Command::Admin => {}
        }
    }

    // Language picker buttons carry flag emoji; match on the name.
    if text.contains("O‘zbekcha") {
        return set_language(bot, app, chat_id, user_id, "uz", "✅ Til o‘zbek tiliga o‘zgartirildi.").await;
    }
    if text.contains("Русский") {
        return set_language(bot, app, chat_id, user_id, "ru", "✅ Язык изменён на русский.").await;
    }
    if text.contains("English") {
        return set_language(bot, app, chat_id, user_id, "en", "✅ Language changed to English.").await;
    }

    match text {
        ui::BTN_COURSES => {
            bot.send_message(chat_id, content::COURSE_LIST)
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        ui::BTN_RESOURCES => {
            bot.send_message(chat_id, "Quyidagilardan birini tanlang:")
                .reply_markup(ui::resources_menu())
                .await?;
        }
        ui::BTN_REGISTER => {
            app.sessions.set_mode(user_id, Mode::AwaitingRegistration);
            bot.send_message(
                chat_id,
                "📩 Iltimos, kontaktni ulashing yoki ismingiz va raqamingizni yozing:",
            )
            .reply_markup(ui::contact_request())
            .await?;
        }
        ui::BTN_FEEDBACK => {
            app.sessions.set_mode(user_id, Mode::AwaitingFeedback);
            bot.send_message(chat_id, "✏️ Kurs yoki bot haqida fikringiz:")
                .await?;
        }
        ui::BTN_CHANGE_LANG => {
            bot.send_message(chat_id, "Tilni tanlang:")
                .reply_markup(ui::language_menu())
                .await?;
        }
        _ => {
            bot.send_message(chat_id, app.text(user_id, ui::MENU_PROMPT_KEY))
                .reply_markup(ui::main_menu(app, user_id))
                .await?;
        }
    }
    Ok(())
}

async fn set_language(
    bot: &Bot,
    app: &App,
    chat_id: ChatId,
    user_id: i64,
    code: &str,
    confirmation: &str,
) -> Result<()> {
    if let Err(e) = app.store.set_user_language(user_id, code).await {
        log::warn!("language preference for {user_id} not saved: {e}");
    }
    bot.send_message(chat_id, confirmation).await?;
    bot.send_message(chat_id, app.text(user_id, ui::MENU_PROMPT_KEY))
        .reply_markup(ui::main_menu(app, user_id))
        .await?;
    Ok(())
}

async fn notify_admins_feedback(bot: &Bot, app: &App, msg: &Message, text: &str) {
    let Some(user) = msg.from.as_ref() else { return };
    let username = user.username.as_deref().unwrap_or("no-username");
    let note = format!(
        "💬 Yangi fikr keldi:\n👤 {} | @{username}\n🆔 {}\n📝 {text}",
        user.full_name(),
        user.id.0
    );
    for admin in app.admins.ids() {
        if let Err(e) = bot.send_message(ChatId(*admin), &note).await {
            log::warn!("feedback notice to admin {admin} failed: {e}");
        }
    }
}

async fn notify_admins_registration(bot: &Bot, app: &App, user_id: i64, name: &str, phone: &str) {
    let note = format!("📩 Yangi ro‘yxatdan o‘tish:\n👤 {name}\n📞 {phone}\n🆔 {user_id}");
    for admin in app.admins.ids() {
        if let Err(e) = bot.send_message(ChatId(*admin), &note).await {
            log::warn!("registration notice to admin {admin} failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_requires_text_specifically() {
        assert!(qualifies(Mode::AwaitingFeedback, Payload::Text));
        // A shared contact while awaiting feedback leaves the mode
        // unresolved: no transition, no persistence.
        assert!(!qualifies(Mode::AwaitingFeedback, Payload::Contact));
        assert!(!qualifies(Mode::AwaitingFeedback, Payload::Media));
        assert!(!qualifies(Mode::AwaitingFeedback, Payload::Other));
    }

    #[test]
    fn registration_takes_text_or_contact() {
        assert!(qualifies(Mode::AwaitingRegistration, Payload::Text));
        assert!(qualifies(Mode::AwaitingRegistration, Payload::Contact));
        assert!(!qualifies(Mode::AwaitingRegistration, Payload::Media));
        assert!(!qualifies(Mode::AwaitingRegistration, Payload::Other));
    }

    #[test]
    fn broadcast_text_requires_text() {
        assert!(qualifies(Mode::AwaitingBroadcastText, Payload::Text));
        assert!(!qualifies(Mode::AwaitingBroadcastText, Payload::Contact));
        assert!(!qualifies(Mode::AwaitingBroadcastText, Payload::Media));
    }

    #[test]
    fn broadcast_file_requires_media() {
        assert!(qualifies(Mode::AwaitingBroadcastFile, Payload::Media));
        assert!(!qualifies(Mode::AwaitingBroadcastFile, Payload::Text));
        assert!(!qualifies(Mode::AwaitingBroadcastFile, Payload::Contact));
        assert!(!qualifies(Mode::AwaitingBroadcastFile, Payload::Other));
    }

    #[test]
    fn idle_consumes_nothing() {
        for payload in [Payload::Text, Payload::Contact, Payload::Media, Payload::Other] {
            assert!(!qualifies(Mode::Idle, payload));
        }
    }
}
