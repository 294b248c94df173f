use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use crate::app::App;

// End-user menu. These canonical labels double as translation keys; the
// router matches the canonical form.
pub const BTN_COURSES: &str = "📚 IT kurslar";
pub const BTN_REGISTER: &str = "📅 Kursga yozilish";
pub const BTN_RESOURCES: &str = "🌐 Manbalar";
pub const BTN_FEEDBACK: &str = "💬 Fikr bildirish";
pub const BTN_CHANGE_LANG: &str = "⚙️ Tilni o‘zgartirish";
pub const MENU_PROMPT_KEY: &str = "👋 Menyudan bo‘lim tanlang yoki /start bosing.";

// Admin panel labels.
pub const BTN_LOGS: &str = "📋 Loglar";
pub const BTN_STATS: &str = "📊 Statistika";
pub const BTN_BROADCAST_TEXT: &str = "📨 Xabar yuborish";
pub const BTN_BROADCAST_FILE: &str = "📎 Fayl yuborish";
pub const BTN_FEEDBACK_LIST: &str = "💬 Fikrlar";
pub const BTN_USERS: &str = "👥 Foydalanuvchilar";
pub const BTN_BLOCK: &str = "🚫 Bloklash";
pub const BTN_UNBLOCK: &str = "✅ Blokdan chiqarish";
pub const BTN_CLEAR_FEEDBACK: &str = "🧹 Fikrlarni tozalash";

pub fn is_admin_panel_button(text: &str) -> bool {
    matches!(
        text,
        BTN_LOGS
            | BTN_STATS
            | BTN_BROADCAST_TEXT
            | BTN_BROADCAST_FILE
            | BTN_FEEDBACK_LIST
            | BTN_USERS
            | BTN_BLOCK
            | BTN_UNBLOCK
            | BTN_CLEAR_FEEDBACK
    )
}

/// Main menu with labels localized for the user's stored language.
pub fn main_menu(app: &App, user_id: i64) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(app.text(user_id, BTN_COURSES)),
            KeyboardButton::new(app.text(user_id, BTN_REGISTER)),
            KeyboardButton::new(app.text(user_id, BTN_RESOURCES)),
        ],
        vec![KeyboardButton::new(app.text(user_id, BTN_FEEDBACK))],
        vec![KeyboardButton::new(app.text(user_id, BTN_CHANGE_LANG))],
    ])
    .resize_keyboard()
}

pub fn language_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("🇺🇿 O‘zbekcha"),
        KeyboardButton::new("🇷🇺 Русский"),
        KeyboardButton::new("🇬🇧 English"),
    ]])
    .resize_keyboard()
}

pub fn admin_panel() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(BTN_LOGS), KeyboardButton::new(BTN_STATS)],
        vec![
            KeyboardButton::new(BTN_BROADCAST_TEXT),
            KeyboardButton::new(BTN_BROADCAST_FILE),
        ],
        vec![
            KeyboardButton::new(BTN_FEEDBACK_LIST),
            KeyboardButton::new(BTN_USERS),
        ],
        vec![
            KeyboardButton::new(BTN_BLOCK),
            KeyboardButton::new(BTN_UNBLOCK),
        ],
        vec![KeyboardButton::new(BTN_CLEAR_FEEDBACK)],
    ])
    .resize_keyboard()
}

pub fn contact_request() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("📱 Kontaktni yuborish").request(ButtonRequest::Contact),
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

pub fn resources_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("🌍 Dasturlash saytlari", "sites")],
        vec![InlineKeyboardButton::callback("🎓 Onlayn bepul kurslar", "courses")],
        vec![InlineKeyboardButton::callback("🎥 YouTube’dagi o‘quv kanallar", "youtube")],
        vec![InlineKeyboardButton::callback("📱 Mobil ilovalar", "apps")],
        vec![InlineKeyboardButton::callback("📘 IT kitoblar", "books")],
        vec![InlineKeyboardButton::callback("📰 IT yangiliklar", "news")],
        vec![InlineKeyboardButton::callback("📄 CV yozish", "cv")],
        vec![InlineKeyboardButton::callback("💼 Ish topish", "jobs")],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_buttons_are_recognized() {
        assert!(is_admin_panel_button(BTN_LOGS));
        assert!(is_admin_panel_button(BTN_BLOCK));
        assert!(is_admin_panel_button(BTN_CLEAR_FEEDBACK));
        assert!(!is_admin_panel_button(BTN_COURSES));
        assert!(!is_admin_panel_button("some other text"));
    }
}
