pub mod admin;
pub mod admin_panel;
pub mod broadcast;
pub mod callback;
pub mod content;
pub mod message;
pub mod ui;

pub use callback::callback_handler;
pub use message::message_handler;
