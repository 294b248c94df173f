use std::sync::Arc;

use anyhow::Error;
use teloxide::dptree;
use teloxide::prelude::*;

use crate::app::App;
use crate::config::{AdminPolicy, Config};
use crate::handlers::{callback_handler, message_handler};
use crate::i18n::Translations;
use crate::session::SessionStore;
use crate::storage::Store;

mod app;
mod commands;
mod config;
mod handlers;
mod i18n;
mod session;
mod storage;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    log::info!("Starting kursbot...");

    // Missing credentials or an empty admin list abort here, before any
    // update is served.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {e}");
            return Err(e);
        }
    };
    log::info!("admin allowlist has {} id(s)", config.admin_ids.len());

    let store = Store::open(&config.data_dir)?;
    let i18n = Translations::load(&config.lang_dir)?;
    let app = Arc::new(App {
        store,
        i18n,
        sessions: SessionStore::new(),
        admins: AdminPolicy::new(config.admin_ids.clone()),
    });

    let bot = Bot::new(config.bot_token.clone());

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    log::info!("Starting to dispatch updates...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot shutdown complete");
    Ok(())
}
