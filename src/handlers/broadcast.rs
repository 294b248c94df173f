use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, Message};
use tokio::time::{Duration, sleep};

use crate::app::App;

/// Outcome of one fan-out. Individual failures are recorded here for
/// the operator log; the admin-facing acknowledgment only carries the
/// aggregate.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed_ids: Vec<i64>,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed_ids.len()
    }

    fn record(&mut self, id: i64, result: Result<(), teloxide::RequestError>) {
        match result {
            Ok(()) => self.delivered += 1,
            Err(e) => {
                log::warn!("broadcast to {id} failed: {e}");
                self.failed_ids.push(id);
            }
        }
    }
}

/// Media chosen from an inbound message for fan-out. Photos use the
/// highest-resolution variant Telegram offers.
#[derive(Debug, Clone)]
pub enum MediaRef {
    Photo(FileId),
    Video(FileId),
    Document(FileId),
}

pub fn media_ref(msg: &Message) -> Option<MediaRef> {
    if let Some(sizes) = msg.photo() {
        return best_photo(sizes).map(|p| MediaRef::Photo(p.file.id.clone()));
    }
    if let Some(video) = msg.video() {
        return Some(MediaRef::Video(video.file.id.clone()));
    }
    if let Some(doc) = msg.document() {
        return Some(MediaRef::Document(doc.file.id.clone()));
    }
    None
}

/// Telegram lists photo variants smallest first; the canonical one for
/// fan-out is the last, highest-resolution entry.
fn best_photo(sizes: &[teloxide::types::PhotoSize]) -> Option<&teloxide::types::PhotoSize> {
    sizes.last()
}

// Telegram tolerates roughly 30 messages per second from a bot; pause
// every 25 sends.
const PACE_CHUNK: usize = 25;

async fn pace(idx: usize) {
    if idx > 0 && idx % PACE_CHUNK == 0 {
        sleep(Duration::from_secs(1)).await;
    }
}

/// Sends `text` to every id in the users store. A failed recipient never
/// aborts the remaining fan-out.
pub async fn broadcast_text(bot: &Bot, app: &App, text: &str) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for (idx, id) in app.store.read_users().into_iter().enumerate() {
        pace(idx).await;
        let result = bot.send_message(ChatId(id), text).await.map(|_| ());
        report.record(id, result);
    }
    report
}

/// Re-sends `media` by file id to every id in the users store.
pub async fn broadcast_media(bot: &Bot, app: &App, media: &MediaRef) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for (idx, id) in app.store.read_users().into_iter().enumerate() {
        pace(idx).await;
        let chat = ChatId(id);
        let result = match media {
            MediaRef::Photo(file_id) => bot
                .send_photo(chat, InputFile::file_id(file_id.clone()))
                .await
                .map(|_| ()),
            MediaRef::Video(file_id) => bot
                .send_video(chat, InputFile::file_id(file_id.clone()))
                .await
                .map(|_| ()),
            MediaRef::Document(file_id) => bot
                .send_document(chat, InputFile::file_id(file_id.clone()))
                .await
                .map(|_| ()),
        };
        report.record(id, result);
    }
    report
}
