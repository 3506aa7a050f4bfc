//! Weekday morning digest.
//!
//! At the configured local time the bot posts, to every room with associated
//! lists, the tasks due today and the overdue ones.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};

use crate::module::TasksModule;
use crate::storage::{DigestConfig, RoomSettings};
use crate::task::Rendered;

/// One room's digest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDigest {
    pub room_id: String,
    pub rendered: Rendered,
}

/// Whether the digest should fire at `local_now`.
///
/// Matches on the minute, so a scheduler ticking once per minute sends it
/// exactly once.
pub fn is_digest_due(local_now: NaiveDateTime, config: &DigestConfig) -> bool {
    if !config.enabled {
        return false;
    }
    if config.skip_weekends && matches!(local_now.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    local_now.hour() == config.hour && local_now.minute() == config.minute
}

impl TasksModule {
    /// Render the `today` view of every room with associated lists.
    ///
    /// Empty lists are left out and rooms with nothing due are skipped. Each
    /// sent digest replaces the room's numbering snapshot, so `show <n>`
    /// works on it.
    pub fn digest(&mut self, settings: &RoomSettings, now: DateTime<Utc>) -> Vec<RoomDigest> {
        if !self.is_set_up() {
            tracing::warn!("digest skipped: no task backend configured");
            return Vec::new();
        }

        let mut digests = Vec::new();
        for room_id in settings.rooms() {
            let lists = settings.lists_for(room_id);
            if let Some(rendered) = self.list_for_room(room_id, lists, Some(now), false, now) {
                digests.push(RoomDigest {
                    room_id: room_id.to_string(),
                    rendered,
                });
            }
        }

        tracing::info!(rooms = digests.len(), "digest rendered");
        digests
    }
}
