//! Per-room snapshot of the last numbered task listing.
//!
//! A listing numbers its top-level entries from 1; a later `show <n>` in the
//! same room resolves `n` against that snapshot instead of the long backend
//! ids.

use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::task::TaskRecord;

#[derive(Debug, Clone, Default)]
pub struct RoomIndex {
    rooms: HashMap<String, Vec<TaskRecord>>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for `room_id`.
    pub fn set(&mut self, room_id: &str, tasks: Vec<TaskRecord>) {
        self.rooms.insert(room_id.to_string(), tasks);
    }

    /// Resolve a 1-based index token against the room snapshot.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `token` is not a positive integer literal
    /// - `NotFound` when nothing was listed in the room yet
    /// - `OutOfRange` when the index falls outside the snapshot
    pub fn get(&self, room_id: &str, token: &str) -> Result<&TaskRecord> {
        let index = parse_index(token)?;
        let tasks = self.rooms.get(room_id).ok_or_else(|| {
            CoreError::NotFound(format!("no task list has been displayed in room {room_id}"))
        })?;

        match index {
            Some(index) if (1..=tasks.len()).contains(&index) => Ok(&tasks[index - 1]),
            _ => Err(CoreError::OutOfRange {
                index: index.unwrap_or(usize::MAX),
                len: tasks.len(),
            }),
        }
    }

    /// Number of entries in the room snapshot, if any.
    pub fn len(&self, room_id: &str) -> Option<usize> {
        self.rooms.get(room_id).map(Vec::len)
    }
}

/// Digits only. `None` for a numeric literal too large to index anything.
fn parse_index(token: &str) -> Result<Option<usize>> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidInput(format!("'{token}' is not a valid index")));
    }
    Ok(token.parse::<usize>().ok())
}
