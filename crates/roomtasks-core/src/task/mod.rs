//! Task model for lists mirrored from Google Tasks.
//!
//! A [`TaskRecord`] is one backend item. Parent/child linkage is not stored
//! on the record itself; it is resolved by [`TaskTree`] during assembly.

pub mod notes;
pub mod render;
pub mod tree;
pub mod urgency;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

pub use render::{render_full, render_summary, Rendered};
pub use tree::{NodeId, TaskTree};
pub use urgency::{classify, relative_phrase, Urgency};

/// Kind of link attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Link to a mail thread (backend type `email`)
    Email,
    /// Link recovered from the notes side channel
    Slack,
    /// Any other backend-declared type, kept verbatim
    Other(String),
}

impl LinkKind {
    /// Map a backend link type onto a kind.
    pub fn from_backend(kind: &str) -> Self {
        match kind {
            "email" => LinkKind::Email,
            "slack" => LinkKind::Slack,
            other => LinkKind::Other(other.to_string()),
        }
    }

    /// Label shown in front of the link description.
    pub fn label(&self) -> &str {
        match self {
            LinkKind::Email => "✉️",
            LinkKind::Slack => "slack",
            LinkKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A link attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLink {
    pub url: String,
    pub description: String,
    pub kind: LinkKind,
}

impl TaskLink {
    pub fn new(url: impl Into<String>, description: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
            kind,
        }
    }
}

/// One unit of work from the task backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique identifier within the task list
    pub task_id: String,
    /// Owning task list
    pub tasklist_id: String,
    pub title: String,
    /// Free text, possibly multi-line; rendered verbatim
    #[serde(default)]
    pub notes: String,
    /// Deadline, absent when the task has none
    pub due: Option<DateTime<Utc>>,
    pub completed: bool,
    /// Reserved: the backend does not accept writes for it yet
    #[serde(default)]
    pub favorite: bool,
    /// Parent task in the same list
    pub parent_id: Option<String>,
    /// Links in display order
    #[serde(default)]
    pub links: Vec<TaskLink>,
}

impl TaskRecord {
    /// Create an open task without due date, notes or links.
    pub fn new(
        task_id: impl Into<String>,
        tasklist_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            tasklist_id: tasklist_id.into(),
            title: title.into(),
            notes: String::new(),
            due: None,
            completed: false,
            favorite: false,
            parent_id: None,
            links: Vec::new(),
        }
    }

    /// Set the parent reference. An empty id means "no parent".
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        let parent_id = parent_id.into();
        self.parent_id = (!parent_id.is_empty()).then_some(parent_id);
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn add_link(&mut self, link: TaskLink) {
        self.links.push(link);
    }

    /// Whether the record declares a parent.
    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Parse a backend due timestamp such as `2024-03-05T00:00:00.000Z`.
pub fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|due| due.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidInput(format!("malformed due date '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_due_accepts_fractional_seconds() {
        let due = parse_due("2024-03-05T00:00:00.000Z").unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_due_rejects_garbage() {
        let err = parse_due("next tuesday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn empty_parent_means_root() {
        let task = TaskRecord::new("t1", "list", "Root").with_parent("");
        assert!(!task.has_parent());
        let child = TaskRecord::new("t2", "list", "Child").with_parent("t1");
        assert_eq!(child.parent_id.as_deref(), Some("t1"));
    }

    #[test]
    fn email_links_get_envelope_label() {
        assert_eq!(LinkKind::from_backend("email").label(), "✉️");
        assert_eq!(LinkKind::from_backend("slack"), LinkKind::Slack);
        assert_eq!(LinkKind::from_backend("doc").label(), "doc");
    }
}
