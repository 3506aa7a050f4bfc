use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A task list as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A link declared on a task by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

/// A task item exactly as the backend hands it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    /// RFC 3339, e.g. `2024-03-05T00:00:00.000Z`
    #[serde(default)]
    pub due: Option<String>,
    /// "needsAction" | "completed"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

impl RawTask {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Fields for a task to create.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub notes: String,
    /// Day only; the backend discards the time of day
    pub due: Option<NaiveDate>,
    /// Sent only when non-empty
    pub links: Vec<RawLink>,
}

/// Changes to an existing task. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due: Option<NaiveDate>,
    /// Destination list id. The task is re-created there and removed from
    /// its current list, so it gets a new id.
    pub move_to: Option<String>,
}

/// Source of task lists and tasks.
///
/// Every call is a complete round trip; implementations keep no state
/// between calls beyond credentials.
pub trait TaskBackend {
    /// Short identifier used in logs and errors (e.g. "google").
    fn name(&self) -> &str;

    fn list_tasklists(&self) -> Result<Vec<TaskListInfo>>;

    /// Tasks of one list, optionally including completed ones.
    fn list_tasks(&self, tasklist_id: &str, show_completed: bool) -> Result<Vec<RawTask>>;

    /// Flip a task between open and completed. Returns the new completion.
    fn toggle_completion(&self, tasklist_id: &str, task_id: &str) -> Result<bool>;

    fn create_task(&self, tasklist_id: &str, task: &NewTask) -> Result<RawTask>;

    /// Apply `update` and return the task as stored afterwards.
    fn update_task(&self, tasklist_id: &str, task_id: &str, update: &TaskUpdate) -> Result<RawTask>;

    fn delete_task(&self, tasklist_id: &str, task_id: &str) -> Result<()>;

    fn create_tasklist(&self, title: &str) -> Result<TaskListInfo>;

    /// Find a list by its exact title.
    fn find_tasklist(&self, title: &str) -> Result<Option<TaskListInfo>> {
        Ok(self
            .list_tasklists()?
            .into_iter()
            .find(|tasklist| tasklist.title == title))
    }

    /// Like [`find_tasklist`](Self::find_tasklist) but a missing list is an error.
    fn require_tasklist(&self, title: &str) -> Result<TaskListInfo> {
        self.find_tasklist(title)?
            .ok_or_else(|| CoreError::NotFound(format!("task list '{title}'")))
    }
}
