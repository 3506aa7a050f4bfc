//! Turns raw backend items into an assembled [`TaskTree`].

use crate::error::Result;
use crate::integrations::{RawTask, TaskBackend, TaskListInfo};
use crate::task::{notes, parse_due, LinkKind, TaskLink, TaskRecord, TaskTree};

/// Convert one backend item into a record.
///
/// The notes side-channel link comes first, followed by the backend links in
/// the order the backend gave them.
///
/// # Errors
/// Returns `InvalidInput` if the due date cannot be parsed.
pub fn record_from_raw(raw: &RawTask, tasklist_id: &str) -> Result<TaskRecord> {
    let notes = raw.notes.clone().unwrap_or_default();

    let mut record = TaskRecord::new(&raw.id, tasklist_id, &raw.title)
        .with_parent(raw.parent.clone().unwrap_or_default())
        .with_completed(raw.is_completed());
    if let Some(due) = raw.due.as_deref().filter(|due| !due.is_empty()) {
        record = record.with_due(parse_due(due)?);
    }

    if let Some(link) = notes::extract_link(&notes) {
        record.add_link(link);
    }
    for link in &raw.links {
        record.add_link(TaskLink::new(
            &link.link,
            &link.description,
            LinkKind::from_backend(&link.kind),
        ));
    }

    Ok(record.with_notes(notes))
}

/// Assemble a tree for `tasklist` from already-fetched items.
///
/// Only items whose completion matches `completed` are kept. Records are
/// appended by due day, undated last, keeping backend order within a day.
/// Items with a malformed due date are logged and skipped.
pub fn build_tree(tasklist: &TaskListInfo, items: &[RawTask], completed: bool) -> TaskTree {
    let mut records: Vec<TaskRecord> = items
        .iter()
        .filter(|raw| raw.is_completed() == completed)
        .filter_map(|raw| match record_from_raw(raw, &tasklist.id) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(task_id = %raw.id, tasklist = %tasklist.title, error = %e, "skipping task");
                None
            }
        })
        .collect();

    records.sort_by_key(|record| (record.due.is_none(), record.due.map(|due| due.date_naive())));

    let mut tree = TaskTree::new(&tasklist.id, &tasklist.title);
    for record in records {
        tree.append(record);
    }
    tree
}

/// Fetch a list by title and assemble it. `Ok(None)` if no list has that title.
pub fn load_tasklist(
    backend: &dyn TaskBackend,
    title: &str,
    completed: bool,
) -> Result<Option<TaskTree>> {
    let Some(tasklist) = backend.find_tasklist(title)? else {
        return Ok(None);
    };

    let items = backend.list_tasks(&tasklist.id, completed)?;
    let tree = build_tree(&tasklist, &items, completed);
    tracing::info!(
        tasklist = %tree.name(),
        tasklist_id = %tree.id(),
        items = items.len(),
        open = tree.get_open_tasks(),
        "loaded task list"
    );
    Ok(Some(tree))
}
