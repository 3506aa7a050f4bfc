//! Chat command flow against an in-memory backend.

use chrono::{DateTime, TimeZone, Utc};
use roomtasks_core::integrations::{NewTask, RawTask, TaskBackend, TaskListInfo, TaskUpdate};
use roomtasks_core::module::{Reply, Response, Sender, TasksModule};
use roomtasks_core::{CoreError, Result, RoomSettings};

const ROOM: &str = "!room:example.org";

struct FakeBackend {
    lists: Vec<(TaskListInfo, Vec<RawTask>)>,
    broken_list: Option<String>,
}

impl TaskBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn list_tasklists(&self) -> Result<Vec<TaskListInfo>> {
        Ok(self.lists.iter().map(|(info, _)| info.clone()).collect())
    }

    fn list_tasks(&self, tasklist_id: &str, _show_completed: bool) -> Result<Vec<RawTask>> {
        if self.broken_list.as_deref() == Some(tasklist_id) {
            return Err(CoreError::backend("fake", "connection reset"));
        }
        self.lists
            .iter()
            .find(|(info, _)| info.id == tasklist_id)
            .map(|(_, tasks)| tasks.clone())
            .ok_or_else(|| CoreError::NotFound(tasklist_id.to_string()))
    }

    fn toggle_completion(&self, _tasklist_id: &str, _task_id: &str) -> Result<bool> {
        Ok(true)
    }

    fn create_task(&self, _tasklist_id: &str, task: &NewTask) -> Result<RawTask> {
        Ok(RawTask {
            id: "new".to_string(),
            title: task.title.clone(),
            ..RawTask::default()
        })
    }

    fn update_task(&self, _tasklist_id: &str, task_id: &str, update: &TaskUpdate) -> Result<RawTask> {
        Ok(RawTask {
            id: task_id.to_string(),
            title: update.title.clone().unwrap_or_default(),
            ..RawTask::default()
        })
    }

    fn delete_task(&self, _tasklist_id: &str, _task_id: &str) -> Result<()> {
        Ok(())
    }

    fn create_tasklist(&self, title: &str) -> Result<TaskListInfo> {
        Ok(info("new-list", title))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
}

fn raw(id: &str, title: &str, parent: Option<&str>, due: Option<&str>) -> RawTask {
    RawTask {
        id: id.to_string(),
        title: title.to_string(),
        parent: parent.map(str::to_string),
        due: due.map(str::to_string),
        status: "needsAction".to_string(),
        ..RawTask::default()
    }
}

fn info(id: &str, title: &str) -> TaskListInfo {
    TaskListInfo {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn backend(broken_list: Option<&str>) -> FakeBackend {
    FakeBackend {
        lists: vec![
            (
                info("l1", "Work"),
                vec![
                    raw("d", "Someday", None, None),
                    raw("b", "Slides", Some("a"), None),
                    raw("c", "Later", None, Some("2024-06-20T00:00:00.000Z")),
                    raw("a", "Report", None, Some("2024-05-10T00:00:00.000Z")),
                ],
            ),
            (info("l2", "Home"), Vec::new()),
        ],
        broken_list: broken_list.map(str::to_string),
    }
}

fn module(broken_list: Option<&str>) -> TasksModule {
    TasksModule::new(Some(Box::new(backend(broken_list))))
}

fn settings() -> RoomSettings {
    let mut settings = RoomSettings::new();
    settings.add(ROOM, "Work");
    settings.add(ROOM, "Home");
    settings
}

fn send(module: &mut TasksModule, settings: &mut RoomSettings, is_admin: bool, body: &str) -> Response {
    module.handle(settings, Sender { room_id: ROOM, is_admin }, body, now())
}

fn text(response: &Response) -> &str {
    response.reply.as_ref().map(Reply::text).unwrap_or_default()
}

/// Test: the plain listing numbers top-level entries and nests subtasks.
#[test]
fn test_today_listing_text() {
    let mut module = module(None);
    let mut settings = settings();

    let response = send(&mut module, &mut settings, false, "!googletasks today");

    assert_eq!(
        text(&response),
        "Work\n1 - 🔴 Report (due today)\n\n └ ⚪ Slides\nHome\nNothing to do! 😙\n"
    );
    assert_eq!(module.room_index().len(ROOM), Some(1));
}

/// Test: the markup listing carries list headings and line breaks.
#[test]
fn test_listing_markup() {
    let mut module = module(None);
    let mut settings = settings();

    let response = send(&mut module, &mut settings, false, "!googletasks");
    let Some(Reply::Html(rendered)) = response.reply else {
        panic!("expected a markup reply");
    };

    assert!(rendered
        .html
        .starts_with("<h4>Work</h4>\n1 - 🔴 Report <i>due today</i><br/>\n<br/> └ ⚪ Slides<br/>2 - ⚪ Later"));
    assert!(rendered.html.contains("3 - ⚪ Someday<br/>"));
    assert!(rendered.html.ends_with("<h4>Home</h4>\nNothing to do! 😙"));
}

/// Test: `show` resolves numbers against the last listing of the room.
#[test]
fn test_show_after_listing() {
    let mut module = module(None);
    let mut settings = settings();

    let before = send(&mut module, &mut settings, false, "!googletasks show 1");
    assert_eq!(
        text(&before),
        "No task list has been displayed in this room. First display task lists."
    );

    send(&mut module, &mut settings, false, "!googletasks");
    let shown = send(&mut module, &mut settings, false, "!googletasks show 2");
    assert!(text(&shown).starts_with("⚪ Later\n📅 due in "));

    // a narrower listing replaces the snapshot
    send(&mut module, &mut settings, false, "!googletasks today");
    let out_of_range = send(&mut module, &mut settings, false, "!googletasks show 2");
    assert_eq!(text(&out_of_range), "Invalid index. Expected index from 1 to 1");

    let invalid = send(&mut module, &mut settings, false, "!googletasks show two");
    assert_eq!(
        text(&invalid),
        "'two' is not a valid index.\nUsage !googletasks show <idx (integer)>"
    );
}

/// Test: snapshots are kept per room.
#[test]
fn test_rooms_do_not_share_snapshots() {
    let mut module = module(None);
    let mut settings = settings();

    send(&mut module, &mut settings, false, "!googletasks");
    let other = module.handle(
        &mut settings,
        Sender {
            room_id: "!other:example.org",
            is_admin: false,
        },
        "!googletasks show 1",
        now(),
    );
    assert!(text(&other).starts_with("No task list has been displayed"));
}

/// Test: a list failing upstream renders empty while the others still show.
#[test]
fn test_backend_failure_is_isolated() {
    let mut module = module(Some("l1"));
    let mut settings = settings();

    let response = send(&mut module, &mut settings, false, "!googletasks");
    assert_eq!(
        text(&response),
        "Work\nNothing to do! 😙\nHome\nNothing to do! 😙\n"
    );
}

/// Test: admins manage room associations, others are refused.
#[test]
fn test_add_and_del() {
    let mut module = module(None);
    let mut settings = RoomSettings::new();

    let refused = send(&mut module, &mut settings, false, "!googletasks add Work");
    assert_eq!(text(&refused), "Only room admins can change task lists.");
    assert!(!refused.settings_changed);

    let added = send(&mut module, &mut settings, true, "!googletasks add Work");
    assert_eq!(text(&added), "Added new google tasklist to this room");
    assert!(added.settings_changed);
    assert_eq!(settings.lists_for(ROOM), ["Work".to_string()]);

    let duplicate = send(&mut module, &mut settings, true, "!googletasks add Work");
    assert_eq!(text(&duplicate), "This google tasklist already added in this room!");

    let missing = send(&mut module, &mut settings, true, "!googletasks add Groceries");
    assert_eq!(text(&missing), "This google tasklist does not exist!");

    let listed = send(&mut module, &mut settings, false, "!googletasks list");
    assert_eq!(text(&listed), "Tasklists in this room: Work");

    let available = send(&mut module, &mut settings, false, "!googletasks listavailable");
    assert_eq!(text(&available), "Available tasklists: \n - Home\n");

    let removed = send(&mut module, &mut settings, true, "!googletasks del Work");
    assert_eq!(text(&removed), "Removed google tasklist from this room");
    assert!(removed.settings_changed);
    assert!(settings.lists_for(ROOM).is_empty());
}

/// Test: unknown sub-commands get a short answer.
#[test]
fn test_unknown_command() {
    let mut module = module(None);
    let mut settings = settings();
    let response = send(&mut module, &mut settings, false, "!googletasks frobnicate");
    assert_eq!(text(&response), "Unknown command");
}

/// Test: the digest only goes to rooms with something due.
#[test]
fn test_digest_skips_quiet_rooms() {
    let mut module = module(None);
    let mut settings = RoomSettings::new();
    settings.add(ROOM, "Work");
    settings.add(ROOM, "Home");
    settings.add("!quiet:example.org", "Home");

    let digests = module.digest(&settings, now());

    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].room_id, ROOM);
    assert_eq!(
        digests[0].rendered.text,
        "Work\n1 - 🔴 Report (due today)\n\n └ ⚪ Slides\n"
    );
    assert_eq!(module.room_index().len("!quiet:example.org"), None);
}
