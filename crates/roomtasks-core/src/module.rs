//! Google Tasks chat module.
//!
//! Parses chat commands, renders task lists into a room and remembers the
//! numbering of the last listing so `show <n>` can refer to it.
//!
//! The module never persists anything itself: room associations live in a
//! [`RoomSettings`] owned by the caller, who saves it when a command reports
//! `settings_changed`.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};
use crate::integrations::TaskBackend;
use crate::loader::load_tasklist;
use crate::room_index::RoomIndex;
use crate::storage::RoomSettings;
use crate::task::{render_full, render_summary, Rendered, TaskRecord};

pub const COMMAND_WORD: &str = "!googletasks";
pub const NOT_SET_UP: &str = "Google tasklist not set up for this bot.";
pub const NOTHING_TO_DO: &str = "Nothing to do! 😙";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Every task of the room's lists
    ListAll,
    /// Tasks due up to now
    Today,
    /// Names of the lists associated with the room
    ListRoom,
    /// Lists that could still be associated
    ListAvailable,
    Add(String),
    Del(String),
    Show(String),
    Help,
    Unknown,
}

impl Command {
    /// Parse a message body such as `!googletasks show 3`.
    ///
    /// The first word is the command word and is ignored; list names may
    /// contain spaces.
    pub fn parse(body: &str) -> Self {
        let args: Vec<&str> = body.split_whitespace().skip(1).collect();
        match args.as_slice() {
            [] => Command::ListAll,
            ["today"] => Command::Today,
            ["list"] => Command::ListRoom,
            ["listavailable"] => Command::ListAvailable,
            ["help"] => Command::Help,
            ["add", name @ ..] if !name.is_empty() => Command::Add(name.join(" ")),
            ["del", name @ ..] if !name.is_empty() => Command::Del(name.join(" ")),
            ["show", index, ..] => Command::Show(index.to_string()),
            _ => Command::Unknown,
        }
    }

    /// Whether `body` is addressed to the bot: its first word is exactly
    /// [`COMMAND_WORD`].
    pub fn is_addressed(body: &str) -> bool {
        body.split_whitespace().next() == Some(COMMAND_WORD)
    }

    /// Whether only room admins may run the command.
    pub fn requires_admin(&self) -> bool {
        matches!(self, Command::Add(_) | Command::Del(_))
    }
}

/// What the module wants sent back to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Html(Rendered),
}

impl Reply {
    /// Plain-text form, for transports without markup.
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Html(rendered) => &rendered.text,
        }
    }
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub reply: Option<Reply>,
    /// The caller must persist the room settings
    pub settings_changed: bool,
}

impl Response {
    fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Some(Reply::Text(text.into())),
            settings_changed: false,
        }
    }

    fn html(rendered: Option<Rendered>) -> Self {
        Self {
            reply: rendered.map(Reply::Html),
            settings_changed: false,
        }
    }

    fn changed(text: impl Into<String>) -> Self {
        Self {
            reply: Some(Reply::Text(text.into())),
            settings_changed: true,
        }
    }
}

/// Numbered rendering of one or more task lists.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub rendered: Rendered,
    /// Top-level entries in numbering order (entry `n` is `entries[n - 1]`)
    pub entries: Vec<TaskRecord>,
}

/// Who sent a message, and where.
#[derive(Debug, Clone, Copy)]
pub struct Sender<'a> {
    pub room_id: &'a str,
    pub is_admin: bool,
}

pub struct TasksModule {
    backend: Option<Box<dyn TaskBackend>>,
    room_index: RoomIndex,
    show_completed: bool,
}

impl TasksModule {
    /// A module without backend answers every command with [`NOT_SET_UP`].
    pub fn new(backend: Option<Box<dyn TaskBackend>>) -> Self {
        Self {
            backend,
            room_index: RoomIndex::new(),
            show_completed: false,
        }
    }

    /// List completed tasks instead of open ones.
    pub fn with_show_completed(mut self, show_completed: bool) -> Self {
        self.show_completed = show_completed;
        self
    }

    pub fn is_set_up(&self) -> bool {
        self.backend.is_some()
    }

    pub fn room_index(&self) -> &RoomIndex {
        &self.room_index
    }

    /// Handle one chat message.
    pub fn handle(
        &mut self,
        settings: &mut RoomSettings,
        sender: Sender<'_>,
        body: &str,
        now: DateTime<Utc>,
    ) -> Response {
        if self.backend.is_none() {
            return Response::text(NOT_SET_UP);
        }

        let command = Command::parse(body);
        if command.requires_admin() && !sender.is_admin {
            return Response::text(user_message(&CoreError::PermissionDenied(
                "only room admins can change task lists".to_string(),
            )));
        }

        let room_id = sender.room_id;
        match command {
            Command::ListAll => {
                let lists = settings.lists_for(room_id).to_vec();
                Response::html(self.list_for_room(room_id, &lists, None, true, now))
            }
            Command::Today => {
                let lists = settings.lists_for(room_id).to_vec();
                Response::html(self.list_for_room(room_id, &lists, Some(now), true, now))
            }
            Command::ListRoom => Response::text(format!(
                "Tasklists in this room: {}",
                describe_lists(settings.lists_for(room_id))
            )),
            Command::ListAvailable => match self.available_tasklists(settings, room_id) {
                Ok(names) => {
                    let mut text = "Available tasklists: \n".to_string();
                    for name in names {
                        text.push_str(&format!(" - {name}\n"));
                    }
                    Response::text(text)
                }
                Err(e) => Response::text(user_message(&e)),
            },
            Command::Add(name) => match self.add_tasklist(settings, room_id, &name) {
                Ok(true) => Response::changed("Added new google tasklist to this room"),
                Ok(false) => Response::text("This google tasklist already added in this room!"),
                Err(CoreError::NotFound(_)) => Response::text("This google tasklist does not exist!"),
                Err(e) => Response::text(user_message(&e)),
            },
            Command::Del(name) => {
                tracing::info!(tasklist = %name, room = %room_id, "removing tasklist from room");
                if settings.remove(room_id, &name) {
                    Response::changed("Removed google tasklist from this room")
                } else {
                    Response::text("This google tasklist is not associated with this room.")
                }
            }
            Command::Show(token) => match self.render_task_detail(room_id, &token, now) {
                Ok(rendered) => Response::html(Some(rendered)),
                Err(e) => Response::text(show_error_message(&e, &token)),
            },
            Command::Help => Response::text(long_help(sender.is_admin)),
            Command::Unknown => Response::text("Unknown command"),
        }
    }

    /// Render the named lists and number their top-level entries.
    ///
    /// With `until`, only top-level entries due at or before it are kept.
    /// A list that cannot be fetched renders as empty; the others still
    /// render. Lists without entries are left out unless `show_empty`.
    pub fn render_list(
        &self,
        list_names: &[String],
        until: Option<DateTime<Utc>>,
        show_empty: bool,
        now: DateTime<Utc>,
    ) -> Listing {
        let mut listing = Listing::default();
        let Some(backend) = self.backend.as_deref() else {
            return listing;
        };

        for name in list_names {
            tracing::info!(tasklist = %name, "listing tasks");
            let tree = match load_tasklist(backend, name, self.show_completed) {
                Ok(Some(tree)) => Some(tree),
                Ok(None) => {
                    tracing::warn!(tasklist = %name, "task list not found upstream");
                    None
                }
                Err(e) => {
                    tracing::error!(tasklist = %name, error = %e, "failed to load task list");
                    None
                }
            };

            let mut section = Rendered::new(format!("<h4>{name}</h4>\n"), format!("{name}\n"));
            let mut shown = 0;
            if let Some(tree) = &tree {
                for node in tree.top_level() {
                    let record = tree.record(node);
                    if !due_by(record, until) {
                        continue;
                    }

                    listing.entries.push(record.clone());
                    let number = format!("{} - ", listing.entries.len());
                    section.push_str(&number, &number);
                    section.push(&render_summary(tree, node, 0, now));
                    shown += 1;
                }
            }

            if shown == 0 {
                section.push_str(NOTHING_TO_DO, &format!("{NOTHING_TO_DO}\n"));
            }
            if shown > 0 || show_empty {
                listing.rendered.push(&section);
            }
        }

        listing
    }

    /// Render lists into a room and replace the room snapshot.
    ///
    /// Returns `None`, leaving the previous snapshot in place, when there is
    /// nothing to send.
    pub fn list_for_room(
        &mut self,
        room_id: &str,
        list_names: &[String],
        until: Option<DateTime<Utc>>,
        show_empty: bool,
        now: DateTime<Utc>,
    ) -> Option<Rendered> {
        tracing::info!(room = %room_id, lists = list_names.len(), "rendering task lists");
        let listing = self.render_list(list_names, until, show_empty, now);
        if listing.rendered.is_empty() {
            return None;
        }

        self.room_index.set(room_id, listing.entries);
        Some(listing.rendered)
    }

    /// Detail view of entry `token` of the room's last listing.
    pub fn render_task_detail(&self, room_id: &str, token: &str, now: DateTime<Utc>) -> Result<Rendered> {
        let task = self.room_index.get(room_id, token)?;
        Ok(render_full(task, now))
    }

    /// Associate a list with a room after checking it exists upstream.
    ///
    /// Returns `Ok(false)` if the list was already associated.
    pub fn add_tasklist(&self, settings: &mut RoomSettings, room_id: &str, name: &str) -> Result<bool> {
        tracing::info!(tasklist = %name, room = %room_id, "adding tasklist to room");
        if settings.contains(room_id, name) {
            return Ok(false);
        }

        self.backend()?.require_tasklist(name)?;
        Ok(settings.add(room_id, name))
    }

    /// Titles of upstream lists not yet associated with the room.
    pub fn available_tasklists(&self, settings: &RoomSettings, room_id: &str) -> Result<Vec<String>> {
        Ok(self
            .backend()?
            .list_tasklists()?
            .into_iter()
            .map(|tasklist| tasklist.title)
            .filter(|title| !settings.contains(room_id, title))
            .collect())
    }

    fn backend(&self) -> Result<&dyn TaskBackend> {
        self.backend
            .as_deref()
            .ok_or_else(|| CoreError::NotFound("task backend".to_string()))
    }
}

fn due_by(task: &TaskRecord, until: Option<DateTime<Utc>>) -> bool {
    match until {
        None => true,
        Some(until) => task.due.is_some_and(|due| due <= until),
    }
}

fn describe_lists(lists: &[String]) -> String {
    if lists.is_empty() {
        "none".to_string()
    } else {
        lists.join(", ")
    }
}

fn show_error_message(err: &CoreError, token: &str) -> String {
    match err {
        CoreError::InvalidInput(_) => format!(
            "'{token}' is not a valid index.\nUsage {COMMAND_WORD} show <idx (integer)>"
        ),
        CoreError::NotFound(_) => {
            "No task list has been displayed in this room. First display task lists.".to_string()
        }
        CoreError::OutOfRange { len, .. } => {
            format!("Invalid index. Expected index from 1 to {len}")
        }
        other => user_message(other),
    }
}

/// Plain-text wording of an error for the room.
pub fn user_message(err: &CoreError) -> String {
    match err {
        CoreError::PermissionDenied(_) => "Only room admins can change task lists.".to_string(),
        CoreError::Backend { .. } => "Could not reach Google Tasks, try again later.".to_string(),
        other => other.to_string(),
    }
}

pub fn help() -> String {
    "Google tasklist. today = list today's tasks. (Available commands: today, list, listavailable, show, add, del)"
        .to_string()
}

pub fn long_help(is_admin: bool) -> String {
    let mut text = help();
    text.push_str(&format!(
        "\n- \"{COMMAND_WORD}\": list tasks of every tasklist associated to current room\
         \n- \"{COMMAND_WORD} list\": list tasklists associated to current room\
         \n- \"{COMMAND_WORD} listavailable\": list available tasklists for current room (omit already associated)\
         \n- \"{COMMAND_WORD} today\": list today tasks for every associated tasklist\
         \n- \"{COMMAND_WORD} show <n>\": show details of task <n> of the last list"
    ));
    if is_admin {
        text.push_str(&format!(
            "\n- \"{COMMAND_WORD} add <tasklist name>\": associate the tasklist to the room\
             \n- \"{COMMAND_WORD} del <tasklist name>\": de-associate the tasklist to the room"
        ));
    }
    text.push_str(
        "\n\nEvery weekday at 7:30am the bot sends a digest with tasks due today and overdue tasks for all rooms having associated tasklists",
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("!googletasks"), Command::ListAll);
        assert_eq!(Command::parse("!googletasks today"), Command::Today);
        assert_eq!(Command::parse("!googletasks list"), Command::ListRoom);
        assert_eq!(Command::parse("!googletasks listavailable"), Command::ListAvailable);
        assert_eq!(Command::parse("!googletasks show 2"), Command::Show("2".to_string()));
        assert_eq!(
            Command::parse("!googletasks add  Weekly   chores "),
            Command::Add("Weekly chores".to_string())
        );
        assert_eq!(Command::parse("!googletasks del Home"), Command::Del("Home".to_string()));
        assert_eq!(Command::parse("!googletasks help"), Command::Help);
    }

    #[test]
    fn unknown_or_incomplete_commands() {
        assert_eq!(Command::parse("!googletasks frobnicate"), Command::Unknown);
        assert_eq!(Command::parse("!googletasks add"), Command::Unknown);
        assert_eq!(Command::parse("!googletasks show"), Command::Unknown);
    }

    #[test]
    fn show_ignores_trailing_words() {
        assert_eq!(Command::parse("!googletasks show 1 2"), Command::Show("1".to_string()));
        assert_eq!(Command::parse("!googletasks show 3 please"), Command::Show("3".to_string()));
    }

    #[test]
    fn only_exact_command_word_is_addressed() {
        assert!(Command::is_addressed("!googletasks"));
        assert!(Command::is_addressed("  !googletasks today"));
        assert!(!Command::is_addressed("!googletasksfoo"));
        assert!(!Command::is_addressed("!googletasksfoo today"));
        assert!(!Command::is_addressed("hello !googletasks"));
        assert!(!Command::is_addressed(""));
    }

    #[test]
    fn only_add_and_del_need_admin() {
        assert!(Command::Add("x".into()).requires_admin());
        assert!(Command::Del("x".into()).requires_admin());
        assert!(!Command::Show("1".into()).requires_admin());
        assert!(!Command::ListAll.requires_admin());
    }

    #[test]
    fn module_without_backend_is_not_set_up() {
        let mut module = TasksModule::new(None);
        let mut settings = RoomSettings::new();
        let response = module.handle(
            &mut settings,
            Sender { room_id: "r", is_admin: true },
            "!googletasks today",
            Utc::now(),
        );
        assert_eq!(response.reply, Some(Reply::Text(NOT_SET_UP.to_string())));
        assert!(!response.settings_changed);
    }

    #[test]
    fn admin_commands_only_listed_for_admins() {
        assert!(long_help(true).contains("add <tasklist name>"));
        assert!(!long_help(false).contains("add <tasklist name>"));
    }

    #[test]
    fn show_errors_are_worded_for_the_room() {
        assert_eq!(
            show_error_message(&CoreError::OutOfRange { index: 5, len: 3 }, "5"),
            "Invalid index. Expected index from 1 to 3"
        );
        assert!(show_error_message(&CoreError::InvalidInput("x".into()), "x").starts_with("'x' is not a valid index."));
        assert!(show_error_message(&CoreError::NotFound("room".into()), "1").starts_with("No task list"));
    }
}
