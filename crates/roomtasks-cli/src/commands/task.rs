//! Task mutations straight against Google Tasks.

use chrono::NaiveDate;
use clap::Subcommand;
use roomtasks_core::integrations::RawLink;
use roomtasks_core::{Config, NewTask, TaskBackend, TaskUpdate};

use super::google_client;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show every task list of the account
    Lists,
    /// Create a task
    Create {
        /// Task list title
        #[arg(long)]
        list: String,
        /// Task title
        title: String,
        /// Task notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Link to attach (repeatable)
        #[arg(long = "link")]
        links: Vec<String>,
    },
    /// Edit a task, optionally moving it to another list
    Update {
        /// Task list title
        #[arg(long)]
        list: String,
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// New due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Title of the list to move the task to
        #[arg(long)]
        move_to: Option<String>,
    },
    /// Create a task list
    NewList {
        /// Task list title
        title: String,
    },
    /// Flip a task between open and completed
    Toggle {
        /// Task list title
        #[arg(long)]
        list: String,
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task list title
        #[arg(long)]
        list: String,
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = google_client(&config)?;

    match action {
        TaskAction::Lists => {
            for tasklist in client.list_tasklists()? {
                println!("{}\t{}", tasklist.id, tasklist.title);
            }
        }
        TaskAction::Create {
            list,
            title,
            notes,
            due,
            links,
        } => {
            let tasklist = client.require_tasklist(&list)?;
            let links = links
                .into_iter()
                .map(|link| RawLink {
                    kind: "generic".to_string(),
                    description: link.clone(),
                    link,
                })
                .collect();
            let created = client.create_task(
                &tasklist.id,
                &NewTask {
                    title,
                    notes,
                    due,
                    links,
                },
            )?;
            println!("Task created: {}", created.id);
        }
        TaskAction::Update {
            list,
            id,
            title,
            notes,
            due,
            move_to,
        } => {
            let tasklist = client.require_tasklist(&list)?;
            let move_to = match move_to {
                Some(destination) => Some(client.require_tasklist(&destination)?.id),
                None => None,
            };
            let stored = client.update_task(
                &tasklist.id,
                &id,
                &TaskUpdate {
                    title,
                    notes,
                    due,
                    move_to,
                },
            )?;
            println!("Task updated: {}", stored.id);
        }
        TaskAction::NewList { title } => {
            let created = client.create_tasklist(&title)?;
            println!("Task list created: {}\t{}", created.id, created.title);
        }
        TaskAction::Toggle { list, id } => {
            let tasklist = client.require_tasklist(&list)?;
            if client.toggle_completion(&tasklist.id, &id)? {
                println!("Task completed: {id}");
            } else {
                println!("Task reopened: {id}");
            }
        }
        TaskAction::Delete { list, id } => {
            let tasklist = client.require_tasklist(&list)?;
            client.delete_task(&tasklist.id, &id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
