//! Room to task-list association commands.

use clap::Subcommand;
use roomtasks_core::module::NOT_SET_UP;
use roomtasks_core::Config;

use super::tasks_module;

#[derive(Subcommand)]
pub enum RoomsAction {
    /// Show associated task lists
    List {
        /// Only this room
        #[arg(long)]
        room: Option<String>,
    },
    /// Associate an existing Google task list with a room
    Add {
        room: String,
        /// Task list title
        tasklist: String,
    },
    /// Remove an association
    Del {
        room: String,
        /// Task list title
        tasklist: String,
    },
}

pub fn run(action: RoomsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    match action {
        RoomsAction::List { room } => {
            let rooms: Vec<String> = match room {
                Some(room) => vec![room],
                None => config.rooms.rooms().map(str::to_string).collect(),
            };
            if rooms.is_empty() {
                println!("No rooms have task lists.");
            }
            for room in rooms {
                println!("{room}: {}", config.rooms.lists_for(&room).join(", "));
            }
        }
        RoomsAction::Add { room, tasklist } => {
            let module = tasks_module(&config)?;
            if !module.is_set_up() {
                return Err(NOT_SET_UP.into());
            }
            if module.add_tasklist(&mut config.rooms, &room, &tasklist)? {
                config.save()?;
                println!("Added '{tasklist}' to {room}");
            } else {
                println!("'{tasklist}' is already associated with {room}");
            }
        }
        RoomsAction::Del { room, tasklist } => {
            if !config.rooms.remove(&room, &tasklist) {
                return Err(format!("'{tasklist}' is not associated with {room}").into());
            }
            config.save()?;
            println!("Removed '{tasklist}' from {room}");
        }
    }
    Ok(())
}
