//! Terminal chat transport.

use std::io::BufRead;

use chrono::Utc;
use clap::Args;
use roomtasks_core::module::{Command, Sender};
use roomtasks_core::Config;

use super::{print_reply, tasks_module};

#[derive(Args)]
pub struct ChatArgs {
    /// Room the messages are posted in
    #[arg(long)]
    room: String,
    /// Treat the sender as a room admin
    #[arg(long)]
    admin: bool,
    /// Print markup instead of plain text
    #[arg(long)]
    html: bool,
}

#[derive(Args)]
pub struct SendArgs {
    /// Room the message is posted in
    #[arg(long)]
    room: String,
    /// Treat the sender as a room admin
    #[arg(long)]
    admin: bool,
    /// Print markup instead of plain text
    #[arg(long)]
    html: bool,
    /// Message body, e.g. `!googletasks today`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    message: Vec<String>,
}

/// Answer one `!googletasks` message per stdin line until EOF.
///
/// Listings numbered in one message can be referred to with `show <n>` in
/// later ones.
pub fn run_chat(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let mut module = tasks_module(&config)?;
    let sender = Sender {
        room_id: &args.room,
        is_admin: args.admin,
    };
    tracing::info!(room = %args.room, admin = args.admin, "chat session started");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let body = line.trim();
        if !Command::is_addressed(body) {
            continue;
        }

        let response = module.handle(&mut config.rooms, sender, body, Utc::now());
        if let Some(reply) = &response.reply {
            print_reply(reply, args.html);
        }
        if response.settings_changed {
            tracing::debug!(room = %args.room, "saving room settings");
            config.save()?;
        }
    }
    Ok(())
}

pub fn run_send(args: SendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let mut module = tasks_module(&config)?;
    let body = args.message.join(" ");

    let response = module.handle(
        &mut config.rooms,
        Sender {
            room_id: &args.room,
            is_admin: args.admin,
        },
        &body,
        Utc::now(),
    );
    if let Some(reply) = &response.reply {
        print_reply(reply, args.html);
    }
    if response.settings_changed {
        config.save()?;
    }
    Ok(())
}
