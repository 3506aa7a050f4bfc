use chrono::{Local, Utc};
use clap::Args;
use roomtasks_core::digest::is_digest_due;
use roomtasks_core::module::NOT_SET_UP;
use roomtasks_core::Config;

use super::tasks_module;

#[derive(Args)]
pub struct DigestArgs {
    /// Render even outside the configured digest minute
    #[arg(long)]
    force: bool,
    /// Print markup instead of plain text
    #[arg(long)]
    html: bool,
}

pub fn run(args: DigestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if !args.force && !is_digest_due(Local::now().naive_local(), &config.digest) {
        println!("digest not due");
        return Ok(());
    }

    let mut module = tasks_module(&config)?;
    if !module.is_set_up() {
        return Err(NOT_SET_UP.into());
    }

    for digest in module.digest(&config.rooms, Utc::now()) {
        println!("== {} ==", digest.room_id);
        if args.html {
            println!("{}", digest.rendered.html);
        } else {
            println!("{}", digest.rendered.text);
        }
    }
    Ok(())
}
