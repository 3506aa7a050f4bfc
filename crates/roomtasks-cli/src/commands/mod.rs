pub mod chat;
pub mod config;
pub mod digest;
pub mod rooms;
pub mod task;

use std::error::Error;

use roomtasks_core::module::NOT_SET_UP;
use roomtasks_core::{Config, GoogleTasksClient, Reply, TaskBackend, TasksModule};

/// Tasks module wired to the configured Google account. Without an access
/// token the module is returned bare and answers every command accordingly.
pub fn tasks_module(config: &Config) -> Result<TasksModule, Box<dyn Error>> {
    let backend = GoogleTasksClient::from_config(&config.google)?
        .map(|client| Box::new(client) as Box<dyn TaskBackend>);
    Ok(TasksModule::new(backend).with_show_completed(config.google.show_completed))
}

/// Google client for commands that cannot do anything without one.
pub fn google_client(config: &Config) -> Result<GoogleTasksClient, Box<dyn Error>> {
    GoogleTasksClient::from_config(&config.google)?.ok_or_else(|| NOT_SET_UP.into())
}

pub fn print_reply(reply: &Reply, html: bool) {
    match reply {
        Reply::Html(rendered) if html => println!("{}", rendered.html),
        other => println!("{}", other.text()),
    }
}
