use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "roomtasks", version, about = "Google Tasks lists for chat rooms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat messages from stdin and answer them
    Chat(commands::chat::ChatArgs),
    /// Send a single chat message
    Send(commands::chat::SendArgs),
    /// Room to task-list associations
    Rooms {
        #[command(subcommand)]
        action: commands::rooms::RoomsAction,
    },
    /// Task mutations on a Google task list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Render the morning digest for every room
    Digest(commands::digest::DigestArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chat(args) => commands::chat::run_chat(args),
        Commands::Send(args) => commands::chat::run_send(args),
        Commands::Rooms { action } => commands::rooms::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Digest(args) => commands::digest::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
