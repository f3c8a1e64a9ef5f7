//! CLI interface for the todo client

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "todo-client")]
#[command(version)]
#[command(about = "Manage your todos from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new todoclient.toml configuration file
    Init,

    /// Create an account and sign in
    Register {
        username: String,

        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "TODO_PASSWORD")]
        password: Option<String>,
    },

    /// Sign in
    Login {
        username: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "TODO_PASSWORD")]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Exchange the current token for a fresh one
    Refresh,

    /// Show the current user, permissions and token lifetime
    Whoami {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve a route through the guards and show where it leads
    Open {
        /// e.g. /todos, /admin, /login
        path: String,
    },

    /// Manage todos
    Todos {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Sign a todo with recorded strokes and download the signed PDF
    Sign {
        /// Todo id
        id: i64,

        /// JSON file with an array of strokes, each an array of {"x", "y"} points
        #[arg(short, long)]
        strokes: PathBuf,

        /// Where to write the PDF (defaults to the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TodoAction {
    /// List one page of todos
    List {
        #[arg(short, long, default_value = "0")]
        page: u32,

        /// Defaults to the configured page size
        #[arg(short, long)]
        size: Option<u32>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one todo
    Get {
        id: i64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a todo
    Create {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Mark as already completed
        #[arg(long)]
        completed: bool,
    },

    /// Edit a todo
    Update {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        completed: Option<bool>,
    },

    /// Delete a todo
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Pull todos from the upstream source (admin only)
    Sync,

    /// List users known to the backend
    Users {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Download a todo as PDF
    Pdf {
        id: i64,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the user list as PDF
    UsersPdf {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
