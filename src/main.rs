use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_client::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Register {
            username,
            email,
            password,
        } => cli::commands::register(&username, &email, password).await,
        Commands::Login { username, password } => {
            cli::commands::login(&username, password).await
        }
        Commands::Logout => cli::commands::logout().await,
        Commands::Refresh => cli::commands::refresh().await,
        Commands::Whoami { format } => cli::commands::whoami(format).await,
        Commands::Open { path } => cli::commands::open(&path).await,
        Commands::Todos { action } => cli::commands::todos(action).await,
        Commands::Sign {
            id,
            strokes,
            output,
        } => cli::commands::sign(id, &strokes, output).await,
    }
}
