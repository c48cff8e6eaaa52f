use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod core;
mod daemon;
mod providers;

#[derive(Parser)]
#[command(name = "delivery-bar")]
#[command(author, version, about = "Linux tray daemon that tracks your active food delivery order")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the polling daemon
    Daemon,

    /// Fetch the current order status once
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trigger daemon refresh via D-Bus
    Refresh,

    /// Stop the daemon via D-Bus
    Quit,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(journald: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let journald_layer = if journald {
        tracing_journald::layer().ok()
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(journald_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => {
            init_logging(true);
            daemon::run().await
        }
        Commands::Status { json } => {
            init_logging(false);
            cli::status::run(json).await
        }
        Commands::Refresh => {
            init_logging(false);
            cli::control::refresh().await
        }
        Commands::Quit => {
            init_logging(false);
            cli::control::quit().await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
