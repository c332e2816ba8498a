use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shepherd-cli", version, about = "Shepherd CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily goal progress and streaks
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Daily goal
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Favorite teachings
    Favorites {
        #[command(subcommand)]
        action: commands::library::FavoritesAction,
    },
    /// Recently listened teachings, newest first
    History,
    /// Rescue Mode sessions
    Rescue {
        #[command(subcommand)]
        action: commands::rescue::RescueAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Erase all progress, settings and milestone flags
    Wipe,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Favorites { action } => commands::library::run(action),
        Commands::History => commands::library::history(),
        Commands::Rescue { action } => commands::rescue::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Wipe => commands::wipe(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
