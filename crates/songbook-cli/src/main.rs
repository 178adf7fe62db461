use anyhow::Result;
use clap::Parser;
use songbook_api::Config;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "songbook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Run the HTTP server
    ///
    /// Serves the song catalog over REST:
    ///
    /// - GET    /songs/       list songs (filters: group, artist, album, song,
    ///   release; paging: page, pageSize)
    /// - GET    /songs/{id}   one verse of a song's lyrics (verse, limit)
    /// - POST   /songs/       add a song, fetching its details from Genius
    /// - PUT    /songs/{id}   update group, song, album and lyrics
    /// - DELETE /songs/{id}   delete a song
    ///
    /// Adding songs needs a Genius API token (SONGBOOK_LYRICS_API_TOKEN or
    /// lyrics_api_token in the config file). Stops cleanly on Ctrl-C.
    Serve {
        /// Address to listen on (default: 0.0.0.0:9000)
        #[arg(long)]
        listen: Option<String>,

        /// Path to the database (default: ~/.local/share/songbook/songbook.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Serve { listen, db } => {
            let mut config = config;
            if let Some(listen) = listen {
                config = config.with_listen_addr(listen);
            }
            if let Some(db) = db {
                config = config.with_database_path(db);
            }
            commands::run_serve(config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config),
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
