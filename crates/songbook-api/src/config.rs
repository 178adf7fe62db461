use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use songbook_lyrics::genius::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use songbook_lyrics::LyricsSettings;
use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9000";

/// Configuration for songbook.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SONGBOOK_* prefix)
/// 3. Config file (~/.config/songbook/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: SONGBOOK_DATABASE_PATH
    /// - Default: ~/.local/share/songbook/songbook.db
    pub database_path: PathBuf,

    /// Address the HTTP server binds to.
    ///
    /// Can be set via:
    /// - CLI: --listen 127.0.0.1:8080
    /// - ENV: SONGBOOK_LISTEN_ADDR
    pub listen_addr: String,

    /// Base URL of the Genius API.
    pub lyrics_api_base_url: String,

    /// Genius API access token, sent as a bearer token.
    ///
    /// Can be set via:
    /// - ENV: SONGBOOK_LYRICS_API_TOKEN
    pub lyrics_api_token: Option<String>,

    /// Per-request timeout for lyrics lookups, in seconds.
    pub lyrics_timeout_secs: u64,

    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            lyrics_api_base_url: DEFAULT_BASE_URL.to_string(),
            lyrics_api_token: None,
            lyrics_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/songbook/config.toml
    /// Reads environment variables with SONGBOOK_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("songbook");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Override the database path (the `--db` flag).
    #[must_use]
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    /// Override the bind address (the `--listen` flag).
    #[must_use]
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Connection settings for the lyrics client.
    pub fn lyrics_settings(&self) -> LyricsSettings {
        LyricsSettings::new(
            self.lyrics_api_base_url.clone(),
            self.lyrics_api_token.clone(),
        )
        .with_timeout(Duration::from_secs(self.lyrics_timeout_secs))
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/songbook/songbook.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("songbook")
        .join("songbook.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/songbook/config.toml
/// - macOS: ~/Library/Application Support/songbook/config.toml
/// - Windows: %APPDATA%\songbook\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("songbook")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Songbook Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SONGBOOK_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database
#
# Can also be set via:
# - CLI: songbook serve --db /custom/path.db
# - Environment: SONGBOOK_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/songbook.db"

# Address the HTTP server listens on
#
# Can also be set via:
# - CLI: songbook serve --listen 127.0.0.1:8080
# - Environment: SONGBOOK_LISTEN_ADDR=127.0.0.1:8080
listen_addr = "0.0.0.0:9000"

# Genius API used to enrich new songs with metadata and lyrics
lyrics_api_base_url = "https://api.genius.com"

# Genius API client access token
#
# Create one at: https://genius.com/api-clients
#
# Can also be set via:
# - Environment: SONGBOOK_LYRICS_API_TOKEN=your-token-here
#lyrics_api_token = "your-genius-token-here"

# Timeout for each request to the lyrics provider, in seconds
lyrics_timeout_secs = 30

# Log filter used when RUST_LOG is not set
log_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
