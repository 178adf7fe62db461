use anyhow::Result;
use songbook_api::config::{self, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() {
            "yes"
        } else {
            "no (using defaults)"
        }
    );

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  listen_addr: {}", config.listen_addr);
    println!("  lyrics_api_base_url: {}", config.lyrics_api_base_url);
    println!(
        "  lyrics_api_token: {}",
        if config.lyrics_api_token.is_some() {
            "<set>"
        } else {
            "<not set>"
        }
    );
    println!("  lyrics_timeout_secs: {}", config.lyrics_timeout_secs);
    println!("  log_level: {}", config.log_level);

    println!("\nPriority: CLI args > ENV vars (SONGBOOK_*) > Config file > Defaults");
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure songbook.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
