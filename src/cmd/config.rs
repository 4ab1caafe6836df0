//! Configuration view and validation commands — `trolley-track config`.

use anyhow::Result;

use trolley_track::config::{SERVER_URL_ENV, TrackerToml};

use super::super::ConfigCommands;
use super::Context;

fn print_toml(toml: &TrackerToml) {
    println!("[server]");
    println!("  base_url = \"{}\"", toml.server.base_url);
    match toml.server.timeout_secs {
        Some(secs) => println!("  timeout_secs = {}", secs),
        None => println!("  timeout_secs = (none)"),
    }
    println!();
    println!("[ui]");
    println!("  toast_secs = {}", toml.ui.toast_secs);
    println!("  reset_delay_secs = {}", toml.ui.reset_delay_secs);
    println!();
    println!("[history]");
    println!("  page_size = {}", toml.history.page_size);
    println!();
    println!("[users]");
    println!("  poll_interval_secs = {}", toml.users.poll_interval_secs);
    println!();
    println!("[linker]");
    println!("  reclassify = {}", toml.linker.reclassify);
    println!();
}

pub fn cmd_config(ctx: &Context, command: Option<ConfigCommands>) -> Result<()> {
    let config = &ctx.config;
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Trolley Tracker Configuration");
            println!("=============================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No trolley.toml found at {}", config_path.display());
                println!("Using default configuration:");
            }
            println!();
            print_toml(&config.toml);

            println!("Effective values (with env/CLI overrides):");
            println!("  server_url = \"{}\"", config.server_url());
            println!("  session_file = \"{}\"", config.session_file().display());
            println!();

            if !config_path.exists() {
                println!("Run 'trolley-track config init' to create a trolley.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let mut warnings = config.validate();
            if config.server_url() != config.toml.server.base_url
                && let Err(e) = reqwest::Url::parse(config.server_url())
            {
                warnings.push(format!(
                    "Invalid server URL from --server-url or {}: {}",
                    SERVER_URL_ENV, e
                ));
            }

            if warnings.is_empty() {
                if config_path.exists() {
                    println!("Configuration is valid.");
                } else {
                    println!("No trolley.toml found. Using defaults (valid).");
                }
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("trolley.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            TrackerToml::default().save(&config_path)?;

            println!("Created trolley.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] base_url, timeout_secs");
            println!("  - [history] page_size");
            println!("  - [users] poll_interval_secs");
            println!();
        }
    }

    Ok(())
}
