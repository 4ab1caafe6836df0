use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "trolley-track")]
#[command(version, about = "Trolley and process tracker for the textile mill floor")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    pub yes: bool,

    /// Tracker server base URL. Overrides trolley.toml.
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a trolley and fill in its fabric details
    Attach,
    /// Show everything known about a trolley or process barcode
    Lookup {
        /// Barcode to look up. Prompts when omitted.
        barcode: Option<String>,
    },
    /// Connect a trolley to the input or output side of a process
    Link,
    /// Browse the tracking history
    History {
        /// Match customer, lot, quality, barcodes or ID
        #[arg(long)]
        search: Option<String>,

        /// Only entries created on this UTC day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Page to show first
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print one page and exit instead of paging interactively
        #[arg(long)]
        no_interactive: bool,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: Option<UsersCommands>,
    },
    /// View or change application settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Log in and remember the user locally
    Login {
        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },
    /// Change the password of a role
    ResetPassword {
        #[arg(long)]
        role: Option<String>,
    },
    /// Forget the stored user
    Logout,
    /// Show or validate trolley.toml
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum UsersCommands {
    /// Print the user list once
    List,
    /// Keep the user list on screen, refreshing it periodically
    Watch,
    Activate { id: i64 },
    Deactivate { id: i64 },
    Delete { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand, Clone)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Change company name and/or timezone
    Set {
        #[arg(long)]
        company_name: Option<String>,

        #[arg(long)]
        timezone: Option<String>,
    },
    /// Turn maintenance mode on or off
    Maintenance { state: Toggle },
    /// Edit settings interactively
    Edit,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default trolley.toml file
    Init,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "trolley_track=debug,info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // Already shown to the user as a notice.
        Err(e) if e.is::<cmd::Reported>() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let ctx = cmd::Context::new(&project_dir, cli)?;
    match &cli.command {
        Commands::Attach => cmd::cmd_attach(&ctx).await?,
        Commands::Lookup { barcode } => cmd::cmd_lookup(&ctx, barcode.as_deref()).await?,
        Commands::Link => cmd::cmd_link(&ctx).await?,
        Commands::History {
            search,
            date,
            page,
            no_interactive,
        } => cmd::cmd_history(&ctx, search.as_deref(), *date, *page, !*no_interactive).await?,
        Commands::Users { command } => cmd::cmd_users(&ctx, command.clone()).await?,
        Commands::Settings { command } => cmd::cmd_settings(&ctx, command.clone()).await?,
        Commands::Login { role, name } => cmd::cmd_login(&ctx, role.as_deref(), name.as_deref()).await?,
        Commands::ResetPassword { role } => cmd::cmd_reset_password(&ctx, role.as_deref()).await?,
        Commands::Logout => cmd::cmd_logout(&ctx)?,
        Commands::Config { command } => cmd::cmd_config(&ctx, command.clone())?,
    }

    Ok(())
}
