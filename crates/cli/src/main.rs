use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use trackreg_core::AccountId;
use trackreg_engine::logging::{LoggingConfig, init_logging};
use trackreg_engine::{
    Anonymous, Registry, RegistryConfig, SettingsForm, SignedIn, SubmissionOutcome,
};
use trackreg_storage::{Listing, SqliteStorage};

#[derive(Parser, Debug)]
#[command(name = "trackreg")]
#[command(about = "Manage analytics tracking accounts")]
#[command(version)]
struct Cli {
    /// SQLite database holding accounts and settings
    #[arg(long, env = "TRACKREG_DATABASE", default_value = "trackreg.db")]
    database: PathBuf,

    /// TOML configuration file
    #[arg(long, env = "TRACKREG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered accounts
    Accounts {
        #[arg(long)]
        json: bool,
    },
    /// Register a new account
    Add {
        #[arg(long)]
        portfolio: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        analytics_id: String,
    },
    /// Make an account current
    Select { id: AccountId },
    /// Print the page tracking snippet
    Snippet {
        /// Email of the signed-in user
        #[arg(long)]
        identity: Option<String>,
    },
    /// Print the settings section markup
    Settings,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    let base = match path {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    Ok(base.with_overrides(|key| std::env::var(key).ok())?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("logging disabled: {e}");
    }

    let config = load_config(cli.config.as_deref())?;
    let storage = SqliteStorage::open(&cli.database.to_string_lossy())
        .with_context(|| format!("opening {}", cli.database.display()))?;
    let mut registry = Registry::open(storage, config)?;
    if registry.is_degraded() {
        tracing::warn!("account table unavailable, showing no accounts");
    }

    match cli.command {
        Command::Accounts { json } => {
            let listing = registry.accounts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(listing.accounts())?);
                return Ok(());
            }
            match listing {
                Listing::NoAccounts => println!("{}", trackreg_engine::render::NO_ACCOUNTS_MESSAGE),
                Listing::Accounts(accounts) => {
                    let selected = registry.resolve_current()?.selected;
                    for account in accounts {
                        let marker = if selected == Some(account.id) { "*" } else { " " };
                        println!(
                            "{marker} {:>4}  {:<24} {:<32} {}",
                            account.id, account.portfolio, account.email, account.analytics_id
                        );
                    }
                }
            }
        }
        Command::Add {
            portfolio,
            email,
            analytics_id,
        } => match registry.submit(SettingsForm::new_account(portfolio, email, analytics_id))? {
            SubmissionOutcome::Inserted(id) => println!("added account {id}"),
            SubmissionOutcome::Idle => bail!("all three fields are required"),
            SubmissionOutcome::Unavailable => bail!("account table unavailable"),
            SubmissionOutcome::Rejected(_) | SubmissionOutcome::StoreFailed(_) => {
                for notice in registry.notices() {
                    eprintln!("{}", notice.message);
                }
                bail!("account not added");
            }
        },
        Command::Select { id } => {
            let account = registry.account(id)?;
            registry.select_current(id)?;
            println!("current account is {} ({})", account.id, account.analytics_id);
        }
        Command::Snippet { identity } => {
            let out = match identity {
                Some(email) => registry.tracking_output(&SignedIn(email)),
                None => registry.tracking_output(&Anonymous),
            };
            println!("{out}");
        }
        Command::Settings => print!("{}", registry.settings_section()),
    }
    Ok(())
}
