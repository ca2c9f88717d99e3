//! `admin` - manage users through the gateway from a terminal.

use std::io::IsTerminal;
use std::process::ExitCode;

use admin::{render, Controller, HttpUsersApi};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use reqwest::Url;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// User admin console
#[derive(Parser)]
#[command(name = "admin", version, about, long_about = None)]
struct Cli {
    /// Gateway address; API calls go to <BASE_URL>/api
    #[arg(
        long,
        env = "ADMIN_BASE_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    base_url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show users
    List {
        /// Only show users whose name, email, or id contains this text
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Create a user
    Create {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        /// Create the user as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Edit an existing user; omitted fields keep their current value
    Update {
        id: i64,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a user
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", format!("{error:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let api = HttpUsersApi::new(&cli.base_url).context("failed to build http client")?;
    let mut console = Controller::new(api);
    console.load().await;

    match cli.command {
        Commands::List { filter } => {
            if let Some(query) = filter {
                console.state_mut().set_filter(query);
            }
        }

        Commands::Create {
            full_name,
            email,
            inactive,
        } => {
            let form = console.state_mut();
            form.set_full_name(full_name);
            form.set_email(email);
            form.set_active(!inactive);
            console.submit().await;
        }

        Commands::Update {
            id,
            full_name,
            email,
            active,
        } => {
            if console.state().error().is_none() {
                if !console.edit(id) {
                    anyhow::bail!("User #{id} not found");
                }
                let form = console.state_mut();
                if let Some(full_name) = full_name {
                    form.set_full_name(full_name);
                }
                if let Some(email) = email {
                    form.set_email(email);
                }
                if let Some(active) = active {
                    form.set_active(active);
                }
                console.submit().await;
            }
        }

        Commands::Delete { id, yes } => {
            if !yes && !confirm_delete(&console, id)? {
                println!("{}", "Cancelled".dimmed());
                return Ok(ExitCode::SUCCESS);
            }
            console.delete(id).await;
        }
    }

    let state = console.state();
    print!("{}", render::screen(state, std::io::stdout().is_terminal()));

    Ok(if state.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn confirm_delete(console: &Controller<HttpUsersApi>, id: i64) -> Result<bool> {
    let target = match console.state().user(id) {
        Some(user) => format!("user #{id} ({})", user.full_name),
        None => format!("user #{id}"),
    };
    Confirm::new()
        .with_prompt(format!("Delete {target}?"))
        .default(false)
        .interact()
        .context("failed to read confirmation")
}
