//! Batchbook bridge CLI entry point.
//!
//! Provides `validate`, `ticket` and `lookup` subcommands for checking
//! settings, replaying a ticket event, or looking up a single requester.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use batchbook_bridge::adapter::{Adapter, Resolution};
use batchbook_bridge::batchbook::BatchbookClient;
use batchbook_bridge::config::{load_config, Settings};
use batchbook_bridge::helpdesk::TicketEvent;
use batchbook_bridge::http::{HttpClient, ReqwestHttpClient};
use batchbook_bridge::render::person_details_html;
use batchbook_bridge::validate::ValidationErrors;
use batchbook_bridge::{logging, validate};

/// Batchbook bridge: log helpdesk tickets in Batchbook.
#[derive(Parser)]
#[command(name = "batchbook-bridge", version, about)]
struct Cli {
    /// Path to the TOML config file with a `[batchbook]` table.
    #[arg(long, global = true, default_value = "batchbook.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Check the settings and probe Batchbook with them.
    Validate,
    /// Handle a ticket event read from a JSON file.
    Ticket {
        /// Path to the ticket event JSON.
        #[arg(long)]
        event: PathBuf,
    },
    /// Look up a contact by email.
    Lookup {
        /// Requester email address.
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_cli(cli.json_logs);

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    match cli.command {
        Command::Validate => handle_validate(&cli.config, http).await,
        Command::Ticket { event } => handle_ticket(&cli.config, &event, http).await,
        Command::Lookup { email } => handle_lookup(&cli.config, &email, http).await,
    }
}

/// Validate settings; exits non-zero with one line per failing field.
async fn handle_validate(config_path: &Path, http: Arc<dyn HttpClient>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    match validate::validate(&config.batchbook, http).await {
        Ok(()) => {
            println!("settings ok");
            Ok(())
        }
        Err(errors) => Err(report(errors)),
    }
}

/// Reject blank required settings before any outbound call.
fn require_settings(settings: &Settings) -> anyhow::Result<()> {
    validate::check_required(settings).map_err(report)
}

/// Print one `field: message` line per failure and turn them into an error.
fn report(errors: ValidationErrors) -> anyhow::Error {
    for (field, message) in errors.iter() {
        println!("{field}: {message}");
    }
    errors.into()
}

/// Run the ticket-created flow for one event file.
async fn handle_ticket(
    config_path: &Path,
    event_path: &Path,
    http: Arc<dyn HttpClient>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    require_settings(&config.batchbook)?;
    let raw = std::fs::read_to_string(event_path)
        .with_context(|| format!("failed to read event at {}", event_path.display()))?;
    let event: TicketEvent = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse event at {}", event_path.display()))?;

    let adapter = Adapter::new(config.batchbook, http);
    let outcome = adapter
        .on_ticket_created(&event)
        .await
        .with_context(|| format!("failed to handle ticket {}", event.ticket.id))?;

    if outcome.resolution == Resolution::Skipped {
        info!(ticket_id = event.ticket.id, "nothing logged");
        return Ok(());
    }
    println!("{}", outcome.html);
    Ok(())
}

/// Print the details of the contact matching `email`.
async fn handle_lookup(
    config_path: &Path,
    email: &str,
    http: Arc<dyn HttpClient>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    require_settings(&config.batchbook)?;
    let client = BatchbookClient::new(config.batchbook, http);
    match client.find_person(email).await? {
        Some(person) => println!(
            "{}",
            person_details_html(&client.settings().subdomain, &person)
        ),
        None => println!("no batchbook contact for {email}"),
    }
    Ok(())
}
