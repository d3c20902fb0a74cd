//! Ticket-Link main entry point
//!
//! Command-line host for the ticket link flow: the document is an in-memory
//! buffer printed to stdout, messages go to stderr.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use ticket_link::config::load_config_or_default;
use ticket_link::{insert_ticket_link, BugTracker, LinkFormat, LinkOutcome, TextBuffer};
use tracing_subscriber::EnvFilter;

/// Ticket-Link: paste an osTicket link without opening a browser
///
/// Logs into the configured tracker, looks up the ticket, and prints a link
/// to it followed by its title.
#[derive(Parser, Debug)]
#[command(name = "ticket-link")]
#[command(version)]
#[command(about = "Insert osTicket ticket links", long_about = None)]
struct Cli {
    /// Ticket ID to look up
    #[arg(value_name = "TICKET")]
    ticket: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "TICKET_LINK_CONFIG")]
    config: Option<PathBuf>,

    /// Tracker base URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Login name (overrides the config file)
    #[arg(long)]
    user: Option<String>,

    /// Password (overrides the config file)
    #[arg(long, env = "TICKET_LINK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Tracker page schema (overrides the config file)
    #[arg(long, value_name = "SCHEMA")]
    schema: Option<String>,

    /// Link format to print
    #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
    format: FormatArg,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Markdown,
    Html,
}

impl From<FormatArg> for LinkFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Markdown => LinkFormat::Markdown,
            FormatArg::Html => LinkFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to build default configuration".to_string(),
        }
    })?;

    // Preference overrides go through the same key/value path the host uses
    let overrides = [
        ("url", &cli.url),
        ("user", &cli.user),
        ("password", &cli.password),
        ("schema", &cli.schema),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            config
                .tracker
                .set(key, value)
                .with_context(|| format!("invalid --{} value", key))?;
        }
    }

    tracing::debug!(tracker = ?config.tracker, "configuration ready");

    let mut tracker = BugTracker::from_config(&config);
    let mut buffer = TextBuffer::new(cli.format.into());

    match insert_ticket_link(&mut tracker, &mut buffer, &cli.ticket).await {
        LinkOutcome::Inserted(_) => {
            print!("{}", buffer.content());
            Ok(())
        }
        LinkOutcome::Skipped => {
            tracing::warn!("empty ticket ID, nothing to insert");
            Ok(())
        }
        LinkOutcome::Failed(_) => {
            for message in buffer.messages() {
                eprintln!("{}", message);
            }
            std::process::exit(1);
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ticket_link=warn"),
            1 => EnvFilter::new("ticket_link=info,warn"),
            2 => EnvFilter::new("ticket_link=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
