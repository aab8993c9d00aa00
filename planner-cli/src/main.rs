mod commands;
mod config;
mod render;
mod store;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use planner_core::Window;
use planner_core::window::{parse_bound, start_of_day};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::PlannerConfig;
use crate::store::EventStore;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Expand your planner's events, including recurring ones, into calendar occurrences")]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Events file to use instead of the one in config.toml
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List occurrences in a date window
    Expand {
        /// Window start (YYYY-MM-DD or YYYY-MM-DDTHH:MM), defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD or YYYY-MM-DDTHH:MM), defaults to default_span_days after --from
        #[arg(long)]
        to: Option<String>,

        /// Sort occurrences of all events by start time
        #[arg(short, long)]
        sorted: bool,

        /// Print occurrences as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the next occurrence of an event
    Next {
        /// Event id or occurrence id
        id: String,

        /// Look after this instant instead of now
        #[arg(long)]
        after: Option<String>,
    },
    /// Show the stored event behind an occurrence id
    Resolve {
        id: String,
    },
    /// Validate all stored events and their recurrence rules
    Check,
    /// Cancel a single occurrence of a recurring event
    Cancel {
        /// Occurrence id, e.g. "standup_12"
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let cfg = PlannerConfig::load()?;
    let store = EventStore::open(cli.events.unwrap_or_else(|| cfg.events_path()));
    let now = Local::now().naive_local();
    let today = now.date();

    match cli.command {
        Commands::Expand {
            from,
            to,
            sorted,
            json,
        } => {
            let window =
                Window::from_args(from.as_deref(), to.as_deref(), today, cfg.default_span_days)?;
            let events = store.load()?;
            commands::expand::run(&events, window, sorted || cfg.sort, json, today)
        }
        Commands::Next { id, after } => {
            let after = match after {
                Some(s) => parse_bound(&s, start_of_day)?,
                None => now,
            };
            let events = store.load()?;
            commands::next::run(&events, &id, after)
        }
        Commands::Resolve { id } => {
            let events = store.load()?;
            commands::resolve::run(&events, &id)
        }
        Commands::Check => {
            let events = store.load()?;
            commands::check::run(&events)
        }
        Commands::Cancel { id } => commands::cancel::run(&store, &id),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
