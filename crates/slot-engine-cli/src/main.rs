//! `slots` CLI — query availability and validate bookings against a JSON
//! schedule snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Which window applies to a barber on a date, and why
//! slots resolve -i shop.json --date 2026-03-16 --barber ana
//!
//! # Free slots for one barber, or for any barber
//! slots availability -i shop.json --date 2026-03-16 --barber ana
//! slots availability -i shop.json --date 2026-03-16 --any --periods
//!
//! # Validate a booking (exit code 2 when rejected)
//! slots validate -i shop.json --date 2026-03-16 --start 09:00 --service cut --any
//!
//! # Dates with free slots over the next two weeks
//! slots dates -i shop.json --from 2026-03-16 --days 14 --any
//!
//! # Strictly validate the snapshot
//! cat shop.json | slots check
//! ```
//!
//! Logs go to stderr and are controlled with `RUST_LOG`.

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use slot_engine::resolver::{self, DaySources};
use slot_engine::{BarberSelection, ScheduleSnapshot, ServiceRequest, TimeOfDay};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for a booking the engine rejected.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Barbershop slot availability and booking validation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot JSON file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Override the snapshot's slot length in minutes
    #[arg(long, global = true, env = "SLOTS_GRANULARITY")]
    granularity: Option<u32>,
}

#[derive(Args)]
struct SelectionArgs {
    /// Book with a specific barber id
    #[arg(long, conflicts_with = "any")]
    barber: Option<String>,

    /// Book with whichever barber is free
    #[arg(long)]
    any: bool,
}

impl SelectionArgs {
    fn selection(&self) -> BarberSelection {
        match (&self.barber, self.any) {
            (Some(id), _) => BarberSelection::SpecificBarber(id.clone()),
            (None, true) => BarberSelection::AnyBarber,
            (None, false) => BarberSelection::Unselected,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective working window for a date
    Resolve {
        /// Date in YYYY-MM-DD form
        #[arg(long)]
        date: String,
        /// Barber id (shop schedule only if omitted)
        #[arg(long)]
        barber: Option<String>,
    },
    /// List free slots for a date
    Availability {
        #[arg(long)]
        date: String,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print only the morning/afternoon/evening grouping
        #[arg(long)]
        periods: bool,
    },
    /// Validate a booking request
    Validate {
        #[arg(long)]
        date: String,
        /// Start time in HH:MM form
        #[arg(long)]
        start: String,
        /// Service duration in minutes
        #[arg(long, conflicts_with = "service", required_unless_present = "service")]
        duration: Option<u32>,
        /// Service id from the snapshot
        #[arg(long)]
        service: Option<String>,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// List dates that still have free slots
    Dates {
        #[arg(long)]
        from: String,
        #[arg(long, default_value_t = 14)]
        days: u32,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Strictly validate the snapshot's schedules
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slot_engine=warn,slots=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let raw = read_input(cli.input.as_deref())?;
    let mut snapshot = ScheduleSnapshot::from_json(&raw).context("Failed to load snapshot")?;
    if let Some(minutes) = cli.granularity {
        snapshot.config = snapshot.config.with_granularity(minutes);
        snapshot.config.validate().context("Invalid --granularity")?;
    }
    tracing::debug!(
        barbers = snapshot.barbers.len(),
        appointments = snapshot.appointments.len(),
        granularity = snapshot.config.granularity_minutes,
        "snapshot loaded"
    );

    let output = cli.output.as_deref();

    match cli.command {
        Commands::Resolve { date, barber } => {
            let date = slot_engine::parse_date(&date)?;
            let sources = match barber.as_deref() {
                Some(id) => {
                    let barber = snapshot
                        .barbers
                        .iter()
                        .find(|b| b.id == id)
                        .with_context(|| format!("Unknown barber: {}", id))?;
                    DaySources::for_barber(barber, &snapshot.shop)
                }
                None => DaySources::shop_only(&snapshot.shop),
            };
            let resolution = resolver::resolve_day(date, &sources);
            write_json(output, &serde_json::to_value(resolution)?)?;
        }
        Commands::Availability {
            date,
            selection,
            periods,
        } => {
            let date = slot_engine::parse_date(&date)?;
            let booked = snapshot.booked_by_barber(date);
            let day = slot_engine::slots_for_selection(
                date,
                &selection.selection(),
                &snapshot.barbers,
                &snapshot.shop,
                &booked,
                &snapshot.config,
            )?;
            let value = if periods {
                serde_json::to_value(&day.periods)?
            } else {
                serde_json::to_value(&day)?
            };
            write_json(output, &value)?;
        }
        Commands::Validate {
            date,
            start,
            duration,
            service,
            selection,
        } => {
            let date = slot_engine::parse_date(&date)?;
            let start: TimeOfDay = start.parse()?;
            let minutes = match (duration, service.as_deref()) {
                (Some(minutes), _) => minutes,
                (None, Some(id)) => {
                    snapshot
                        .service(id)
                        .with_context(|| format!("Unknown service: {}", id))?
                        .duration_minutes
                }
                (None, None) => anyhow::bail!("Either --duration or --service is required"),
            };
            let request = ServiceRequest::new(minutes)?;
            let booked = snapshot.booked_by_barber(date);

            match slot_engine::validate_booking(
                date,
                &selection.selection(),
                start,
                request,
                &snapshot.barbers,
                &snapshot.shop,
                &booked,
                &snapshot.config,
            ) {
                Ok(assignment) => {
                    tracing::info!(
                        barber = %assignment.barber_id,
                        %date,
                        %start,
                        "booking accepted"
                    );
                    let value = json!({
                        "status": "accepted",
                        "barberId": assignment.barber_id,
                        "date": assignment.date,
                        "run": assignment.run,
                    });
                    write_json(output, &value)?;
                }
                Err(reason) => {
                    tracing::info!(code = reason.code(), %date, %start, "booking rejected");
                    let value = json!({
                        "status": "rejected",
                        "code": reason.code(),
                        "reason": reason.to_string(),
                    });
                    write_json(output, &value)?;
                    process::exit(EXIT_REJECTED);
                }
            }
        }
        Commands::Dates {
            from,
            days,
            selection,
        } => {
            let from = slot_engine::parse_date(&from)?;
            let dates = slot_engine::open_dates(
                from,
                days,
                &selection.selection(),
                &snapshot.barbers,
                &snapshot.shop,
                &snapshot.booked_by_date(),
                &snapshot.config,
            )?;
            write_json(output, &serde_json::to_value(dates)?)?;
        }
        Commands::Check => {
            snapshot.validate().context("Snapshot failed validation")?;
            write_json(output, &json!({ "status": "ok" }))?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json(path: Option<&str>, value: &serde_json::Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
