use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ride_core::clock::{Clock, ManualClock, SystemClock};
use ride_core::export::write_session_json_file;
use ride_core::model::{CarCategory, RideRequest};
use ride_core::scenario::{run_scripted_rides, seed_demo, ScenarioParams};
use ride_core::{RideConfig, RideService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ride_cli",
    about = "Scripted front-end for the ride-hailing booking engine",
    long_about = "Seeds the demo fleet and promo codes, then quotes fares,\n\
                  books rides or runs whole scripted sessions against the\n\
                  in-memory engine. State lives only for the process."
)]
struct Cli {
    /// JSON file with pricing, matching and cancellation overrides
    #[arg(long, global = true, env = "RIDE_CONFIG")]
    config: Option<PathBuf>,
    /// Seed for every random draw (surge, ETA, matching)
    #[arg(long, global = true, env = "RIDE_SEED")]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the demo fleet and promo codes
    Drivers,
    /// Quote a fare without booking
    Estimate {
        #[arg(long)]
        km: u32,
        /// compact (or mini), sedan, suv
        #[arg(long, default_value = "sedan")]
        category: CarCategory,
        #[arg(long)]
        promo: Option<String>,
    },
    /// Quote and book one ride, then complete or cancel it
    Ride {
        #[arg(long, default_value = "pravin")]
        rider: String,
        #[arg(long)]
        pickup: String,
        #[arg(long)]
        drop: String,
        #[arg(long)]
        km: u32,
        #[arg(long, default_value = "sedan")]
        category: CarCategory,
        #[arg(long)]
        promo: Option<String>,
        /// Cancel after this many simulated minutes instead of completing
        #[arg(long)]
        cancel_after: Option<i64>,
        /// Stars for the driver after completion
        #[arg(long, default_value_t = 5)]
        rating: u8,
    },
    /// Run a scripted session on a simulated clock
    Demo {
        #[arg(long, default_value_t = 10)]
        rides: usize,
        #[arg(long)]
        promo: Option<String>,
        /// Share of matched rides that complete rather than cancel
        #[arg(long, default_value_t = 0.8)]
        complete_ratio: f64,
        /// Leave the last N bookings active
        #[arg(long, default_value_t = 0)]
        hold_active: usize,
        /// Upper bound of simulated minutes before each ride ends
        #[arg(long, default_value_t = 6)]
        max_ride_minutes: i64,
        /// Write drivers, promos, bookings and counters to this JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_core=info,ride_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RideConfig> {
    let Some(path) = path else {
        return Ok(RideConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    RideConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn build_service(cli: &Cli, clock: Arc<ManualClock>) -> Result<RideService> {
    let config = load_config(cli.config.as_ref())?;
    let mut builder = RideService::builder(config).clock(clock);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let service = builder.build().context("invalid ride config")?;
    seed_demo(&service).context("failed to seed demo data")?;
    Ok(service)
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let service = build_service(&cli, clock.clone())?;

    match &cli.command {
        Commands::Drivers => {
            println!("--- Drivers ---");
            for driver in service.list_drivers() {
                println!("{driver}");
            }
            println!("--- Promos ---");
            for promo in service.list_promos() {
                println!(" - {promo}");
            }
        }
        Commands::Estimate {
            km,
            category,
            promo,
        } => {
            let estimate = service.estimate_fare(*km, *category, promo.as_deref())?;
            println!(
                "Estimated fare: {:.2} | ETA: {} min | Fuel est: {:.2} L",
                estimate.final_fare, estimate.eta_minutes, estimate.estimated_fuel_liters
            );
            println!(
                "  base {:.2} + distance {:.2} + surge {:.2} - promo {:.2}",
                estimate.base_fare,
                estimate.distance_fare,
                estimate.surge_amount,
                estimate.promo_discount
            );
        }
        Commands::Ride {
            rider,
            pickup,
            drop,
            km,
            category,
            promo,
            cancel_after,
            rating,
        } => {
            let request = RideRequest::new(
                rider.as_str(),
                pickup.as_str(),
                drop.as_str(),
                *km,
                *category,
            );
            let (estimate, booking) = service
                .quote_and_request(&request, promo.as_deref())
                .context("ride request failed")?;
            println!(
                "Estimated fare: {:.2} | ETA: {} min | Fuel est: {:.2} L",
                estimate.final_fare, estimate.eta_minutes, estimate.estimated_fuel_liters
            );
            println!("Booking created: {}", booking.summary());
            if let Some(driver) = service.find_driver(booking.driver_id) {
                println!("Driver assigned: {}", driver.brief());
            }

            match cancel_after {
                Some(minutes) => {
                    println!(
                        "Cancelling after {minutes} min (free within {} min)",
                        service.config().cancellation.free_window_minutes
                    );
                    clock.advance_minutes(*minutes);
                    let fee = service.cancel_booking(booking.id, rider)?;
                    println!("Booking cancelled. Cancellation fee: {fee:.2}");
                }
                None => {
                    service.complete_booking(booking.id, rider)?;
                    let stars = service.rate_driver(booking.driver_id, *rating)?;
                    println!(
                        "Booking completed. Driver rating now {:.2} ({} ratings)",
                        stars.average().unwrap_or_default(),
                        stars.count
                    );
                }
            }
            if let Some(stored) = service.find_booking(booking.id) {
                println!("{stored}");
            }
        }
        Commands::Demo {
            rides,
            promo,
            complete_ratio,
            hold_active,
            max_ride_minutes,
            export,
        } => {
            let mut params = ScenarioParams::default()
                .with_rides(*rides)
                .with_complete_ratio(*complete_ratio)
                .with_hold_active(*hold_active)
                .with_max_ride_minutes(*max_ride_minutes);
            if let Some(seed) = cli.seed {
                params = params.with_seed(seed);
            }
            if let Some(code) = promo {
                params = params.with_promo_code(code.as_str());
            }

            let outcome = run_scripted_rides(&service, &params, Some(clock.as_ref()));
            println!(
                "Requested {} | matched {} | unmatched {} | completed {} | cancelled {} | active {}",
                outcome.requested,
                outcome.matched,
                outcome.unmatched,
                outcome.completed,
                outcome.cancelled,
                outcome.held_active
            );
            println!(
                "Fares {:.2} | cancellation fees {:.2}",
                outcome.fares_total, outcome.cancellation_fees_total
            );
            for booking in service.all_bookings() {
                println!("  {}", booking.summary());
            }
            println!("{}", serde_json::to_string(&service.telemetry())?);

            if let Some(path) = export {
                write_session_json_file(path, &service)
                    .map_err(|err| anyhow::anyhow!("{err}"))
                    .with_context(|| format!("failed to export {}", path.display()))?;
                tracing::info!(path = %path.display(), "session exported");
            }
        }
    }
    Ok(())
}
