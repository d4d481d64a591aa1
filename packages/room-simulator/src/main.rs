//! Room simulator CLI - plays many all-bot rooms through the engine at once.
//!
//! Rooms run in memory with no deadlines involved (bots never get one), so a
//! batch finishes as fast as the bots can roll.

mod metrics;
mod output;
mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use futures::stream::{self, StreamExt};
use ludo_backend::config::EngineConfig;
use ludo_backend::domain::{Color, RoomId};
use ludo_backend::error::AppError;
use ludo_backend::infra::state::build_engine;
use ludo_backend::services::game_flow::GameFlowService;
use metrics::{MetricsSink, RoomMetrics};
use output::OutputWriter;
use tracing::{info, warn};
use types::{OutputFormat, Strategy};

#[derive(Parser)]
#[command(name = "room-simulator")]
#[command(about = "Concurrent all-bot room simulator")]
struct Args {
    /// Number of rooms to simulate
    #[arg(short, long, default_value = "1")]
    rooms: u32,

    /// Bots per room
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(2..=4))]
    players: u8,

    /// Seed for dice and bots
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Bot strategy for every seat
    #[arg(long, default_value = "furthest")]
    strategy: Strategy,

    /// Rooms in flight at once
    #[arg(long, default_value = "8")]
    concurrency: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON logs instead of plain text
    #[arg(long)]
    json_logs: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the detailed output file
    #[arg(long)]
    compress: bool,
}

struct RoomRun {
    room_id: RoomId,
    duration: Duration,
}

async fn run_room(engine: &GameFlowService, index: u32, players: u8) -> Result<RoomRun, AppError> {
    let start = Instant::now();
    let room = engine.create_room(&format!("sim-{index}")).await?;
    for _ in 0..players {
        engine.add_bot(room.id).await?;
    }
    // automation plays the whole game inside this call
    engine.start_game(room.id).await?;
    Ok(RoomRun {
        room_id: room.id,
        duration: start.elapsed(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.json_logs {
        ludo_backend::telemetry::init_tracing();
    } else {
        // Silent by default, only show warnings/errors
        let filter = if args.verbose { "info" } else { "warn" };
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = EngineConfig {
        bot_strategy: args.strategy.name().to_string(),
        max_automation_steps: 1_000_000,
        ..EngineConfig::from_env()?
    };
    let sink = Arc::new(MetricsSink::default());
    let engine = build_engine()
        .with_config(config)
        .with_seed(args.seed)
        .with_sink(sink.clone())
        .build()
        .await?;

    let mut writer = OutputWriter::new(&args.output_dir, args.output_format.clone(), args.compress)?;
    info!(rooms = args.rooms, players = args.players, strategy = args.strategy.name(), "Starting simulation");

    let players = args.players;
    let started = Instant::now();
    let mut results = stream::iter(1..=args.rooms)
        .map(|i| {
            let engine = engine.clone();
            async move { run_room(&engine, i, players).await }
        })
        .buffer_unordered(args.concurrency.max(1));

    let mut finished = Vec::new();
    let mut errors = 0u32;
    while let Some(result) = results.next().await {
        match result {
            Ok(run) => {
                let tally = sink.take(run.room_id);
                if tally.winner.is_none() {
                    warn!(room_id = run.room_id, "Room ended without a winner");
                }
                let metrics = RoomMetrics::from_tally(
                    run.room_id,
                    args.seed,
                    args.strategy.name(),
                    usize::from(args.players),
                    &tally,
                    run.duration.as_secs_f64() * 1000.0,
                );
                if let Err(e) = writer.write_room(&metrics) {
                    warn!(room_id = run.room_id, error = %e, "Failed to write metrics");
                }
                finished.push(metrics);
            }
            Err(e) => {
                errors += 1;
                warn!(error = %e, "Room failed");
            }
        }
    }
    let elapsed = started.elapsed();

    let (detail_path, csv_path) = writer.output_paths();
    let (detail_path, csv_path) = (detail_path.to_path_buf(), csv_path.to_path_buf());
    writer.finish()?;
    info!(detail = %detail_path.display(), summary = %csv_path.display(), "Results written");

    print_summary(&finished, errors, elapsed, args.rooms);
    Ok(())
}

fn print_summary(results: &[RoomMetrics], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Rooms completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }

    let n = results.len() as f64;
    let avg = |f: fn(&RoomMetrics) -> u32| results.iter().map(|m| f64::from(f(m))).sum::<f64>() / n;
    println!(
        "Per room: turns={:.1} rolls={:.1} captures={:.1} bonus_turns={:.1}",
        avg(|m| m.turns),
        avg(|m| m.rolls),
        avg(|m| m.captures),
        avg(|m| m.bonus_turns),
    );

    println!("\n=== Wins by Color ===");
    for color in Color::ALL.map(Color::as_str) {
        let wins = results
            .iter()
            .filter(|m| m.winner.as_deref() == Some(color))
            .count();
        if wins > 0 {
            println!("{color}: {wins} ({:.1}%)", wins as f64 / n * 100.0);
        }
    }
}
