//! Pressure engine demo runner.
//!
//! Drives a small world of regions through a scripted population scenario
//! and periodically writes every region's snapshot as one JSON line.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use pressure_core::{EngineConfig, PressureCoordinator};

/// Command line arguments for the demo runner
#[derive(Parser, Debug)]
#[command(name = "pressure_sim")]
#[command(about = "Crowding pressure coordination engine demo")]
struct Args {
    /// Population scenario to run: market_day or festival
    #[arg(long, default_value = "market_day")]
    scenario: String,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1200)]
    ticks: u64,

    /// Seconds of simulation time per tick
    #[arg(long, default_value_t = 0.5)]
    delta_time: f64,

    /// Optional TOML tuning file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot output file (JSON lines); stdout summary only when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write snapshots every N ticks
    #[arg(long, default_value_t = 20)]
    snapshot_interval: u64,
}

/// A scripted population set-point for one region over time.
struct ScenarioTrack {
    region_id: &'static str,
    position: (f64, f64),
    /// (start second, population) segments, in order
    segments: &'static [(f64, f64)],
}

impl ScenarioTrack {
    fn population_at(&self, time: f64) -> f64 {
        self.segments
            .iter()
            .rev()
            .find(|(start, _)| time >= *start)
            .map(|(_, pop)| *pop)
            .unwrap_or(0.0)
    }
}

/// Morning build-up, mid-day crowd, evening dispersal in the square; the
/// grove stays quiet the whole day.
const MARKET_DAY: &[ScenarioTrack] = &[
    ScenarioTrack {
        region_id: "market_square",
        position: (0.0, 0.0),
        segments: &[(0.0, 0.05), (60.0, 0.45), (180.0, 0.85), (420.0, 0.10)],
    },
    ScenarioTrack {
        region_id: "quiet_grove",
        position: (500.0, 0.0),
        segments: &[(0.0, 0.05)],
    },
];

/// A sustained festival crowd overflows attraction into both neighbors;
/// the far field is outside broadcast radius and stays untouched.
const FESTIVAL: &[ScenarioTrack] = &[
    ScenarioTrack {
        region_id: "festival_ground",
        position: (0.0, 0.0),
        segments: &[(0.0, 0.1), (30.0, 0.95), (500.0, 0.05)],
    },
    ScenarioTrack {
        region_id: "near_meadow",
        position: (400.0, 0.0),
        segments: &[(0.0, 0.05)],
    },
    ScenarioTrack {
        region_id: "river_bank",
        position: (0.0, 600.0),
        segments: &[(0.0, 0.1)],
    },
    ScenarioTrack {
        region_id: "far_field",
        position: (3000.0, 0.0),
        segments: &[(0.0, 0.05)],
    },
];

fn main() -> ExitCode {
    let args = Args::parse();

    let tracks = match args.scenario.as_str() {
        "market_day" => MARKET_DAY,
        "festival" => FESTIVAL,
        other => {
            eprintln!("Unknown scenario '{}'; expected market_day or festival", other);
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    println!("Pressure Coordination Engine");
    println!("============================");
    println!("Scenario: {}", args.scenario);
    println!("Ticks: {} x {}s", args.ticks, args.delta_time);
    println!();

    match run(tracks, config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    tracks: &[ScenarioTrack],
    config: EngineConfig,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = PressureCoordinator::new(config);
    for track in tracks {
        coordinator.register_region(track.region_id, track.position)?;
        println!("  Registered {} at {:?}", track.region_id, track.position);
    }
    println!();

    let mut writer = match &args.output {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    for tick in 1..=args.ticks {
        let time = tick as f64 * args.delta_time;
        for track in tracks {
            coordinator.set_population(track.region_id, track.population_at(time))?;
        }
        coordinator.tick(args.delta_time)?;

        if tick % args.snapshot_interval == 0 {
            if let Some(writer) = writer.as_mut() {
                for snapshot in coordinator.snapshots() {
                    writeln!(writer, "{}", snapshot.to_json()?)?;
                }
            }
        }

        if tick % 200 == 0 {
            print_summary(&coordinator);
        }
    }

    match writer {
        Some(mut writer) => {
            writer.flush()?;
            if let Some(path) = &args.output {
                println!();
                println!("Wrote snapshots to {}", path.display());
            }
        }
        None => {
            // No output file: dump the busiest region's final state instead
            if let Some(snapshot) = coordinator.most_pressured() {
                println!();
                println!("Final state of {}:", snapshot.region_id);
                println!("{}", serde_json::to_string_pretty(snapshot)?);
            }
        }
    }

    println!();
    println!(
        "Simulation complete. Ran {} ticks ({}s of world time).",
        args.ticks,
        coordinator.time_seconds()
    );
    Ok(())
}

fn print_summary(coordinator: &PressureCoordinator) {
    println!(
        "[t = {:>6.1}s] tick {}",
        coordinator.time_seconds(),
        coordinator.current_tick()
    );
    for snapshot in coordinator.snapshots() {
        println!(
            "  {:<16} pop {:.2}  fast {:+.2}  lagged {:+.2}  phase {}  boosts {}",
            snapshot.region_id,
            snapshot.population,
            snapshot.fast_index,
            snapshot.lagged_index,
            snapshot.phase,
            snapshot.attraction.len()
        );
    }
}
