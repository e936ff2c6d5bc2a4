use anyhow::{anyhow, Context, Result};
use arcade_core::GameConfig;
use arcade_host::settings::{load_config, parse_seed, parse_seed_csv, seed_to_hex, SessionSettings};
use arcade_host::{run_benchmark, run_session, run_session_with_events, write_json, BenchmarkConfig};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arcade-host")]
#[command(about = "Headless driver for the arcade wave and scoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one session with the scripted pilot and report the outcome
    Run {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        ticks: Option<u32>,
        #[arg(long)]
        tick_hz: Option<u32>,
        /// JSON tuning file; missing keys keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write every emitted command as JSON lines
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Run many seeds in parallel and aggregate the results
    Benchmark {
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        ticks: Option<u32>,
        #[arg(long)]
        tick_hz: Option<u32>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the default tuning as JSON
    DefaultConfig {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn session_settings(
    seed: Option<String>,
    ticks: Option<u32>,
    tick_hz: Option<u32>,
    config: Option<PathBuf>,
) -> Result<SessionSettings> {
    let mut settings = SessionSettings::from_env();
    if let Some(seed) = seed {
        settings.seed = parse_seed(&seed)?;
    }
    if let Some(ticks) = ticks {
        settings.ticks = ticks;
    }
    if let Some(tick_hz) = tick_hz {
        if tick_hz == 0 {
            return Err(anyhow!("--tick-hz must be >= 1"));
        }
        settings.tick_hz = tick_hz;
    }
    if let Some(path) = config {
        settings.config = load_config(&path)?;
    }
    Ok(settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match Cli::parse().command {
        Commands::Run {
            seed,
            ticks,
            tick_hz,
            config,
            output,
            events,
        } => {
            let settings = session_settings(seed, ticks, tick_hz, config)?;
            let report = match events {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        fs::create_dir_all(parent)?;
                    }
                    let file = File::create(&path)
                        .with_context(|| format!("failed creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    let report = run_session_with_events(&settings, &mut writer)?;
                    println!("events={}", path.display());
                    report
                }
                None => run_session(&settings)?,
            };

            println!("seed={}", report.seed_hex);
            println!("ticks={}", report.ticks_run);
            println!("score={}", report.final_score);
            println!("level={}", report.final_level);
            println!("lives={}", report.final_lives);
            println!("asteroids_destroyed={}", report.asteroids_destroyed);
            println!("aliens_destroyed={}", report.aliens_destroyed);
            println!("game_over={}", report.game_over);
            if let Some(path) = output {
                write_json(&path, &report)?;
                println!("output={}", path.display());
            }
        }
        Commands::Benchmark {
            seeds,
            seed_start,
            seed_count,
            ticks,
            tick_hz,
            config,
            output,
            jobs,
        } => {
            let base = session_settings(None, ticks, tick_hz, config)?;
            let seeds = match seeds {
                Some(csv) => parse_seed_csv(&csv)?,
                None => {
                    let start = match seed_start {
                        Some(raw) => parse_seed(&raw)?,
                        None => base.seed,
                    };
                    (0..seed_count).map(|i| start.wrapping_add(i)).collect()
                }
            };

            let report = run_benchmark(BenchmarkConfig {
                config: base.config,
                seeds,
                ticks: base.ticks,
                tick_hz: base.tick_hz,
                jobs,
            })?;

            for run in &report.runs {
                println!(
                    "{} score={} level={} ticks={} game_over={}",
                    seed_to_hex(run.seed),
                    run.final_score,
                    run.final_level,
                    run.ticks_run,
                    run.game_over
                );
            }
            println!("runs={}", report.run_count);
            println!("avg_score={:.1}", report.avg_score);
            println!("max_score={}", report.max_score);
            println!("avg_level={:.2}", report.avg_level);
            println!("game_over_rate={:.2}", report.game_over_rate);
            if let Some(path) = output {
                write_json(&path, &report)?;
                println!("output={}", path.display());
            }
        }
        Commands::DefaultConfig { output } => {
            let config = GameConfig::default();
            match output {
                Some(path) => {
                    write_json(&path, &config)?;
                    println!("wrote={}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }
    }
    Ok(())
}
