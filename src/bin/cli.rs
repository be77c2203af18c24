//! Glitchboard CLI
//!
//! Command-line tools around the glitch effect:
//! - Print a dashboard snapshot
//! - Simulate the effect offline on a virtual clock
//! - Watch a live engine glitch a single string
//! - Generate a default config file

use clap::{Parser, Subcommand, ValueEnum};
use glitchboard::{
    boxed_rng, generate_default_config, render_text, Config, Dashboard, GlitchEngine,
    GlitchState, Intensity, TickOutcome,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Parser)]
#[command(name = "glitchboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal operations dashboard with a text glitch effect")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the dashboard once
    Snapshot {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the effect offline for a number of ticks
    Simulate {
        /// Text to glitch
        text: String,
        /// Intensity (low, medium, high); unknown values fall back to medium
        #[arg(short, long, default_value = "medium")]
        intensity: String,
        /// Number of ticks to run
        #[arg(short, long, default_value = "1000")]
        ticks: u64,
        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print every corruption
        #[arg(short, long)]
        verbose: bool,
    },

    /// Attach a live engine to a string and print every change
    Watch {
        /// Text to glitch
        text: String,
        /// Intensity (low, medium, high); unknown values fall back to medium
        #[arg(short, long, default_value = "high")]
        intensity: String,
        /// How long to watch
        #[arg(long, default_value = "30")]
        seconds: u64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.logging.init();

    match cli.command {
        Commands::Snapshot { format } => {
            let dashboard = Dashboard::start(&config).await?;
            let snapshot = dashboard.snapshot();
            dashboard.shutdown().await;

            match format {
                OutputFormat::Text => println!("{}", render_text(&snapshot)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
        }

        Commands::Simulate {
            text,
            intensity,
            ticks,
            seed,
            verbose,
        } => {
            let intensity = Intensity::parse_or_default(&intensity);
            let engine_config = config.glitch.engine_config();
            let mut rng = boxed_rng(seed.or(config.glitch.seed));
            let mut state = GlitchState::new(text.as_str(), intensity);

            // Virtual clock: tick n happens at n * tick_interval
            let start = Instant::now();
            let tick_ms = engine_config.tick_interval.as_millis() as u64;
            for n in 1..=ticks {
                let now = start + virtual_offset(tick_ms, n);
                let outcome = state.tick(
                    rng.as_mut(),
                    &engine_config.alphabet,
                    now,
                    engine_config.revert_delay,
                );

                if let TickOutcome::Corrupted(event) = outcome {
                    if verbose {
                        println!(
                            "tick {:>6}  t={:>8}ms  {}  [{}: {} -> {}]",
                            n,
                            (now - start).as_millis(),
                            state.display(),
                            event.position,
                            event.original,
                            event.replacement
                        );
                    }
                    state.revert(event.id);
                }
            }

            let stats = state.stats();
            println!("Text:      {:?}", text);
            println!("Intensity: {} (threshold {:.2})", intensity, intensity.threshold());
            println!("{}", stats);
            println!(
                "Deviation: {:+.4}",
                stats.corruption_rate() - intensity.threshold()
            );
        }

        Commands::Watch {
            text,
            intensity,
            seconds,
        } => {
            let intensity = Intensity::parse_or_default(&intensity);
            let engine = GlitchEngine::attach(
                text,
                intensity,
                config.glitch.engine_config(),
                boxed_rng(config.glitch.seed),
            )
            .await?;
            let mut display = engine.subscribe();

            println!("{}", engine.display());

            let deadline = tokio::time::sleep(Duration::from_secs(seconds));
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    changed = display.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        println!("{}", *display.borrow_and_update());
                    }
                    _ = &mut deadline => break,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            let stats = engine.stats().await;
            let last = engine.detach().await;
            println!("{}", last);
            eprintln!("{}", stats);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Offset of tick `n` on the simulated clock
fn virtual_offset(tick_ms: u64, n: u64) -> Duration {
    Duration::from_millis(tick_ms.saturating_mul(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_offset_does_not_wrap() {
        assert_eq!(virtual_offset(2000, 3), Duration::from_secs(6));

        let past_u32 = u32::MAX as u64 + 5;
        assert_eq!(
            virtual_offset(2000, past_u32),
            Duration::from_millis(2000 * past_u32)
        );
        assert!(virtual_offset(2000, past_u32) > virtual_offset(2000, 5));
    }

    #[test]
    fn test_simulate_args() {
        let cli = Cli::parse_from([
            "glitchboard-cli",
            "simulate",
            "AGENT-TOGA",
            "--ticks",
            "5000000000",
        ]);
        match cli.command {
            Commands::Simulate { ticks, .. } => assert_eq!(ticks, 5_000_000_000),
            _ => panic!("expected simulate"),
        }
    }
}
