//! Glitchboard live dashboard
//!
//! Renders the dashboard to the terminal and redraws whenever a label glitches.
//!
//! # Configuration
//!
//! Loaded from the default config locations; environment variables override:
//! - `GLITCHBOARD_TICK_MS`, `GLITCHBOARD_REVERT_MS`: effect timing
//! - `GLITCHBOARD_INTENSITY`: title intensity (low, medium, high)
//! - `GLITCHBOARD_SEED`: fixed seed for reproducible glitches
//! - `RUST_LOG` / `GLITCHBOARD_LOG_LEVEL`: log level (logs go to stderr)

use glitchboard::{render_text, Config, Dashboard};
use std::time::Duration;

const CLEAR: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    config.logging.init();

    tracing::info!("Glitchboard v{}", env!("CARGO_PKG_VERSION"));

    let mut dashboard = Dashboard::start(&config).await?;
    draw(&dashboard, config.dashboard.clear_screen);

    let run_for = (config.dashboard.run_secs > 0)
        .then(|| Duration::from_secs(config.dashboard.run_secs));
    let deadline = tokio::time::sleep(run_for.unwrap_or(Duration::MAX));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            change = dashboard.next_change() => {
                let Some(change) = change else { break };
                tracing::trace!(
                    slot = ?dashboard.slot_of(&change.engine_id),
                    text = %change.text,
                    "Redraw"
                );
                draw(&dashboard, config.dashboard.clear_screen);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            _ = &mut deadline, if run_for.is_some() => {
                tracing::info!("Run time elapsed");
                break;
            }
        }
    }

    let stats = dashboard.stats().await;
    let last = dashboard.shutdown().await;
    draw_frame(&render_text(&last), config.dashboard.clear_screen);

    for (slot, s) in stats {
        tracing::info!("{}: {}", slot, s);
    }

    Ok(())
}

fn draw(dashboard: &Dashboard, clear: bool) {
    draw_frame(&render_text(&dashboard.snapshot()), clear);
}

fn draw_frame(frame: &str, clear: bool) {
    if clear {
        print!("{}", CLEAR);
    }
    println!("{}", frame);
}
