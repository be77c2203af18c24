//! # Glitchboard
//!
//! A terminal operations dashboard of static status widgets, decorated with a
//! time-driven text glitch effect.
//!
//! ## Features
//!
//! - **Glitch engine**: Periodic single-character corruption with timed revert
//! - **Owned scheduling**: Each engine owns its cancellable tokio tasks
//! - **Pluggable randomness**: Thread, seeded or scripted random sources
//! - **Observers**: Explicit display change callbacks and watch channels
//!
//! ## Modules
//!
//! - [`glitch`]: The glitch effect engine
//! - [`dashboard`]: Widget data, live dashboard and text rendering
//! - [`config`]: TOML + environment configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glitchboard::{render_text, Config, Dashboard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut dashboard = Dashboard::start(&config).await?;
//!
//!     // Redraw on the next glitch
//!     if dashboard.next_change().await.is_some() {
//!         println!("{}", render_text(&dashboard.snapshot()));
//!     }
//!
//!     dashboard.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod glitch;

// Re-export top-level types for convenience
pub use glitch::{
    boxed_rng, ChannelObserver, CorruptionEvent, DisplayChange, DisplayObserver, EngineConfig,
    GlitchEngine, GlitchError, GlitchPhase, GlitchResult, GlitchRng, GlitchState, GlitchStats,
    Intensity, SeededRandom, ThreadRandom, TickOutcome,
};

pub use dashboard::{render_text, Dashboard, DashboardSnapshot, GlitchSlot};

pub use config::{
    generate_default_config, Config, ConfigError, DashboardConfig, GlitchConfig, LoggingConfig,
};
