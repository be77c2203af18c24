//! Glitch Effect
//!
//! Periodically corrupts one character of a displayed string and restores it
//! shortly after:
//!
//! - **types**: Intensity levels, corruption events, stats
//! - **state**: Timer-free state machine (Stable / Corrupted)
//! - **random**: Pluggable random sources
//! - **observer**: Display change notifications
//! - **engine**: tokio-driven engine owning its tick and revert tasks
//! - **error**: Error types
//!
//! # Timeline
//!
//! ```text
//!   attach        tick            tick  +100ms        tick
//!     │            │ (skipped)      │ corrupt │ revert  │
//!     0s ────────── 2s ──────────── 4s ───────┴──────── 6s ──▶
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use glitchboard::glitch::{boxed_rng, EngineConfig, GlitchEngine, Intensity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = GlitchEngine::attach(
//!         "AGENT-TOGA",
//!         Intensity::Medium,
//!         EngineConfig::default(),
//!         boxed_rng(None),
//!     )
//!     .await?;
//!
//!     let mut display = engine.subscribe();
//!     display.changed().await?;
//!     println!("{}", *display.borrow());
//!
//!     engine.detach().await;
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod observer;
pub mod random;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use engine::{EngineConfig, GlitchEngine};
pub use error::{GlitchError, GlitchResult};
pub use observer::{ChannelObserver, DisplayChange, DisplayObserver, EngineId, ObserverId};
pub use random::{boxed_rng, GlitchRng, SeededRandom, ThreadRandom};
pub use state::GlitchState;
pub use types::{
    CorruptionEvent, GlitchPhase, GlitchStats, Intensity, TickOutcome, DEFAULT_ALPHABET,
    DEFAULT_REVERT_DELAY_MS, DEFAULT_TICK_INTERVAL_MS,
};
