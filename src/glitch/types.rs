//! Core data types for the glitch effect
//!
//! - `Intensity`: how often a tick corrupts the displayed text
//! - `CorruptionEvent`: one transient single-character substitution
//! - `GlitchPhase`: Stable / Corrupted
//! - `TickOutcome` and `GlitchStats`: what ticks did, for callers and tests

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::time::Instant;

use super::error::GlitchError;

/// Characters a corrupted position may be replaced with
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Period between scheduling ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;

/// Delay between a corruption and its revert
pub const DEFAULT_REVERT_DELAY_MS: u64 = 100;

/// Corruption probability level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// 5% chance per tick
    Low,
    /// 10% chance per tick
    #[default]
    Medium,
    /// 20% chance per tick
    High,
}

impl Intensity {
    /// Get all levels for iteration
    pub fn all() -> &'static [Intensity] {
        &[Intensity::Low, Intensity::Medium, Intensity::High]
    }

    /// Probability that a single tick triggers a corruption
    pub fn threshold(&self) -> f64 {
        match self {
            Intensity::Low => 0.05,
            Intensity::Medium => 0.10,
            Intensity::High => 0.20,
        }
    }

    /// Parse a level, falling back to `Medium` for anything unrecognized.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|e: GlitchError| {
            tracing::warn!("{}, using {}", e, Intensity::default());
            Intensity::default()
        })
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intensity::Low => write!(f, "low"),
            Intensity::Medium => write!(f, "medium"),
            Intensity::High => write!(f, "high"),
        }
    }
}

impl FromStr for Intensity {
    type Err = GlitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            _ => Err(GlitchError::InvalidIntensity(s.to_string())),
        }
    }
}

/// Whether the displayed text currently carries a corruption
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GlitchPhase {
    Stable,
    Corrupted,
}

/// A transient single-character substitution
#[derive(Debug, Clone, PartialEq)]
pub struct CorruptionEvent {
    /// Monotonic per-engine event number, used to ignore superseded reverts
    pub id: u64,
    /// Character index (not byte offset) into the source text
    pub position: usize,
    /// Source character at `position`
    pub original: char,
    /// Character shown at `position` until the revert
    pub replacement: char,
    /// When the display goes back to the source text
    pub revert_at: Instant,
}

/// Result of a single scheduling tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Source text is empty, nothing to draw
    Idle,
    /// Probability draw failed, display unchanged
    Skipped,
    /// A new corruption is showing
    Corrupted(CorruptionEvent),
}

impl TickOutcome {
    pub fn is_corruption(&self) -> bool {
        matches!(self, TickOutcome::Corrupted(_))
    }
}

/// Per-engine counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlitchStats {
    pub ticks: u64,
    pub corruptions: u64,
    pub reverts: u64,
}

impl GlitchStats {
    /// Fraction of ticks that produced a corruption
    pub fn corruption_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.corruptions as f64 / self.ticks as f64
        }
    }
}

impl std::fmt::Display for GlitchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ticks: {}, Corruptions: {}, Reverts: {}, Rate: {:.3}",
            self.ticks,
            self.corruptions,
            self.reverts,
            self.corruption_rate()
        )
    }
}
