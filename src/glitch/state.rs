//! Glitch state machine
//!
//! A synchronous, timer-free model of one glitching string. The engine drives
//! it from its tick and revert tasks; the offline simulator and tests drive it
//! directly with a virtual clock.
//!
//! ```text
//!            tick (draw < threshold)
//!   Stable ───────────────────────────▶ Corrupted
//!     ▲                                    │
//!     └──── revert(id) / force_revert ─────┘
//! ```

use std::time::Duration;
use tokio::time::Instant;

use super::random::GlitchRng;
use super::types::{CorruptionEvent, GlitchPhase, GlitchStats, Intensity, TickOutcome};

/// Source text, displayed text and the in-flight corruption
#[derive(Debug, Clone)]
pub struct GlitchState {
    source: String,
    source_chars: Vec<char>,
    display: String,
    intensity: Intensity,
    pending: Option<CorruptionEvent>,
    next_event_id: u64,
    stats: GlitchStats,
}

impl GlitchState {
    pub fn new(source: impl Into<String>, intensity: Intensity) -> Self {
        let source = source.into();
        Self {
            source_chars: source.chars().collect(),
            display: source.clone(),
            source,
            intensity,
            pending: None,
            next_event_id: 0,
            stats: GlitchStats::default(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn pending(&self) -> Option<&CorruptionEvent> {
        self.pending.as_ref()
    }

    pub fn stats(&self) -> GlitchStats {
        self.stats
    }

    /// Source length in characters
    pub fn len(&self) -> usize {
        self.source_chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_chars.is_empty()
    }

    pub fn phase(&self) -> GlitchPhase {
        if self.pending.is_some() {
            GlitchPhase::Corrupted
        } else {
            GlitchPhase::Stable
        }
    }

    /// Run one scheduling tick.
    ///
    /// On a successful draw the corruption is built from the source text, so
    /// an in-flight corruption is replaced rather than stacked.
    pub fn tick(
        &mut self,
        rng: &mut dyn GlitchRng,
        alphabet: &[char],
        now: Instant,
        revert_delay: Duration,
    ) -> TickOutcome {
        self.stats.ticks += 1;

        if self.source_chars.is_empty() || alphabet.is_empty() {
            return TickOutcome::Idle;
        }

        if rng.next_unit() >= self.intensity.threshold() {
            return TickOutcome::Skipped;
        }

        let position = rng.next_index(self.source_chars.len());
        let replacement = rng.next_char(alphabet);
        let event = self.corrupt(position, replacement, now + revert_delay);
        TickOutcome::Corrupted(event)
    }

    fn corrupt(&mut self, position: usize, replacement: char, revert_at: Instant) -> CorruptionEvent {
        self.next_event_id += 1;
        let event = CorruptionEvent {
            id: self.next_event_id,
            position,
            original: self.source_chars[position],
            replacement,
            revert_at,
        };

        self.display = self
            .source_chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i == position { replacement } else { *c })
            .collect();
        self.pending = Some(event.clone());
        self.stats.corruptions += 1;

        event
    }

    /// Revert the corruption with the given id.
    ///
    /// Returns false when that event was already superseded or reverted.
    pub fn revert(&mut self, event_id: u64) -> bool {
        match &self.pending {
            Some(event) if event.id == event_id => {
                self.restore();
                self.stats.reverts += 1;
                true
            }
            _ => false,
        }
    }

    /// Revert whatever is pending. Returns true if the display changed state.
    pub fn force_revert(&mut self) -> bool {
        if self.pending.is_none() {
            return false;
        }
        self.restore();
        self.stats.reverts += 1;
        true
    }

    /// Replace source and intensity, dropping any in-flight corruption.
    /// Stats are kept across resets.
    pub fn reset(&mut self, source: impl Into<String>, intensity: Intensity) {
        let source = source.into();
        self.source_chars = source.chars().collect();
        self.source = source;
        self.intensity = intensity;
        self.restore();
    }

    fn restore(&mut self) {
        self.pending = None;
        self.display.clone_from(&self.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glitch::random::testing::{AlwaysCorrupt, ScriptedRandom};
    use crate::glitch::random::{SeededRandom, ThreadRandom};
    use crate::glitch::types::DEFAULT_ALPHABET;

    const DELAY: Duration = Duration::from_millis(100);

    fn alphabet() -> Vec<char> {
        DEFAULT_ALPHABET.chars().collect()
    }

    #[test]
    fn test_new_state_is_stable() {
        let state = GlitchState::new("AGENT-TOGA", Intensity::Low);
        assert_eq!(state.display(), "AGENT-TOGA");
        assert_eq!(state.phase(), GlitchPhase::Stable);
        assert!(state.pending().is_none());
        assert_eq!(state.len(), 10);
    }

    #[test]
    fn test_forced_corruption_and_revert() {
        let mut state = GlitchState::new("AGENT-TOGA", Intensity::Low);
        let mut rng = ScriptedRandom::new().corrupt(3, 'Z');
        let now = Instant::now();

        let outcome = state.tick(&mut rng, &alphabet(), now, DELAY);
        let event = match outcome {
            TickOutcome::Corrupted(event) => event,
            other => panic!("expected corruption, got {:?}", other),
        };

        assert_eq!(state.display(), "AGEZT-TOGA");
        assert_eq!(state.phase(), GlitchPhase::Corrupted);
        assert_eq!(event.position, 3);
        assert_eq!(event.original, 'N');
        assert_eq!(event.replacement, 'Z');
        assert_eq!(event.revert_at, now + DELAY);

        assert!(state.revert(event.id));
        assert_eq!(state.display(), "AGENT-TOGA");
        assert_eq!(state.phase(), GlitchPhase::Stable);
        assert!(!state.revert(event.id));
    }

    #[test]
    fn test_failed_draw_leaves_display() {
        let mut state = GlitchState::new("LIVE_FEED", Intensity::High);
        let mut rng = ScriptedRandom::new().skip();

        let outcome = state.tick(&mut rng, &alphabet(), Instant::now(), DELAY);
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(state.display(), "LIVE_FEED");
        assert_eq!(state.stats().ticks, 1);
        assert_eq!(state.stats().corruptions, 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // A draw exactly at the threshold does not corrupt
        struct AtThreshold;
        impl GlitchRng for AtThreshold {
            fn next_unit(&mut self) -> f64 {
                0.05
            }
            fn next_index(&mut self, _len: usize) -> usize {
                0
            }
        }

        let mut state = GlitchState::new("abc", Intensity::Low);
        let outcome = state.tick(&mut AtThreshold, &alphabet(), Instant::now(), DELAY);
        assert_eq!(outcome, TickOutcome::Skipped);
    }

    #[test]
    fn test_new_corruption_supersedes_pending() {
        let mut state = GlitchState::new("CONNECTED", Intensity::High);
        let mut rng = ScriptedRandom::new().corrupt(0, '#').corrupt(8, '?');
        let now = Instant::now();

        let first = match state.tick(&mut rng, &alphabet(), now, DELAY) {
            TickOutcome::Corrupted(event) => event,
            other => panic!("expected corruption, got {:?}", other),
        };
        assert_eq!(state.display(), "#ONNECTED");

        let second = match state.tick(&mut rng, &alphabet(), now, DELAY) {
            TickOutcome::Corrupted(event) => event,
            other => panic!("expected corruption, got {:?}", other),
        };
        // Built from the source: only one position differs
        assert_eq!(state.display(), "CONNECTE?");

        // Stale revert is ignored
        assert!(!state.revert(first.id));
        assert_eq!(state.display(), "CONNECTE?");

        assert!(state.revert(second.id));
        assert_eq!(state.display(), "CONNECTED");
    }

    #[test]
    fn test_empty_source_never_corrupts() {
        let mut state = GlitchState::new("", Intensity::High);
        let mut rng = AlwaysCorrupt::default();

        for _ in 0..10_000 {
            let outcome = state.tick(&mut rng, &alphabet(), Instant::now(), DELAY);
            assert_eq!(outcome, TickOutcome::Idle);
        }
        assert_eq!(state.display(), "");
        assert_eq!(state.stats().ticks, 10_000);
        assert_eq!(state.stats().corruptions, 0);
    }

    #[test]
    fn test_length_preserved_for_multibyte_text() {
        let source = "ÉCHO-∆-東京";
        let mut state = GlitchState::new(source, Intensity::High);
        let mut rng = AlwaysCorrupt::default();
        let expected = source.chars().count();

        for _ in 0..100 {
            if let TickOutcome::Corrupted(event) =
                state.tick(&mut rng, &alphabet(), Instant::now(), DELAY)
            {
                assert_eq!(state.display().chars().count(), expected);
                let differing = state
                    .display()
                    .chars()
                    .zip(source.chars())
                    .filter(|(a, b)| a != b)
                    .count();
                assert!(differing <= 1);
                state.revert(event.id);
            }
            assert_eq!(state.display().chars().count(), expected);
        }
        assert_eq!(state.display(), source);
    }

    #[test]
    fn test_force_revert_and_reset() {
        let mut state = GlitchState::new("98.4%", Intensity::Low);
        let mut rng = ScriptedRandom::new().corrupt(1, 'X');

        assert!(!state.force_revert());

        state.tick(&mut rng, &alphabet(), Instant::now(), DELAY);
        assert_eq!(state.display(), "9X.4%");
        assert!(state.force_revert());
        assert_eq!(state.display(), "98.4%");

        state.tick(&mut ScriptedRandom::new().corrupt(0, '!'), &alphabet(), Instant::now(), DELAY);
        state.reset("OFFLINE", Intensity::High);
        assert_eq!(state.display(), "OFFLINE");
        assert_eq!(state.source(), "OFFLINE");
        assert_eq!(state.intensity(), Intensity::High);
        assert_eq!(state.phase(), GlitchPhase::Stable);
        assert_eq!(state.stats().ticks, 2);
    }

    fn observed_rate(intensity: Intensity, rng: &mut dyn GlitchRng, ticks: u64) -> f64 {
        let mut state = GlitchState::new("HYPER-CHAOTIC", intensity);
        let alphabet = alphabet();
        let now = Instant::now();

        for _ in 0..ticks {
            if let TickOutcome::Corrupted(event) = state.tick(rng, &alphabet, now, DELAY) {
                state.revert(event.id);
            }
        }

        let stats = state.stats();
        assert_eq!(stats.corruptions, stats.reverts);
        stats.corruption_rate()
    }

    #[test]
    fn test_corruption_rate_matches_intensity_seeded() {
        for level in Intensity::all() {
            let mut rng = SeededRandom::new(2024);
            let rate = observed_rate(*level, &mut rng, 20_000);
            assert!(
                (rate - level.threshold()).abs() < 0.02,
                "{} rate {} too far from {}",
                level,
                rate,
                level.threshold()
            );
        }
    }

    #[test]
    fn test_corruption_rate_matches_intensity_thread_rng() {
        // 20k ticks keeps the tolerance beyond seven standard deviations
        for level in Intensity::all() {
            let rate = observed_rate(*level, &mut ThreadRandom, 20_000);
            assert!((rate - level.threshold()).abs() < 0.02);
        }
    }
}
