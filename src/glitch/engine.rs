//! Glitch Engine
//!
//! Drives a [`GlitchState`] from two kinds of owned tokio tasks:
//!
//! - a **tick task** that fires every `tick_interval` and may corrupt one
//!   character of the displayed text
//! - at most one **revert task** that restores the source text after
//!   `revert_delay`
//!
//! Both tasks hold a `Weak` reference to the engine state and check an
//! attachment generation under the lock before touching it. Detaching or
//! resetting bumps the generation while holding the lock, so a callback that
//! was already waiting can never mutate the display afterwards.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use uuid::Uuid;

use super::error::{GlitchError, GlitchResult};
use super::observer::{DisplayChange, DisplayObserver, EngineId, ObserverId};
use super::random::GlitchRng;
use super::state::GlitchState;
use super::types::{
    CorruptionEvent, GlitchPhase, GlitchStats, Intensity, TickOutcome, DEFAULT_ALPHABET,
    DEFAULT_REVERT_DELAY_MS, DEFAULT_TICK_INTERVAL_MS,
};

/// Timing and alphabet for one engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Period of the scheduling loop
    pub tick_interval: Duration,
    /// Time a corruption stays visible
    pub revert_delay: Duration,
    /// Replacement characters
    pub alphabet: Vec<char>,
    /// Restore the source text on detach instead of keeping the last frame
    pub restore_on_detach: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            revert_delay: Duration::from_millis(DEFAULT_REVERT_DELAY_MS),
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            restore_on_detach: true,
        }
    }
}

impl EngineConfig {
    /// Builder method: set tick interval and revert delay
    pub fn timing(mut self, tick_interval: Duration, revert_delay: Duration) -> Self {
        self.tick_interval = tick_interval;
        self.revert_delay = revert_delay;
        self
    }

    /// Builder method: set the replacement alphabet
    pub fn alphabet(mut self, alphabet: &str) -> Self {
        self.alphabet = alphabet.chars().collect();
        self
    }

    /// Builder method: choose the detach policy
    pub fn restore_on_detach(mut self, restore: bool) -> Self {
        self.restore_on_detach = restore;
        self
    }

    pub fn validate(&self) -> GlitchResult<()> {
        if self.alphabet.is_empty() {
            return Err(GlitchError::EmptyAlphabet);
        }
        if self.tick_interval.is_zero() {
            return Err(GlitchError::InvalidTiming(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

type Shared = Arc<Mutex<EngineInner>>;

struct EngineInner {
    id: EngineId,
    state: GlitchState,
    rng: Box<dyn GlitchRng>,
    config: EngineConfig,
    /// Bumped on every reset and on detach; tasks from older generations stop
    generation: u64,
    attached: bool,
    tick_task: Option<JoinHandle<()>>,
    revert_task: Option<JoinHandle<()>>,
    display_tx: watch::Sender<String>,
    observers: Vec<(ObserverId, Arc<dyn DisplayObserver>)>,
    next_observer_id: u64,
}

impl EngineInner {
    fn is_live(&self, generation: u64) -> bool {
        self.attached && self.generation == generation
    }

    fn cancel_tasks(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
        if let Some(task) = self.revert_task.take() {
            task.abort();
        }
    }

    /// Cancel everything in flight and start a fresh tick loop
    fn restart(&mut self, shared: &Shared) {
        self.cancel_tasks();
        self.generation += 1;

        let first_tick = Instant::now() + self.config.tick_interval;
        self.tick_task = Some(spawn_ticker(
            Arc::downgrade(shared),
            self.generation,
            first_tick,
            self.config.tick_interval,
        ));
    }

    fn on_tick(&mut self, shared: &Shared, generation: u64) {
        let outcome = self.state.tick(
            self.rng.as_mut(),
            &self.config.alphabet,
            Instant::now(),
            self.config.revert_delay,
        );

        if let TickOutcome::Corrupted(event) = outcome {
            tracing::trace!(
                engine_id = %self.id,
                position = event.position,
                replacement = %event.replacement,
                "Corrupted display"
            );

            // Cancel-and-reschedule: the superseded revert never runs
            if let Some(previous) = self.revert_task.take() {
                previous.abort();
            }
            self.revert_task = Some(spawn_revert(
                Arc::downgrade(shared),
                generation,
                event.id,
                event.revert_at,
            ));
            self.publish();
        }
    }

    /// Reset to a new source and intensity if either differs
    fn reconfigure(&mut self, shared: &Shared, source: String, intensity: Intensity) {
        if self.state.source() == source && self.state.intensity() == intensity {
            return;
        }

        tracing::debug!(
            engine_id = %self.id,
            source = %source,
            intensity = %intensity,
            "Glitch engine reset"
        );

        self.state.reset(source, intensity);
        self.restart(shared);
        self.publish();
    }

    /// Stop all tasks for good and apply the detach policy
    fn shut_down(&mut self) {
        self.attached = false;
        self.generation += 1;
        self.cancel_tasks();

        if self.config.restore_on_detach && self.state.force_revert() {
            self.publish();
        }
    }

    fn publish(&self) {
        let text = self.state.display().to_string();
        self.display_tx.send_replace(text.clone());

        if self.observers.is_empty() {
            return;
        }

        let change = DisplayChange {
            engine_id: self.id.clone(),
            text,
            phase: self.state.phase(),
        };
        for (_, observer) in &self.observers {
            observer.on_display_change(&change);
        }
    }
}

fn spawn_ticker(
    engine: Weak<Mutex<EngineInner>>,
    generation: u64,
    first_tick: Instant,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(shared) = engine.upgrade() else {
                break;
            };
            let mut inner = shared.lock().await;
            if !inner.is_live(generation) {
                break;
            }
            inner.on_tick(&shared, generation);
        }
    })
}

fn spawn_revert(
    engine: Weak<Mutex<EngineInner>>,
    generation: u64,
    event_id: u64,
    revert_at: Instant,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep_until(revert_at).await;

        let Some(shared) = engine.upgrade() else {
            return;
        };
        let mut inner = shared.lock().await;
        if inner.is_live(generation) && inner.state.revert(event_id) {
            inner.revert_task = None;
            tracing::trace!(engine_id = %inner.id, event_id, "Reverted display");
            inner.publish();
        }
    })
}

/// A glitch effect attached to one string.
///
/// Dropping the engine behaves like [`GlitchEngine::detach`]: tasks are
/// cancelled and the configured detach policy is applied.
pub struct GlitchEngine {
    id: EngineId,
    shared: Shared,
    display_rx: watch::Receiver<String>,
}

impl GlitchEngine {
    /// Attach the effect to `source` and start ticking.
    ///
    /// The first tick fires one full `tick_interval` after this returns.
    pub async fn attach(
        source: impl Into<String>,
        intensity: Intensity,
        config: EngineConfig,
        rng: Box<dyn GlitchRng>,
    ) -> GlitchResult<Self> {
        config.validate()?;

        let id = Uuid::new_v4().to_string();
        let state = GlitchState::new(source, intensity);
        let (display_tx, display_rx) = watch::channel(state.display().to_string());

        tracing::debug!(
            engine_id = %id,
            source = state.source(),
            intensity = %intensity,
            tick_ms = config.tick_interval.as_millis() as u64,
            "Glitch engine attached"
        );

        let shared = Arc::new(Mutex::new(EngineInner {
            id: id.clone(),
            state,
            rng,
            config,
            generation: 0,
            attached: true,
            tick_task: None,
            revert_task: None,
            display_tx,
            observers: Vec::new(),
            next_observer_id: 0,
        }));

        shared.lock().await.restart(&shared);

        Ok(Self {
            id,
            shared,
            display_rx,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The currently displayed, possibly corrupted, text
    pub fn display(&self) -> String {
        self.display_rx.borrow().clone()
    }

    /// Receiver that is notified on every display change
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display_rx.clone()
    }

    pub async fn source(&self) -> String {
        self.shared.lock().await.state.source().to_string()
    }

    pub async fn intensity(&self) -> Intensity {
        self.shared.lock().await.state.intensity()
    }

    pub async fn phase(&self) -> GlitchPhase {
        self.shared.lock().await.state.phase()
    }

    pub async fn pending(&self) -> Option<CorruptionEvent> {
        self.shared.lock().await.state.pending().cloned()
    }

    pub async fn stats(&self) -> GlitchStats {
        self.shared.lock().await.state.stats()
    }

    /// Register an observer for display changes
    pub async fn observe(&self, observer: Arc<dyn DisplayObserver>) -> ObserverId {
        let mut inner = self.shared.lock().await;
        inner.next_observer_id += 1;
        let id = ObserverId(inner.next_observer_id);
        inner.observers.push((id, observer));
        id
    }

    /// Unregister an observer. Returns false if it was not registered.
    pub async fn remove_observer(&self, id: ObserverId) -> bool {
        let mut inner = self.shared.lock().await;
        let before = inner.observers.len();
        inner.observers.retain(|(observer_id, _)| *observer_id != id);
        inner.observers.len() != before
    }

    pub async fn set_source(&self, source: impl Into<String>) {
        let mut inner = self.shared.lock().await;
        let intensity = inner.state.intensity();
        inner.reconfigure(&self.shared, source.into(), intensity);
    }

    pub async fn set_intensity(&self, intensity: Intensity) {
        let mut inner = self.shared.lock().await;
        let source = inner.state.source().to_string();
        inner.reconfigure(&self.shared, source, intensity);
    }

    /// Switch source and intensity. If either changed, any in-flight
    /// corruption is cleared and the tick loop restarts from now.
    pub async fn reconfigure(&self, source: impl Into<String>, intensity: Intensity) {
        let mut inner = self.shared.lock().await;
        inner.reconfigure(&self.shared, source.into(), intensity);
    }

    /// Stop the effect and return the final displayed text.
    ///
    /// No task mutates the display after this returns. With
    /// `restore_on_detach` the source text is shown again, otherwise the
    /// last frame (possibly corrupted) is kept.
    pub async fn detach(self) -> String {
        let mut inner = self.shared.lock().await;
        inner.shut_down();

        tracing::debug!(
            engine_id = %self.id,
            stats = %inner.state.stats(),
            "Glitch engine detached"
        );

        inner.state.display().to_string()
    }
}

impl Drop for GlitchEngine {
    fn drop(&mut self) {
        // Tasks only hold weak references, so they also stop on their own
        // once they fail to upgrade.
        if let Ok(mut inner) = self.shared.try_lock() {
            if inner.attached {
                inner.shut_down();
            }
        }
    }
}

impl std::fmt::Debug for GlitchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlitchEngine")
            .field("id", &self.id)
            .field("display", &*self.display_rx.borrow())
            .finish()
    }
}
