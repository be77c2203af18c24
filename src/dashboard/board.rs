//! Live dashboard state
//!
//! Owns one [`GlitchEngine`] per glitching label (header title, live feed
//! label, each status card value) and funnels their display changes into a
//! single channel the renderer can wait on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::widgets::{
    CardStatus, PersonalityTrait, StatusCard, SystemMessage, TechNode, TelemetryTile,
    HEADER_ACTIONS, LIVE_FEED_INTENSITY, LIVE_FEED_LABEL, LIVE_FEED_STATUS, PERSONALITY,
    RADAR_TAG, STATUS_CARDS, SYSTEM_MESSAGES, TECH_TREE, TELEMETRY,
};
use crate::config::Config;
use crate::glitch::{
    boxed_rng, ChannelObserver, DisplayChange, DisplayObserver, GlitchEngine, GlitchResult,
    GlitchRng, GlitchStats, Intensity,
};

/// Which label an engine drives
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "slot", content = "index", rename_all = "snake_case")]
pub enum GlitchSlot {
    Title,
    LiveFeed,
    Card(usize),
}

impl std::fmt::Display for GlitchSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlitchSlot::Title => write!(f, "title"),
            GlitchSlot::LiveFeed => write!(f, "live_feed"),
            GlitchSlot::Card(i) => write!(f, "card[{}]", i),
        }
    }
}

/// Status card as currently displayed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub title: &'static str,
    pub status: CardStatus,
    pub value: String,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub captured_at: DateTime<Utc>,
    pub title: String,
    pub subtitle: String,
    pub actions: Vec<&'static str>,
    pub live_feed: String,
    pub live_feed_status: &'static str,
    pub cards: Vec<CardView>,
    pub radar_tag: &'static str,
    pub personality: Vec<PersonalityTrait>,
    pub messages: Vec<SystemMessage>,
    pub telemetry: Vec<TelemetryTile>,
    pub tech_tree: Vec<TechNode>,
}

/// Running dashboard
pub struct Dashboard {
    subtitle: String,
    engines: Vec<(GlitchSlot, GlitchEngine)>,
    changes: mpsc::UnboundedReceiver<DisplayChange>,
}

impl Dashboard {
    /// Start all glitch engines with the configured random source.
    ///
    /// With a configured seed each engine gets `seed + index`, so runs are
    /// reproducible without every label glitching in lockstep.
    pub async fn start(config: &Config) -> GlitchResult<Self> {
        let seed = config.glitch.seed;
        Self::start_with(config, |index| {
            boxed_rng(seed.map(|s| s.wrapping_add(index as u64)))
        })
        .await
    }

    /// Start all glitch engines, asking `rng_for(index)` for each random source.
    ///
    /// Index 0 is the title, 1 the live feed label, then one per status card.
    pub async fn start_with<F>(config: &Config, mut rng_for: F) -> GlitchResult<Self>
    where
        F: FnMut(usize) -> Box<dyn GlitchRng>,
    {
        let engine_config = config.glitch.engine_config();
        let (observer, changes) = ChannelObserver::channel();
        let observer: Arc<dyn DisplayObserver> = Arc::new(observer);

        let mut targets: Vec<(GlitchSlot, String, Intensity)> = vec![
            (
                GlitchSlot::Title,
                config.dashboard.title.clone(),
                config.glitch.intensity(),
            ),
            (
                GlitchSlot::LiveFeed,
                LIVE_FEED_LABEL.to_string(),
                LIVE_FEED_INTENSITY,
            ),
        ];
        targets.extend(STATUS_CARDS.iter().enumerate().map(|(i, card)| {
            (GlitchSlot::Card(i), card.value.to_string(), StatusCard::INTENSITY)
        }));

        let mut engines = Vec::with_capacity(targets.len());
        for (index, (slot, text, intensity)) in targets.into_iter().enumerate() {
            let engine =
                GlitchEngine::attach(text, intensity, engine_config.clone(), rng_for(index))
                    .await?;
            engine.observe(Arc::clone(&observer)).await;
            tracing::debug!(slot = %slot, engine_id = %engine.id(), "Attached glitch engine");
            engines.push((slot, engine));
        }

        tracing::info!(engines = engines.len(), "Dashboard started");

        Ok(Self {
            subtitle: config.dashboard.subtitle.clone(),
            engines,
            changes,
        })
    }

    /// Current text for a slot, empty if the slot does not exist
    pub fn display(&self, slot: GlitchSlot) -> String {
        self.engines
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, engine)| engine.display())
            .unwrap_or_default()
    }

    /// Slot driven by the given engine
    pub fn slot_of(&self, engine_id: &str) -> Option<GlitchSlot> {
        self.engines
            .iter()
            .find(|(_, engine)| engine.id() == engine_id)
            .map(|(slot, _)| *slot)
    }

    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Wait for the next display change on any label
    pub async fn next_change(&mut self) -> Option<DisplayChange> {
        self.changes.recv().await
    }

    /// Capture the current frame
    pub fn snapshot(&self) -> DashboardSnapshot {
        let cards = STATUS_CARDS
            .iter()
            .enumerate()
            .map(|(i, card)| CardView {
                title: card.title,
                status: card.status,
                value: self.display(GlitchSlot::Card(i)),
            })
            .collect();

        DashboardSnapshot {
            captured_at: Utc::now(),
            title: self.display(GlitchSlot::Title),
            subtitle: self.subtitle.clone(),
            actions: HEADER_ACTIONS.to_vec(),
            live_feed: self.display(GlitchSlot::LiveFeed),
            live_feed_status: LIVE_FEED_STATUS,
            cards,
            radar_tag: RADAR_TAG,
            personality: PERSONALITY.to_vec(),
            messages: SYSTEM_MESSAGES.to_vec(),
            telemetry: TELEMETRY.to_vec(),
            tech_tree: TECH_TREE.to_vec(),
        }
    }

    /// Per-engine counters
    pub async fn stats(&self) -> Vec<(GlitchSlot, GlitchStats)> {
        let mut stats = Vec::with_capacity(self.engines.len());
        for (slot, engine) in &self.engines {
            stats.push((*slot, engine.stats().await));
        }
        stats
    }

    /// Detach every engine and return the final frame
    pub async fn shutdown(self) -> DashboardSnapshot {
        let frame = self.snapshot();

        let mut title = frame.title.clone();
        let mut live_feed = frame.live_feed.clone();
        let mut cards = frame.cards.clone();

        for (slot, engine) in self.engines {
            let stats = engine.stats().await;
            let last = engine.detach().await;
            tracing::debug!(slot = %slot, stats = %stats, "Detached glitch engine");

            match slot {
                GlitchSlot::Title => title = last,
                GlitchSlot::LiveFeed => live_feed = last,
                GlitchSlot::Card(i) => {
                    if let Some(card) = cards.get_mut(i) {
                        card.value = last;
                    }
                }
            }
        }

        tracing::info!("Dashboard stopped");

        DashboardSnapshot {
            title,
            live_feed,
            cards,
            ..frame
        }
    }
}
