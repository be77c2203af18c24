//! Terminal text rendering
//!
//! Turns a [`DashboardSnapshot`] into a plain-text frame. The radar chart is
//! drawn as one horizontal bar per axis.

use std::fmt;

use super::board::DashboardSnapshot;
use super::widgets::{MessageLevel, PersonalityTrait};

/// Width of a full personality bar, in cells
pub const BAR_WIDTH: usize = 20;

const RULE_WIDTH: usize = 64;

/// Render a snapshot to a string
pub fn render_text(snapshot: &DashboardSnapshot) -> String {
    TextFrame(snapshot).to_string()
}

/// Horizontal bar for one personality axis
pub fn bar(t: &PersonalityTrait) -> String {
    let filled = ((t.ratio() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Display adapter for a snapshot
pub struct TextFrame<'a>(pub &'a DashboardSnapshot);

impl TextFrame<'_> {
    fn section(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "── {} {}", name, "─".repeat(RULE_WIDTH.saturating_sub(name.len() + 4)))
    }
}

impl fmt::Display for TextFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;

        writeln!(f, "{}", "═".repeat(RULE_WIDTH))?;
        writeln!(f, "  {}", s.title)?;
        writeln!(f, "  {}", s.subtitle)?;
        let actions: Vec<String> = s.actions.iter().map(|a| format!("[ {} ]", a)).collect();
        writeln!(f, "  {}", actions.join(" "))?;
        writeln!(f, "{}", "═".repeat(RULE_WIDTH))?;

        Self::section(f, "STATUS")?;
        for card in &s.cards {
            writeln!(
                f,
                "  {:<18} {:<16} SYSTEM_STATUS: {}",
                card.title.to_uppercase(),
                card.value,
                card.status.to_string().to_uppercase()
            )?;
        }

        Self::section(f, "FEED")?;
        writeln!(f, "  {}  ● {}", s.live_feed, s.live_feed_status)?;

        Self::section(f, "PERSONALITY TENSOR")?;
        writeln!(f, "  {:>w$}", s.radar_tag, w = RULE_WIDTH - 2)?;
        for t in &s.personality {
            writeln!(f, "  {:<14} {} {:>3}", t.subject, bar(t), t.value)?;
        }

        Self::section(f, "TELEMETRY")?;
        let tiles: Vec<String> = s
            .telemetry
            .iter()
            .map(|tile| format!("{} {}", tile.label, tile.value))
            .collect();
        writeln!(f, "  {}", tiles.join("   "))?;

        Self::section(f, "SYSTEM MESSAGES")?;
        for message in &s.messages {
            let marker = match message.level {
                MessageLevel::Info => "",
                MessageLevel::Warning => "!! ",
                MessageLevel::Ready => ">> ",
            };
            writeln!(f, "  [{}] > {}{}", message.time, marker, message.text)?;
        }

        Self::section(f, "DEVELOPMENT TREE")?;
        for node in &s.tech_tree {
            writeln!(f, "  {} {:<26} {}", node.status.marker(), node.title, node.status)?;
            writeln!(f, "      {}", node.description)?;
        }

        Ok(())
    }
}
