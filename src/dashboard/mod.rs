//! Glitchboard Dashboard
//!
//! The rendering surface around the glitch effect:
//!
//! - **widgets**: Static card, radar, message and tree data
//! - **board**: Running dashboard owning one glitch engine per label
//! - **render**: Plain-text frame rendering
//!
//! # Architecture
//!
//! ```text
//!   GlitchEngine ×6 ──observer──▶ mpsc ──▶ Dashboard::next_change
//!                                                │
//!                   Dashboard::snapshot ◀────────┘
//!                          │
//!                     render_text ──▶ stdout
//! ```

pub mod board;
pub mod render;
pub mod widgets;

// Re-export commonly used types
pub use board::{CardView, Dashboard, DashboardSnapshot, GlitchSlot};
pub use render::{render_text, TextFrame};
pub use widgets::{
    CardStatus, MessageLevel, NodeStatus, PersonalityTrait, StatusCard, SystemMessage, TechNode,
    TelemetryTile,
};
