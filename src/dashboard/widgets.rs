//! Static dashboard widgets
//!
//! Every value shown on the dashboard is fixed. This module holds that data:
//! status cards, the personality tensor, system messages, telemetry tiles and
//! the development tree.

use serde::Serialize;

use crate::glitch::Intensity;

/// Health of a status card
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Warning,
    Critical,
    Offline,
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::Active => write!(f, "active"),
            CardStatus::Warning => write!(f, "warning"),
            CardStatus::Critical => write!(f, "critical"),
            CardStatus::Offline => write!(f, "offline"),
        }
    }
}

/// A status card; its value glitches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusCard {
    pub title: &'static str,
    pub status: CardStatus,
    pub value: &'static str,
}

impl StatusCard {
    /// Card values always glitch at low intensity
    pub const INTENSITY: Intensity = Intensity::Low;
}

pub const STATUS_CARDS: [StatusCard; 4] = [
    StatusCard {
        title: "Core Engine",
        status: CardStatus::Active,
        value: "OPERATIONAL",
    },
    StatusCard {
        title: "Emotional State",
        status: CardStatus::Warning,
        value: "HYPER-CHAOTIC",
    },
    StatusCard {
        title: "Git Sync",
        status: CardStatus::Active,
        value: "CONNECTED",
    },
    StatusCard {
        title: "System Load",
        status: CardStatus::Critical,
        value: "98.4%",
    },
];

/// Live feed panel label and its status line
pub const LIVE_FEED_LABEL: &str = "LIVE_FEED";
pub const LIVE_FEED_INTENSITY: Intensity = Intensity::Low;
pub const LIVE_FEED_STATUS: &str = "TRANSMITTING";

/// Header action buttons
pub const HEADER_ACTIONS: [&str; 2] = ["SYSTEM_LOGS", "INITIATE_LINK"];

/// Tag shown in the corner of the personality radar
pub const RADAR_TAG: &str = "LIVE_TENSOR_FEED";

/// One axis of the personality radar
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PersonalityTrait {
    pub subject: &'static str,
    pub value: u8,
    pub full_mark: u8,
}

impl PersonalityTrait {
    const fn new(subject: &'static str, value: u8) -> Self {
        Self {
            subject,
            value,
            full_mark: 100,
        }
    }

    /// Value as a fraction of the full mark
    pub fn ratio(&self) -> f64 {
        self.value as f64 / self.full_mark as f64
    }
}

pub const PERSONALITY: [PersonalityTrait; 6] = [
    PersonalityTrait::new("Cheerfulness", 95),
    PersonalityTrait::new("Obsessiveness", 90),
    PersonalityTrait::new("Playfulness", 92),
    PersonalityTrait::new("Chaos", 98),
    PersonalityTrait::new("Vulnerability", 70),
    PersonalityTrait::new("Twisted Love", 85),
];

/// Severity of a scripted system message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
    /// Final line, highlighted as the ready prompt
    Ready,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SystemMessage {
    pub time: &'static str,
    pub text: &'static str,
    pub level: MessageLevel,
}

impl SystemMessage {
    const fn info(time: &'static str, text: &'static str) -> Self {
        Self {
            time,
            text,
            level: MessageLevel::Info,
        }
    }
}

pub const SYSTEM_MESSAGES: [SystemMessage; 8] = [
    SystemMessage::info("10:42:01", "Initializing Live2D subsystem..."),
    SystemMessage::info("10:42:02", "Loading model: toga_v1.moc3"),
    SystemMessage::info("10:42:03", "Physics engine started."),
    SystemMessage {
        time: "10:42:05",
        text: "WARNING: Chaos levels rising.",
        level: MessageLevel::Warning,
    },
    SystemMessage::info("10:42:08", "3D VRM module loaded successfully."),
    SystemMessage::info("10:42:10", "WebSocket connection established on port 8765."),
    SystemMessage::info("10:42:15", "Personality tensor mapped."),
    SystemMessage {
        time: "10:42:16",
        text: "READY FOR INTERACTION.",
        level: MessageLevel::Ready,
    },
];

/// Small numeric tile
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TelemetryTile {
    pub label: &'static str,
    pub value: &'static str,
}

pub const TELEMETRY: [TelemetryTile; 2] = [
    TelemetryTile {
        label: "FPS",
        value: "60.0",
    },
    TelemetryTile {
        label: "LATENCY",
        value: "12ms",
    },
];

/// Progress of a development tree node
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    Completed,
    InProgress,
    Locked,
}

impl NodeStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            NodeStatus::Completed => "[x]",
            NodeStatus::InProgress => "[~]",
            NodeStatus::Locked => "[#]",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Completed => write!(f, "completed"),
            NodeStatus::InProgress => write!(f, "in-progress"),
            NodeStatus::Locked => write!(f, "locked"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TechNode {
    pub id: u8,
    pub title: &'static str,
    pub status: NodeStatus,
    pub description: &'static str,
}

pub const TECH_TREE: [TechNode; 7] = [
    TechNode {
        id: 1,
        title: "Live2D Integration",
        status: NodeStatus::Completed,
        description: "Real-time personality-driven expressions",
    },
    TechNode {
        id: 2,
        title: "3D VRM System",
        status: NodeStatus::Completed,
        description: "Full body animation & physics",
    },
    TechNode {
        id: 3,
        title: "Gradio WebUI",
        status: NodeStatus::Completed,
        description: "Comprehensive control interface",
    },
    TechNode {
        id: 4,
        title: "Docker Containerization",
        status: NodeStatus::Completed,
        description: "Production-ready deployment",
    },
    TechNode {
        id: 5,
        title: "Multimodal Interaction",
        status: NodeStatus::InProgress,
        description: "Voice synthesis & recognition",
    },
    TechNode {
        id: 6,
        title: "Memory Vector DB",
        status: NodeStatus::Locked,
        description: "Long-term context retention",
    },
    TechNode {
        id: 7,
        title: "Swarm Intelligence",
        status: NodeStatus::Locked,
        description: "Multi-agent orchestration",
    },
];
