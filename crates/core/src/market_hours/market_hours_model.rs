use std::fmt;

use serde::Serialize;

/// Trading session of the reference exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPhase {
    Regular,
    Extended,
    Closed,
}

impl MarketPhase {
    /// Minutes between scheduled refreshes during this phase.
    pub fn interval_minutes(&self) -> u32 {
        match self {
            Self::Regular => 3,
            Self::Extended => 10,
            Self::Closed => 30,
        }
    }
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Extended => write!(f, "extended"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of classifying one moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClassification {
    pub phase: MarketPhase,
    pub interval_minutes: u32,
}

impl From<MarketPhase> for SessionClassification {
    fn from(phase: MarketPhase) -> Self {
        Self {
            phase,
            interval_minutes: phase.interval_minutes(),
        }
    }
}

/// High-activity windows around the open and the close.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakWindow {
    Open,
    Close,
}

impl PeakWindow {
    /// First and last exchange-local hour covered by the window.
    pub fn hours(&self) -> (u32, u32) {
        match self {
            Self::Open => (9, 10),
            Self::Close => (15, 16),
        }
    }
}

impl fmt::Display for PeakWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
        }
    }
}
