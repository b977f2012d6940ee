use serde::{Deserialize, Serialize};

const DEFAULT_DEAD_ZONE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub magnitude: u8,
}

impl TrendResult {
    const fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            magnitude: 0,
        }
    }
}

/// Width of the band within which a score change reads as stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPolicy {
    pub dead_zone: u8,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrendEvaluator {
    policy: TrendPolicy,
}

impl TrendEvaluator {
    pub fn new(policy: TrendPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TrendPolicy {
        self.policy
    }

    pub fn trend(&self, current: u8, previous: Option<u8>) -> TrendResult {
        let Some(previous) = previous else {
            return TrendResult::stable();
        };

        let delta = i16::from(current) - i16::from(previous);
        let magnitude = delta.unsigned_abs() as u8;

        if magnitude <= self.policy.dead_zone {
            // Stable results keep magnitude 0 so no-history and noise look the same.
            TrendResult::stable()
        } else if delta > 0 {
            TrendResult {
                direction: TrendDirection::Up,
                magnitude,
            }
        } else {
            TrendResult {
                direction: TrendDirection::Down,
                magnitude,
            }
        }
    }
}

pub fn trend(current: u8, previous: Option<u8>) -> TrendResult {
    TrendEvaluator::default().trend(current, previous)
}
