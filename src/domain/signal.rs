//! Trading signals emitted by the rule evaluator.

use chrono::NaiveDateTime;
use std::fmt;

pub const MAX_CONFIDENCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Buy,
    Sell,
    Alert,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::Alert => "ALERT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyTag {
    MaCrossover,
    VolumeSpike,
    Breakout,
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyTag::MaCrossover => "MA_Crossover",
            StrategyTag::VolumeSpike => "Volume_Spike",
            StrategyTag::Breakout => "Breakout",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverType {
    Bullish,
    Bearish,
}

impl fmt::Display for CrossoverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverType::Bullish => f.write_str("bullish"),
            CrossoverType::Bearish => f.write_str("bearish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakoutDirection {
    Upward,
    Downward,
}

impl fmt::Display for BreakoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakoutDirection::Upward => f.write_str("upward"),
            BreakoutDirection::Downward => f.write_str("downward"),
        }
    }
}

/// Strategy-specific details. The variant determines the strategy tag.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalMetadata {
    MaCrossover {
        ma_value: f64,
        ma_period: usize,
        crossover: CrossoverType,
    },
    VolumeSpike {
        current_volume: f64,
        average_volume: f64,
        volume_ratio: f64,
    },
    /// `level` is resistance for an upward break, support for a downward one.
    Breakout {
        level: f64,
        direction: BreakoutDirection,
    },
}

impl SignalMetadata {
    pub fn strategy(&self) -> StrategyTag {
        match self {
            SignalMetadata::MaCrossover { .. } => StrategyTag::MaCrossover,
            SignalMetadata::VolumeSpike { .. } => StrategyTag::VolumeSpike,
            SignalMetadata::Breakout { .. } => StrategyTag::Breakout,
        }
    }

    pub fn resistance_level(&self) -> Option<f64> {
        match self {
            SignalMetadata::Breakout {
                level,
                direction: BreakoutDirection::Upward,
            } => Some(*level),
            _ => None,
        }
    }

    pub fn support_level(&self) -> Option<f64> {
        match self {
            SignalMetadata::Breakout {
                level,
                direction: BreakoutDirection::Downward,
            } => Some(*level),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub kind: SignalKind,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub message: String,
    confidence: f64,
    pub metadata: SignalMetadata,
}

impl Signal {
    pub fn new(
        symbol: impl Into<String>,
        kind: SignalKind,
        price: f64,
        timestamp: NaiveDateTime,
        message: String,
        confidence: f64,
        metadata: SignalMetadata,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            price,
            timestamp,
            message,
            confidence: clamp_confidence(confidence),
            metadata,
        }
    }

    pub fn strategy(&self) -> StrategyTag {
        self.metadata.strategy()
    }

    /// Always within `[0, MAX_CONFIDENCE]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] @ {:.2} (confidence {:.1}): {}",
            self.kind,
            self.symbol,
            self.strategy(),
            self.price,
            self.confidence,
            self.message
        )
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_CONFIDENCE)
    } else {
        0.0
    }
}
