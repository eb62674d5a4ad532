//! Score state and the predicates derived from it.
//!
//! The score is owned by whoever receives messages; the simulation only
//! reads it. `max_score <= 0` or a non-finite value means "no score yet":
//! the percentage is 0 and celebration is never active, so no NaN ever
//! reaches colour or spawn logic.

use serde::{Deserialize, Serialize};

use crate::protocol::ScoreReport;

/// Latest known score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Points achieved.
    pub score: f64,
    /// Points available.
    pub max_score: f64,
}

impl ScoreState {
    /// Creates a score state.
    #[must_use]
    pub const fn new(score: f64, max_score: f64) -> Self {
        Self { score, max_score }
    }

    /// Returns true once a usable score has been received.
    ///
    /// Both values must be finite and `max_score` positive.
    #[must_use]
    pub fn has_score(&self) -> bool {
        self.score.is_finite() && self.max_score.is_finite() && self.max_score > 0.0
    }

    /// Score ratio in `[0, ..]`, 0 when no score is known.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.has_score() {
            self.score / self.max_score
        } else {
            0.0
        }
    }

    /// Score as a percentage, 0 when no score is known.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.ratio() * 100.0
    }

    /// Returns true if the ratio meets the celebration threshold.
    #[must_use]
    pub fn is_celebration(&self, threshold: f64) -> bool {
        self.has_score() && self.ratio() >= threshold
    }

    /// Tier used by the scorecard.
    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_percentage(self.percentage())
    }
}

impl From<ScoreReport> for ScoreState {
    fn from(report: ScoreReport) -> Self {
        Self::new(report.score, report.max_score)
    }
}

/// Scorecard tier selected by percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    /// 90% and above.
    Excellent,
    /// 60% up to 90%.
    Good,
    /// Anything above zero below 60%.
    NeedsWork,
    /// No score yet, or zero.
    Pending,
}

impl ScoreTier {
    /// Maps a percentage to a tier.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 60.0 {
            Self::Good
        } else if percentage > 0.0 {
            Self::NeedsWork
        } else {
            Self::Pending
        }
    }

    /// Hue of the headline for this tier (degrees).
    #[must_use]
    pub const fn hue(self) -> f32 {
        match self {
            Self::Excellent => 60.0,
            Self::Good => 120.0,
            Self::NeedsWork | Self::Pending => 0.0,
        }
    }
}
