//! # Scorecard
//!
//! Text and decoration drawn over the fireworks every frame.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  h/2 - 50  │          HEADLINE            │  size 80, tier colour
//!  h/2       │  (pending: last score text)  │  size 50, grey
//!  h/2 + 50  │        Score: s/m            │  size 50, near-white
//!  h/2 + 150 │            ★                 │  excellent tier only
//!            └──────────────────────────────┘
//! ```

use std::f32::consts::TAU;

use fireworks_core::{FrameBatch, Hsba, RenderCommand, Viewport};
use fireworks_shared::{ScoreState, ScoreTier, Vec2};
use serde::{Deserialize, Serialize};

const HEADLINE_SIZE: f32 = 80.0;
const DETAIL_SIZE: f32 = 50.0;
const STAR_OFFSET: f32 = 150.0;
const STAR_INNER_RADIUS: f32 = 20.0;
const STAR_OUTER_RADIUS: f32 = 50.0;
const STAR_POINTS: usize = 5;
const STAR_ALPHA: f32 = 150.0 / 255.0;

const PENDING_COLOR: Hsba = Hsba::new(0.0, 0.0, 70.0, 1.0);
const DETAIL_COLOR: Hsba = Hsba::new(0.0, 0.0, 95.0, 1.0);

/// Wording used by the scorecard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardText {
    /// Headline at 90% and above.
    pub excellent: String,
    /// Headline from 60% up to 90%.
    pub good: String,
    /// Headline above zero below 60%.
    pub needs_work: String,
    /// Prefix of the text shown while no positive score is known.
    pub final_score_label: String,
    /// Prefix of the score line.
    pub score_label: String,
}

impl Default for ScorecardText {
    fn default() -> Self {
        Self {
            excellent: "Congratulations! Outstanding score!".to_owned(),
            good: "Good work, keep it up.".to_owned(),
            needs_work: "Needs more effort!".to_owned(),
            final_score_label: "Final score".to_owned(),
            score_label: "Score".to_owned(),
        }
    }
}

/// Scorecard renderer.
#[derive(Clone, Debug, Default)]
pub struct Scorecard {
    text: ScorecardText,
    /// Text of the last received score, empty until one arrives.
    last_received: String,
}

impl Scorecard {
    /// Creates a scorecard with the given wording.
    #[must_use]
    pub fn new(text: ScorecardText) -> Self {
        Self {
            text,
            last_received: String::new(),
        }
    }

    /// Remembers a received score for the pending tier.
    pub fn record(&mut self, score: &ScoreState) {
        self.last_received = format!(
            "{}: {}/{}",
            self.text.final_score_label, score.score, score.max_score
        );
    }

    /// Text of the last received score.
    #[must_use]
    pub fn last_received(&self) -> &str {
        &self.last_received
    }

    /// Appends the scorecard for `score` to `batch`.
    pub fn render(&self, score: &ScoreState, viewport: Viewport, batch: &mut FrameBatch) {
        let center = viewport.center();
        let tier = score.tier();

        let headline = match tier {
            ScoreTier::Excellent => Some(&self.text.excellent),
            ScoreTier::Good => Some(&self.text.good),
            ScoreTier::NeedsWork => Some(&self.text.needs_work),
            ScoreTier::Pending => None,
        };

        match headline {
            Some(headline) => batch.push(RenderCommand::Text {
                text: headline.clone(),
                position: Vec2::new(center.x, center.y - 50.0),
                size: HEADLINE_SIZE,
                color: Hsba::vivid(tier.hue(), 1.0),
            }),
            None => batch.push(RenderCommand::Text {
                text: self.last_received.clone(),
                position: center,
                size: DETAIL_SIZE,
                color: PENDING_COLOR,
            }),
        }

        if tier == ScoreTier::Excellent {
            batch.push(RenderCommand::Polygon {
                points: star(
                    Vec2::new(center.x, center.y + STAR_OFFSET),
                    STAR_INNER_RADIUS,
                    STAR_OUTER_RADIUS,
                    STAR_POINTS,
                ),
                color: Hsba::vivid(tier.hue(), STAR_ALPHA),
            });
        }

        batch.push(RenderCommand::Text {
            text: format!("{}: {}/{}", self.text.score_label, score.score, score.max_score),
            position: Vec2::new(center.x, center.y + 50.0),
            size: DETAIL_SIZE,
            color: DETAIL_COLOR,
        });
    }
}

/// Vertices of a star, alternating outer and inner radius.
///
/// The first vertex is on the outer radius at angle 0.
#[must_use]
pub fn star(center: Vec2, inner_radius: f32, outer_radius: f32, points: usize) -> Vec<Vec2> {
    let step = TAU / points as f32;
    let half = step / 2.0;

    (0..points)
        .flat_map(|i| {
            let angle = step * i as f32;
            [
                center + Vec2::from_angle(angle) * outer_radius,
                center + Vec2::from_angle(angle + half) * inner_radius,
            ]
        })
        .collect()
}
