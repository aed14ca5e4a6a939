//! Score aggregator: authoritative per-dimension winners and the overall
//! winner.
//!
//! [`overall_winner`] is the single implementation of the majority rule.
//! Anything that needs an overall verdict (report body, summary) goes through
//! [`Verdict`] instead of recomputing it.

use serde::Serialize;

use crate::domain::comparison::DimensionScores;
use crate::domain::models::Winner;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DimensionWinners {
    pub seo: Winner,
    pub content: Winner,
    pub uiux: Winner,
    pub performance: Winner,
}

impl DimensionWinners {
    pub fn from_scores(scores: &DimensionScores) -> Self {
        Self {
            seo: Winner::from_scores(scores.seo.client, scores.seo.competitor),
            content: Winner::from_scores(scores.content.client, scores.content.competitor),
            uiux: Winner::from_scores(scores.uiux.client, scores.uiux.competitor),
            performance: Winner::from_scores(
                scores.performance.client,
                scores.performance.competitor,
            ),
        }
    }

    pub fn as_array(&self) -> [Winner; 4] {
        [self.seo, self.content, self.uiux, self.performance]
    }
}

/// Majority vote across dimension winners. Ties count for neither side and
/// equal counts (2-2, 1-1, 0-0) are a tie.
pub fn overall_winner(winners: &DimensionWinners) -> Winner {
    let labels = winners.as_array();
    let client = labels.iter().filter(|w| **w == Winner::Client).count();
    let competitor = labels.iter().filter(|w| **w == Winner::Competitor).count();

    match client.cmp(&competitor) {
        std::cmp::Ordering::Greater => Winner::Client,
        std::cmp::Ordering::Less => Winner::Competitor,
        std::cmp::Ordering::Equal => Winner::Tie,
    }
}

/// Aggregator output for one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub winners: DimensionWinners,
    pub overall: Winner,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, scores: &DimensionScores) -> Verdict {
        let winners = DimensionWinners::from_scores(scores);
        Verdict {
            winners,
            overall: overall_winner(&winners),
        }
    }
}
