//! Performance dimension: page timings, lower is better.

use crate::domain::comparison::{DimensionScore, PerformanceComparison, TimingDuel};
use crate::domain::models::{Paired, PageRecord, PerformanceTiming, Winner};

const LOAD_WEIGHT: f64 = 0.4;
const DOM_CONTENT_LOADED_WEIGHT: f64 = 0.3;
const FIRST_PAINT_WEIGHT: f64 = 0.3;

pub fn compare_performance(client: &PageRecord, competitor: &PageRecord) -> PerformanceComparison {
    let c = client.performance.normalized();
    let d = competitor.performance.normalized();

    PerformanceComparison {
        load_time: duel(c.load_time, d.load_time),
        dom_content_loaded: duel(c.dom_content_loaded, d.dom_content_loaded),
        first_paint: duel(c.first_paint, d.first_paint),
    }
}

fn duel(client: f64, competitor: f64) -> TimingDuel {
    TimingDuel {
        client,
        competitor,
        winner: Winner::lower_is_better(client, competitor),
    }
}

/// Range [0, 100].
pub fn performance_score(perf: &PerformanceComparison) -> DimensionScore {
    Paired::new(
        side_score(&PerformanceTiming::new(
            perf.load_time.client,
            perf.dom_content_loaded.client,
            perf.first_paint.client,
        )),
        side_score(&PerformanceTiming::new(
            perf.load_time.competitor,
            perf.dom_content_loaded.competitor,
            perf.first_paint.competitor,
        )),
    )
}

fn side_score(timing: &PerformanceTiming) -> f64 {
    factor(timing.load_time) * LOAD_WEIGHT
        + factor(timing.dom_content_loaded) * DOM_CONTENT_LOADED_WEIGHT
        + factor(timing.first_paint) * FIRST_PAINT_WEIGHT
}

/// 100 at 0 ms, losing one point per 30 ms, floored at zero (3 s and slower).
fn factor(ms: f64) -> f64 {
    (100.0 - ms / 30.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn factor_clamps_slow_metrics() {
        assert_eq!(factor(0.0), 100.0);
        assert_eq!(factor(300.0), 90.0);
        assert_eq!(factor(3000.0), 0.0);
        assert_eq!(factor(90_000.0), 0.0);
    }

    #[test]
    fn sub_winners_lower_is_better_with_ties() {
        let client = fixtures::timed_page("https://a.example", 800.0, 600.0, 400.0);
        let competitor = fixtures::timed_page("https://b.example", 3000.0, 600.0, 200.0);

        let perf = compare_performance(&client, &competitor);
        assert_eq!(perf.load_time.winner, Winner::Client);
        assert_eq!(perf.dom_content_loaded.winner, Winner::Tie);
        assert_eq!(perf.first_paint.winner, Winner::Competitor);
    }

    #[test]
    fn unmeasured_page_scores_full_marks() {
        let page = fixtures::page("https://zero.example");
        let score = performance_score(&compare_performance(&page, &page));
        assert!((score.client - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_sum_matches_formula() {
        let client = fixtures::timed_page("https://a.example", 800.0, 600.0, 400.0);
        let competitor = fixtures::timed_page("https://b.example", 3000.0, 2500.0, 2000.0);
        let score = performance_score(&compare_performance(&client, &competitor));

        let expected_client = (100.0 - 800.0 / 30.0) * 0.4
            + (100.0 - 600.0 / 30.0) * 0.3
            + (100.0 - 400.0 / 30.0) * 0.3;
        let expected_competitor = 0.0 * 0.4
            + (100.0 - 2500.0 / 30.0) * 0.3
            + (100.0 - 2000.0 / 30.0) * 0.3;

        assert!((score.client - expected_client).abs() < 1e-9);
        assert!((score.competitor - expected_competitor).abs() < 1e-9);
        assert!(score.client > score.competitor);
    }
}
