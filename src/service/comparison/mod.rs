//! Comparison engine.
//!
//! Maps two Page Records to raw per-dimension comparisons and scores. Every
//! function here is pure: no I/O, no clock, no shared state.
//!
//! Score ranges:
//! - **SEO**: [10, 100]
//! - **Content**: [0, 90]
//! - **UI/UX**: [10, 100]
//! - **Performance**: [0, 100]

mod content;
mod performance;
mod seo;
mod uiux;

pub use content::{compare_content, content_score};
pub use performance::{compare_performance, performance_score};
pub use seo::{alt_coverage, compare_seo, seo_score, META_OPTIMAL, TITLE_OPTIMAL};
pub use uiux::{compare_uiux, uiux_score};

use crate::domain::comparison::{Comparison, DimensionScores};
use crate::domain::models::{PageOutcome, PageRecord};
use crate::error::{AppError, Result};

/// Stateless engine; construct wherever one is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine;

impl ComparisonEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compare(&self, client: &PageRecord, competitor: &PageRecord) -> Comparison {
        let seo = compare_seo(client, competitor);
        let content = compare_content(client, competitor);
        let uiux = compare_uiux(client, competitor);
        let performance = compare_performance(client, competitor);

        let scores = DimensionScores {
            seo: seo_score(&seo),
            content: content_score(&content),
            uiux: uiux_score(&uiux),
            performance: performance_score(&performance),
        };

        log::debug!(
            "Scores (client/competitor) seo {:.1}/{:.1}, content {:.1}/{:.1}, uiux {:.1}/{:.1}, performance {:.1}/{:.1}",
            scores.seo.client, scores.seo.competitor,
            scores.content.client, scores.content.competitor,
            scores.uiux.client, scores.uiux.competitor,
            scores.performance.client, scores.performance.competitor,
        );

        Comparison {
            seo,
            content,
            uiux,
            performance,
            scores,
        }
    }

    /// Entry point for callers holding raw acquisition outcomes.
    /// A failure record on either side is a precondition violation.
    pub fn compare_outcomes(
        &self,
        client: &PageOutcome,
        competitor: &PageOutcome,
    ) -> Result<Comparison> {
        match (client, competitor) {
            (PageOutcome::Crawled(c), PageOutcome::Crawled(d)) => Ok(self.compare(c, d)),
            _ => Err(AppError::precondition(format!(
                "comparison requires two crawled pages (client failed: {}, competitor failed: {})",
                client.is_failed(),
                competitor.is_failed()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ButtonElement, ImageElement, LinkElement};
    use crate::test_utils::fixtures;
    use serde_json::json;

    fn loaded_page() -> PageRecord {
        let mut page = fixtures::content_page("https://loaded.example", 5000, 40, 40, 20);
        page.title = "T".repeat(45);
        page.meta_description = "M".repeat(130);
        page.images = vec![ImageElement { src: "a".into(), alt: "a".into(), title: None }];
        page.schema = vec![json!({"@type": "Organization"}); 10];
        page.structured_data_count = 10;
        page.og_title = true;
        page.og_description = true;
        page.has_media_queries = true;
        page.navigation_links = vec![LinkElement::default(); 30];
        page.buttons = vec![ButtonElement { text: "Buy".into(), href: None }; 20];
        page
    }

    fn slow_page() -> PageRecord {
        fixtures::timed_page("https://slow.example", 90_000.0, 80_000.0, 70_000.0)
    }

    #[test]
    fn comparison_is_deterministic() {
        let engine = ComparisonEngine::new();
        let a = loaded_page();
        let b = fixtures::timed_page("https://b.example", 1200.0, 900.0, 300.0);

        let first = serde_json::to_string(&engine.compare(&a, &b)).unwrap();
        let second = serde_json::to_string(&engine.compare(&a, &b)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn scores_stay_within_bounds() {
        let engine = ComparisonEngine::new();
        let cases = [
            (loaded_page(), slow_page()),
            (fixtures::page("https://bare.example"), loaded_page()),
            (slow_page(), fixtures::page("https://bare.example")),
        ];

        for (client, competitor) in &cases {
            let scores = engine.compare(client, competitor).scores;
            assert!((10.0..=100.0).contains(&scores.seo.client));
            assert!((10.0..=100.0).contains(&scores.seo.competitor));
            assert!((0.0..=90.0).contains(&scores.content.client));
            assert!((0.0..=90.0).contains(&scores.content.competitor));
            assert!((10.0..=100.0).contains(&scores.uiux.client));
            assert!((10.0..=100.0).contains(&scores.uiux.competitor));
            assert!((0.0..=100.0).contains(&scores.performance.client));
            assert!((0.0..=100.0).contains(&scores.performance.competitor));
        }
    }

    #[test]
    fn extremes_reach_the_edges() {
        let scores = ComparisonEngine::new()
            .compare(&loaded_page(), &slow_page())
            .scores;

        assert_eq!(scores.seo.client, 100.0);
        assert_eq!(scores.content.client, 90.0);
        assert_eq!(scores.uiux.client, 100.0);
        assert_eq!(scores.performance.competitor, 0.0);
        assert_eq!(scores.content.competitor, 0.0);
    }

    #[test]
    fn failure_record_is_a_precondition_violation() {
        let engine = ComparisonEngine::new();
        let ok = PageOutcome::Crawled(fixtures::page("https://ok.example"));
        let failed = PageOutcome::failed("https://down.example", "connection refused");

        let err = engine.compare_outcomes(&ok, &failed).unwrap_err();
        assert!(matches!(err, AppError::PreconditionViolation(_)));
        assert!(engine.compare_outcomes(&failed, &failed).is_err());
        assert!(engine.compare_outcomes(&ok, &ok).is_ok());
    }
}
