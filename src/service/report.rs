//! Report assembly: brand names, winner reconciliation, summary.
//!
//! The assembler is the only place where winner labels turn into presentation
//! names. Per-dimension winners always come from the [`Verdict`]; what the
//! narrative claimed survives only as `narrativeWinner`.

use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::domain::comparison::{Comparison, CompressedComparison};
use crate::domain::models::{Paired, PageRecord, Winner};
use crate::domain::narrative::{DimensionNarrative, NarrativeEnvelope};
use crate::domain::report::{
    PageSummary, QuickStats, ReconciledDimension, ReconciledNarrative, Report, ReportSummary,
    WinnerNames,
};
use crate::service::aggregator::{DimensionWinners, Verdict};

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digit regex"))
}

fn word_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w").expect("valid word-start regex"))
}

/// Human-friendly brand name derived from a URL.
///
/// `https://www.example-shop123.com/page` becomes `Example Shop²`. Anything
/// that does not parse as a URL with a host is returned unchanged.
pub fn brand_name(raw_url: &str) -> String {
    let host = match Url::parse(raw_url) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return raw_url.to_string(),
        },
        Err(e) => {
            log::debug!("Brand name fallback for {:?}: {}", raw_url, e);
            return raw_url.to_string();
        }
    };

    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next().unwrap_or(host).replace('-', " ");
    let label = digit_run().replace_all(&label, "²");

    word_start()
        .replace_all(&label, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Replace every narrative winner with the authoritative one, by name.
///
/// Without authoritative winners the narrative's own labels are rendered.
pub fn reconcile(
    envelope: NarrativeEnvelope,
    authoritative: Option<&DimensionWinners>,
    names: &Paired<String>,
) -> ReconciledNarrative {
    let pick = |narrative: Winner, scored: Option<Winner>| scored.unwrap_or(narrative);
    let dimension = |d: DimensionNarrative, scored: Option<Winner>| ReconciledDimension {
        winner: pick(d.winner, scored).display_name(names).to_string(),
        narrative_winner: d.winner,
        findings: d.findings,
    };

    ReconciledNarrative {
        executive_summary: envelope.executive_summary,
        seo_comparison: dimension(envelope.seo_comparison, authoritative.map(|w| w.seo)),
        content_comparison: dimension(envelope.content_comparison, authoritative.map(|w| w.content)),
        uiux_comparison: dimension(envelope.uiux_comparison, authoritative.map(|w| w.uiux)),
        performance_comparison: dimension(
            envelope.performance_comparison,
            authoritative.map(|w| w.performance),
        ),
        what_competitor_does_better: envelope.what_competitor_does_better,
        what_client_does_better: envelope.what_client_does_better,
        recommendations: envelope.recommendations,
        degraded: envelope.degraded,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(
        &self,
        client: &PageRecord,
        competitor: &PageRecord,
        comparison: Comparison,
        verdict: &Verdict,
        envelope: NarrativeEnvelope,
    ) -> Report {
        let urls = Paired::new(client.url.clone(), competitor.url.clone());
        let brand_names = urls.map(|url| brand_name(url));

        let w = &verdict.winners;
        let winners = WinnerNames {
            seo: w.seo.display_name(&brand_names).to_string(),
            content: w.content.display_name(&brand_names).to_string(),
            uiux: w.uiux.display_name(&brand_names).to_string(),
            performance: w.performance.display_name(&brand_names).to_string(),
        };

        let analysis = reconcile(envelope, Some(w), &brand_names);

        let summary = ReportSummary {
            overall_winner: verdict.overall.display_name(&brand_names).to_string(),
            overall_label: verdict.overall,
            quick_stats: Paired::new(QuickStats::from(client), QuickStats::from(competitor)),
        };

        let report = Report {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            crawl_data: Paired::new(PageSummary::from(client), PageSummary::from(competitor)),
            compressed_comparison: CompressedComparison::from(&comparison),
            comparison,
            urls,
            brand_names,
            winners,
            analysis,
            summary,
        };

        log::info!(
            "Report {} built: overall winner {}",
            report.id,
            report.summary.overall_winner
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::aggregator::ScoreAggregator;
    use crate::service::comparison::ComparisonEngine;
    use crate::test_utils::fixtures;
    use Winner::{Client, Competitor, Tie};

    #[test]
    fn brand_names_from_urls() {
        assert_eq!(brand_name("https://www.example-shop123.com/page"), "Example Shop²");
        assert_eq!(brand_name("https://acme.io"), "Acme");
        assert_eq!(brand_name("http://blog.my-site.co.uk/x?y=1"), "Blog");
        assert_eq!(brand_name("not a url"), "not a url");
        assert_eq!(brand_name("mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn reconcile_overrides_narrative_winners() {
        let mut envelope = NarrativeEnvelope::default();
        envelope.seo_comparison.winner = Client;
        envelope.content_comparison.winner = Client;
        envelope.uiux_comparison.winner = Tie;
        envelope.performance_comparison.winner = Competitor;

        let scored = DimensionWinners {
            seo: Competitor,
            content: Client,
            uiux: Competitor,
            performance: Tie,
        };
        let names = Paired::new("Acme".to_string(), "Rival".to_string());

        let out = reconcile(envelope, Some(&scored), &names);

        assert_eq!(out.seo_comparison.winner, "Rival");
        assert_eq!(out.seo_comparison.narrative_winner, Client);
        assert_eq!(out.content_comparison.winner, "Acme");
        assert_eq!(out.uiux_comparison.winner, "Rival");
        assert_eq!(out.performance_comparison.winner, "Tie");
        assert_eq!(out.performance_comparison.narrative_winner, Competitor);
    }

    #[test]
    fn reconcile_without_authority_renders_narrative_labels() {
        let mut envelope = NarrativeEnvelope::default();
        envelope.uiux_comparison.winner = Competitor;
        let names = Paired::new("Acme".to_string(), "Rival".to_string());

        let out = reconcile(envelope, None, &names);
        assert_eq!(out.uiux_comparison.winner, "Rival");
        assert_eq!(out.seo_comparison.winner, "Tie");
    }

    #[test]
    fn assembled_summary_matches_verdict() {
        let (client, competitor) = fixtures::scenario_pair();
        let comparison = ComparisonEngine::new().compare(&client, &competitor);
        let verdict = ScoreAggregator::new().aggregate(&comparison.scores);

        let report = ReportAssembler::new().assemble(
            &client,
            &competitor,
            comparison,
            &verdict,
            NarrativeEnvelope::degraded(),
        );

        assert_eq!(report.summary.overall_label, verdict.overall);
        assert_eq!(
            report.summary.overall_winner,
            verdict.overall.display_name(&report.brand_names)
        );
        assert_eq!(report.summary.quick_stats.client.word_count, client.word_count);
        assert_eq!(report.analysis.content_comparison.winner, report.winners.content);
        assert!(report.analysis.degraded);
        assert_eq!(report.crawl_data.competitor.url, competitor.url);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("compressedComparison").is_some());
        assert!(json["comparison"]["scores"]["seo"]["client"].is_number());
        assert_eq!(json["summary"]["overallLabel"], verdict.overall.as_str());
    }
}
