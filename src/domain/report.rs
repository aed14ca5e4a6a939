//! Final deliverable shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::comparison::{Comparison, CompressedComparison};
use crate::domain::models::{ButtonElement, LinkElement, Paired, PerformanceTiming, Winner};
use crate::domain::narrative::{Findings, Recommendation};

// ====== Sanitized crawl data ======

/// Transport-sized summary of one Page Record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub word_count: u64,
    pub image_count: usize,
    pub images_with_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub buttons: Vec<ButtonElement>,
    pub navigation_links: Vec<LinkElement>,
    pub schema_types: Vec<String>,
    pub structured_data_count: usize,
    pub performance: PerformanceTiming,
    pub canonical: bool,
    pub language: String,
    pub responsive: bool,
    pub twitter_card: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub word_count: u64,
    pub load_time: f64,
    pub images: usize,
    pub schema: usize,
}

// ====== Winners & narrative after reconciliation ======

/// Per-dimension winners rendered as presentation names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerNames {
    pub seo: String,
    pub content: String,
    pub uiux: String,
    pub performance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledDimension {
    /// Presentation name of the authoritative winner.
    pub winner: String,
    /// What the generator claimed, kept for reference only.
    pub narrative_winner: Winner,
    #[serde(flatten)]
    pub findings: Findings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledNarrative {
    pub executive_summary: String,
    pub seo_comparison: ReconciledDimension,
    pub content_comparison: ReconciledDimension,
    pub uiux_comparison: ReconciledDimension,
    pub performance_comparison: ReconciledDimension,
    pub what_competitor_does_better: Vec<String>,
    pub what_client_does_better: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub degraded: bool,
}

// ====== Report ======

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub overall_winner: String,
    pub overall_label: Winner,
    pub quick_stats: Paired<QuickStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub urls: Paired<String>,
    pub brand_names: Paired<String>,
    pub crawl_data: Paired<PageSummary>,
    pub comparison: Comparison,
    pub compressed_comparison: CompressedComparison,
    pub winners: WinnerNames,
    pub analysis: ReconciledNarrative,
    pub summary: ReportSummary,
}
