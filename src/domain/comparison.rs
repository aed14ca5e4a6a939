//! Dimension comparison and score shapes.
//!
//! These are purely derived values: built fresh for every comparison and
//! never mutated afterwards. Serialized in camelCase for report consumers.

use serde::{Deserialize, Serialize};

use crate::domain::models::{Paired, Winner};

// ====== SEO ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetric {
    pub value: String,
    pub length: usize,
    pub optimal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStats {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub has_h1: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: usize,
    /// Percentage of images with non-empty alt text, one decimal.
    pub alt_optimization: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataStats {
    pub count: usize,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraphStats {
    pub title: bool,
    pub description: bool,
    pub image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoComparison {
    pub title: Paired<TextMetric>,
    pub meta_description: Paired<TextMetric>,
    pub headings: Paired<HeadingStats>,
    pub images: Paired<ImageStats>,
    pub structured_data: Paired<StructuredDataStats>,
    pub open_graph: Paired<OpenGraphStats>,
}

// ====== Content ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentComparison {
    pub word_count: Paired<u64>,
    pub internal_links: Paired<usize>,
    pub external_links: Paired<usize>,
    pub buttons: Paired<usize>,
}

// ====== UI/UX ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiuxComparison {
    pub navigation: Paired<usize>,
    pub cta_quality: Paired<Vec<String>>,
    pub responsive: Paired<bool>,
}

// ====== Performance ======

/// One "lower is better" timing with its provisional sub-winner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingDuel {
    pub client: f64,
    pub competitor: f64,
    pub winner: Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceComparison {
    pub load_time: TimingDuel,
    pub dom_content_loaded: TimingDuel,
    pub first_paint: TimingDuel,
}

// ====== Scores ======

/// `{client, competitor}` score pair for one dimension.
pub type DimensionScore = Paired<f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub seo: DimensionScore,
    pub content: DimensionScore,
    pub uiux: DimensionScore,
    pub performance: DimensionScore,
}

/// Full raw comparison plus per-dimension scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub seo: SeoComparison,
    pub content: ContentComparison,
    pub uiux: UiuxComparison,
    pub performance: PerformanceComparison,
    pub scores: DimensionScores,
}

// ====== Compressed view for the narrative generator ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedSeo {
    pub title: Paired<TextMetric>,
    pub meta_description: Paired<TextMetric>,
    pub images: Paired<ImageStats>,
    pub structured_data: Paired<StructuredDataStats>,
    pub open_graph: Paired<OpenGraphStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedUiux {
    pub navigation: Paired<usize>,
    pub responsive: Paired<bool>,
}

/// Only the sub-fields that matter for narrative quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedComparison {
    pub seo: CompressedSeo,
    pub content: ContentComparison,
    pub uiux: CompressedUiux,
    pub performance: PerformanceComparison,
}

impl From<&Comparison> for CompressedComparison {
    fn from(c: &Comparison) -> Self {
        Self {
            seo: CompressedSeo {
                title: c.seo.title.clone(),
                meta_description: c.seo.meta_description.clone(),
                images: c.seo.images.clone(),
                structured_data: c.seo.structured_data.clone(),
                open_graph: c.seo.open_graph.clone(),
            },
            content: c.content.clone(),
            uiux: CompressedUiux {
                navigation: c.uiux.navigation.clone(),
                responsive: c.uiux.responsive.clone(),
            },
            performance: c.performance,
        }
    }
}
