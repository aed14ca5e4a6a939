//! SEO dimension: title, meta description, headings, alt coverage,
//! structured data and Open Graph.

use crate::domain::comparison::{
    DimensionScore, HeadingStats, ImageStats, OpenGraphStats, SeoComparison,
    StructuredDataStats, TextMetric,
};
use crate::domain::models::{Paired, PageRecord};

pub const TITLE_OPTIMAL: (usize, usize) = (30, 60);
pub const META_OPTIMAL: (usize, usize) = (120, 160);
const MAX_SCHEMA_TYPES: usize = 5;

pub fn compare_seo(client: &PageRecord, competitor: &PageRecord) -> SeoComparison {
    let pages = Paired::new(client, competitor);

    SeoComparison {
        title: pages.map(|p| text_metric(&p.title, TITLE_OPTIMAL)),
        meta_description: pages.map(|p| text_metric(&p.meta_description, META_OPTIMAL)),
        headings: pages.map(|p| heading_stats(p)),
        images: pages.map(|p| image_stats(p)),
        structured_data: pages.map(|p| structured_data_stats(p)),
        open_graph: pages.map(|p| OpenGraphStats {
            title: p.og_title,
            description: p.og_description,
            image: p.og_image,
        }),
    }
}

/// Range [10, 100].
pub fn seo_score(seo: &SeoComparison) -> DimensionScore {
    Paired::new(
        side_score(
            &seo.title.client,
            &seo.meta_description.client,
            &seo.images.client,
            &seo.structured_data.client,
            &seo.open_graph.client,
        ),
        side_score(
            &seo.title.competitor,
            &seo.meta_description.competitor,
            &seo.images.competitor,
            &seo.structured_data.competitor,
            &seo.open_graph.competitor,
        ),
    )
}

fn side_score(
    title: &TextMetric,
    meta: &TextMetric,
    images: &ImageStats,
    schema: &StructuredDataStats,
    og: &OpenGraphStats,
) -> f64 {
    let title_pts = if title.optimal { 20.0 } else { 10.0 };
    let meta_pts = if meta.optimal { 20.0 } else { 10.0 };
    let alt_pts = (images.alt_optimization.clamp(0.0, 100.0) / 100.0) * 20.0;
    let schema_pts = (schema.count as f64 * 5.0).min(20.0);
    let og_pts = (if og.title { 5.0 } else { 0.0 }) + (if og.description { 5.0 } else { 0.0 });

    title_pts + meta_pts + alt_pts + schema_pts + og_pts
}

fn text_metric(value: &str, (min, max): (usize, usize)) -> TextMetric {
    let length = value.chars().count();
    TextMetric {
        value: value.to_string(),
        length,
        optimal: (min..=max).contains(&length),
    }
}

fn heading_stats(page: &PageRecord) -> HeadingStats {
    HeadingStats {
        h1: page.headings.h1.len(),
        h2: page.headings.h2.len(),
        h3: page.headings.h3.len(),
        has_h1: !page.headings.h1.is_empty(),
    }
}

fn image_stats(page: &PageRecord) -> ImageStats {
    ImageStats {
        total: page.images.len(),
        alt_optimization: alt_coverage(page),
    }
}

/// Percentage of images carrying alt text, one decimal. Zero without images.
pub fn alt_coverage(page: &PageRecord) -> f64 {
    if page.images.is_empty() {
        return 0.0;
    }
    let pct = page.images_with_alt() as f64 / page.images.len() as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

fn structured_data_stats(page: &PageRecord) -> StructuredDataStats {
    StructuredDataStats {
        count: page.structured_data_count,
        types: page.schema_types().into_iter().take(MAX_SCHEMA_TYPES).collect(),
    }
}
