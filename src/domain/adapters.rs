//! Adapter layer for converting domain models to report shapes.

use crate::domain::models::PageRecord;
use crate::domain::report::{PageSummary, QuickStats};

/// Prefix sizes applied when sanitizing a record for transport.
pub const MAX_HEADINGS: usize = 10;
pub const MAX_NAVIGATION_LINKS: usize = 10;
pub const MAX_BUTTONS: usize = 5;

fn prefix<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items.iter().take(n).cloned().collect()
}

// ============================================================================
// PAGE RECORD TO SUMMARY
// ============================================================================

impl From<&PageRecord> for PageSummary {
    fn from(page: &PageRecord) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title.clone(),
            meta_description: page.meta_description.clone(),
            h1: prefix(&page.headings.h1, MAX_HEADINGS),
            h2: prefix(&page.headings.h2, MAX_HEADINGS),
            h3: prefix(&page.headings.h3, MAX_HEADINGS),
            word_count: page.word_count,
            image_count: page.images.len(),
            images_with_alt: page.images_with_alt(),
            internal_links: page.internal_links.len(),
            external_links: page.external_links.len(),
            buttons: prefix(&page.buttons, MAX_BUTTONS),
            navigation_links: prefix(&page.navigation_links, MAX_NAVIGATION_LINKS),
            schema_types: page.schema_types(),
            structured_data_count: page.schema.len(),
            performance: page.performance,
            canonical: page.canonical,
            language: page.language.clone(),
            responsive: page.has_media_queries,
            twitter_card: page.twitter_card.clone(),
        }
    }
}

// ============================================================================
// PAGE RECORD TO QUICK STATS
// ============================================================================

impl From<&PageRecord> for QuickStats {
    fn from(page: &PageRecord) -> Self {
        Self {
            word_count: page.word_count,
            load_time: page.performance.load_time,
            images: page.images.len(),
            schema: page.schema.len(),
        }
    }
}
