//! Content dimension: volume of copy, links and calls to action.

use crate::domain::comparison::{ContentComparison, DimensionScore};
use crate::domain::models::{Paired, PageRecord};

pub fn compare_content(client: &PageRecord, competitor: &PageRecord) -> ContentComparison {
    let pages = Paired::new(client, competitor);

    ContentComparison {
        word_count: pages.map(|p| p.word_count),
        internal_links: pages.map(|p| p.internal_links.len()),
        external_links: pages.map(|p| p.external_links.len()),
        buttons: pages.map(|p| p.buttons.len()),
    }
}

/// Range [0, 90].
pub fn content_score(content: &ContentComparison) -> DimensionScore {
    Paired::new(
        side_score(
            content.word_count.client,
            content.internal_links.client,
            content.external_links.client,
            content.buttons.client,
        ),
        side_score(
            content.word_count.competitor,
            content.internal_links.competitor,
            content.external_links.competitor,
            content.buttons.competitor,
        ),
    )
}

fn side_score(words: u64, internal: usize, external: usize, buttons: usize) -> f64 {
    (words as f64 / 25.0).min(25.0)
        + (internal as f64 * 2.0).min(20.0)
        + (external as f64 * 2.0).min(20.0)
        + (buttons as f64 * 5.0).min(25.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn each_term_is_capped() {
        assert_eq!(side_score(0, 0, 0, 0), 0.0);
        assert_eq!(side_score(100, 3, 4, 1), 4.0 + 6.0 + 8.0 + 5.0);
        assert_eq!(side_score(1_000_000, 500, 500, 500), 90.0);
    }

    #[test]
    fn counts_come_from_sequences() {
        let client = fixtures::content_page("https://a.example", 1200, 10, 5, 3);
        let competitor = fixtures::content_page("https://b.example", 400, 2, 1, 0);

        let content = compare_content(&client, &competitor);
        assert_eq!(content.word_count, Paired::new(1200, 400));
        assert_eq!(content.internal_links, Paired::new(10, 2));
        assert_eq!(content.external_links, Paired::new(5, 1));
        assert_eq!(content.buttons, Paired::new(3, 0));

        let score = content_score(&content);
        assert_eq!(score.client, 25.0 + 20.0 + 10.0 + 15.0);
        assert_eq!(score.competitor, 16.0 + 4.0 + 2.0 + 0.0);
    }
}
