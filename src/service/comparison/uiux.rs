//! UI/UX dimension: navigation depth, calls to action, responsiveness.

use crate::domain::comparison::{DimensionScore, UiuxComparison};
use crate::domain::models::{Paired, PageRecord};

const MAX_CTA_TEXTS: usize = 5;

pub fn compare_uiux(client: &PageRecord, competitor: &PageRecord) -> UiuxComparison {
    let pages = Paired::new(client, competitor);

    UiuxComparison {
        navigation: pages.map(|p| p.navigation_links.len()),
        cta_quality: pages.map(|p| {
            p.buttons
                .iter()
                .take(MAX_CTA_TEXTS)
                .map(|b| b.text.clone())
                .collect()
        }),
        responsive: pages.map(|p| p.has_media_queries),
    }
}

/// Range [10, 100].
pub fn uiux_score(uiux: &UiuxComparison) -> DimensionScore {
    Paired::new(
        side_score(
            uiux.navigation.client,
            uiux.responsive.client,
            uiux.cta_quality.client.len(),
        ),
        side_score(
            uiux.navigation.competitor,
            uiux.responsive.competitor,
            uiux.cta_quality.competitor.len(),
        ),
    )
}

fn side_score(navigation: usize, responsive: bool, ctas: usize) -> f64 {
    (navigation as f64 * 4.0).min(40.0)
        + (if responsive { 35.0 } else { 10.0 })
        + (ctas as f64 * 5.0).min(25.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ButtonElement;
    use crate::test_utils::fixtures;

    #[test]
    fn cta_texts_keep_first_five() {
        let mut page = fixtures::page("https://cta.example");
        page.buttons = (0..8)
            .map(|i| ButtonElement { text: format!("Go {i}"), href: None })
            .collect();

        let uiux = compare_uiux(&page, &fixtures::page("https://none.example"));
        assert_eq!(uiux.cta_quality.client, vec!["Go 0", "Go 1", "Go 2", "Go 3", "Go 4"]);
        assert!(uiux.cta_quality.competitor.is_empty());
    }

    #[test]
    fn score_floor_and_ceiling() {
        assert_eq!(side_score(0, false, 0), 10.0);
        assert_eq!(side_score(10, true, 5), 100.0);
        assert_eq!(side_score(50, true, 5), 100.0);
        assert_eq!(side_score(3, true, 2), 12.0 + 35.0 + 10.0);
    }
}
