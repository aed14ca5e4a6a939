//! Shared test utilities and fixtures
//!
//! Not gated on `cfg(test)`: integration tests and benches build against the
//! library crate and use the same page builders.

pub mod fixtures {
    use crate::domain::models::{
        ButtonElement, LinkElement, PageRecord, PerformanceTiming,
    };

    /// A bare page: everything empty, no timings.
    pub fn page(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// A page with the given content volume.
    pub fn content_page(
        url: &str,
        word_count: u64,
        internal: usize,
        external: usize,
        buttons: usize,
    ) -> PageRecord {
        let mut record = page(url);
        record.word_count = word_count;
        record.internal_links = (0..internal)
            .map(|i| LinkElement {
                url: format!("{}/page-{}", url.trim_end_matches('/'), i),
                text: format!("Page {}", i),
            })
            .collect();
        record.external_links = (0..external)
            .map(|i| LinkElement {
                url: format!("https://partner-{}.example.org/", i),
                text: format!("Partner {}", i),
            })
            .collect();
        record.buttons = (0..buttons)
            .map(|i| ButtonElement {
                text: format!("Action {}", i),
                href: None,
            })
            .collect();
        record
    }

    /// A bare page with timings in milliseconds.
    pub fn timed_page(url: &str, load_time: f64, dom_content_loaded: f64, first_paint: f64) -> PageRecord {
        let mut record = page(url);
        record.performance = PerformanceTiming::new(load_time, dom_content_loaded, first_paint);
        record
    }

    /// Reference pair: a content-rich, responsive, fast client against a
    /// thin, slow competitor.
    pub fn scenario_pair() -> (PageRecord, PageRecord) {
        let mut client = content_page("https://www.client-shop.com", 1200, 10, 5, 3);
        client.has_media_queries = true;
        client.performance = PerformanceTiming::new(800.0, 600.0, 400.0);

        let mut competitor = content_page("https://rival.example.com", 400, 2, 1, 0);
        competitor.has_media_queries = false;
        competitor.performance = PerformanceTiming::new(3000.0, 2500.0, 2000.0);

        (client, competitor)
    }

    /// HTML page with a title and one heading, for HTTP mocks.
    pub fn basic_html_page(title: &str, h1: &str) -> String {
        format!(
            r#"
            <html>
                <head><title>{}</title></head>
                <body>
                    <h1>{}</h1>
                    <p>Some content here.</p>
                </body>
            </html>
            "#,
            title, h1
        )
    }
}
