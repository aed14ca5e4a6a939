//! Page acquisition.
//!
//! A [`PageSource`] never errors: transport problems, bad URLs and HTTP error
//! statuses all come back as [`PageOutcome::Failed`].

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use rquest::Client;
use url::Url;

use crate::config::{CrawlConfig, MIN_CRAWL_TIMEOUT};
use crate::domain::models::{PageOutcome, Paired, PerformanceTiming};
use crate::extractor::PageExtractor;
use crate::service::http::{create_client, ClientType};

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn acquire(&self, url: &str) -> PageOutcome;

    fn name(&self) -> &'static str;
}

/// Acquire both pages concurrently.
pub async fn acquire_pair(
    source: &dyn PageSource,
    client_url: &str,
    competitor_url: &str,
) -> Paired<PageOutcome> {
    let (client, competitor) = tokio::join!(source.acquire(client_url), source.acquire(competitor_url));
    Paired::new(client, competitor)
}

/// Fetches a page over HTTP and extracts it in-process.
///
/// Without a browser the timings are approximations: first paint is time to
/// response headers, DOM content loaded is time to full body and load time is
/// time to finished extraction.
pub struct HttpPageSource {
    client: Client,
    user_agent: String,
}

impl HttpPageSource {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let timeout = config.timeout.max(MIN_CRAWL_TIMEOUT);
        let client = create_client(ClientType::from_emulation_enabled(config.emulation), timeout)?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    fn validate(url: &str) -> std::result::Result<Url, String> {
        let parsed = Url::parse(url).map_err(|e| format!("Invalid URL {}: {}", url, e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(format!("Unsupported URL scheme: {}", other)),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn acquire(&self, url: &str) -> PageOutcome {
        log::info!("[CRAWL] Starting acquisition: {}", url);

        let parsed = match Self::validate(url) {
            Ok(parsed) => parsed,
            Err(message) => {
                log::warn!("[CRAWL] {}", message);
                return PageOutcome::failed(url, message);
            }
        };

        let start = Instant::now();
        let response = match self
            .client
            .get(parsed.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("[CRAWL] Request to {} failed: {}", url, e);
                return PageOutcome::failed(url, format!("Request failed: {}", e));
            }
        };
        let first_paint = elapsed_ms(start);

        let status = response.status();
        if status.as_u16() >= 400 {
            log::warn!("[CRAWL] {} returned HTTP {}", url, status);
            return PageOutcome::failed(url, format!("HTTP error status: {}", status));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("[CRAWL] Failed to read body of {}: {}", url, e);
                return PageOutcome::failed(url, format!("Failed to read response body: {}", e));
            }
        };
        let dom_content_loaded = elapsed_ms(start);

        let mut record = PageExtractor::extract(&html, url, PerformanceTiming::default());
        record.performance = PerformanceTiming::new(elapsed_ms(start), dom_content_loaded, first_paint);

        log::info!(
            "[CRAWL] Complete - {} bytes, {} words, load: {:.2}ms",
            html.len(),
            record.word_count,
            record.performance.load_time
        );
        PageOutcome::Crawled(record)
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    fn source() -> HttpPageSource {
        HttpPageSource::new(&CrawlConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn crawls_and_extracts_page() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .match_header("user-agent", mockito::Matcher::Regex("CompetitorAnalyzerBot".into()))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head><title>Mock Shop</title></head><body><h1>Hello</h1><p>two words</p></body></html>")
            .create_async()
            .await;

        let url = format!("{}/", server.url());
        let outcome = source().acquire(&url).await;

        let record = outcome.record().expect("page should be crawled");
        assert_eq!(record.title, "Mock Shop");
        assert_eq!(record.headings.h1, vec!["Hello"]);
        assert_eq!(record.word_count, 3);
        let perf = record.performance;
        assert!(perf.load_time >= perf.dom_content_loaded);
        assert!(perf.dom_content_loaded >= perf.first_paint);
    }

    #[tokio::test]
    async fn http_error_status_is_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/missing").with_status(404).create_async().await;

        let url = format!("{}/missing", server.url());
        let outcome = source().acquire(&url).await;

        assert!(outcome.is_failed());
        assert!(outcome.failure_message().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn invalid_url_is_a_failure_not_an_error() {
        let outcome = source().acquire("not a url").await;
        assert!(outcome.is_failed());

        let outcome = source().acquire("ftp://files.example.com").await;
        assert!(outcome.failure_message().unwrap().contains("scheme"));
    }

    #[tokio::test]
    async fn acquires_both_sides() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/a")
            .with_status(200)
            .with_body(fixtures::basic_html_page("Client", "Welcome"))
            .create_async()
            .await;
        let _bad = server.mock("GET", "/b").with_status(500).create_async().await;

        let pair = acquire_pair(
            &source(),
            &format!("{}/a", server.url()),
            &format!("{}/b", server.url()),
        )
        .await;

        assert_eq!(pair.client.record().map(|r| r.title.as_str()), Some("Client"));
        assert!(pair.competitor.is_failed());
    }
}
