//! One client-vs-competitor analysis, end to end.

use std::sync::Arc;

use tracing::Instrument;

use crate::config::{AnalyzerConfig, NarrativeProvider};
use crate::domain::comparison::CompressedComparison;
use crate::domain::models::PageOutcome;
use crate::domain::report::Report;
use crate::error::{AppError, Result};
use crate::service::aggregator::ScoreAggregator;
use crate::service::comparison::ComparisonEngine;
use crate::service::crawler::{acquire_pair, HttpPageSource, PageSource};
use crate::service::http::{create_client, ClientType};
use crate::service::narrative::{
    ChatCompletionsGenerator, GeminiGenerator, NarrativeBridge, NarrativeGenerator, PromptBuilder,
};
use crate::service::report::ReportAssembler;

pub struct AnalysisService {
    source: Arc<dyn PageSource>,
    engine: ComparisonEngine,
    aggregator: ScoreAggregator,
    bridge: NarrativeBridge,
    assembler: ReportAssembler,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn PageSource>, bridge: NarrativeBridge) -> Self {
        Self {
            source,
            engine: ComparisonEngine::new(),
            aggregator: ScoreAggregator::new(),
            bridge,
            assembler: ReportAssembler::new(),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let source = HttpPageSource::new(&config.crawl)
            .map_err(|e| AppError::service("crawler", format!("{:#}", e)))?;

        let narrative = &config.narrative;
        let http = create_client(ClientType::Standard, narrative.timeout)
            .map_err(|e| AppError::service("narrative", format!("{:#}", e)))?;

        if narrative.api_key.is_none() {
            log::warn!("No narrative API key configured; reports will carry the fallback narrative");
        }

        let generator: Arc<dyn NarrativeGenerator> = match narrative.provider {
            NarrativeProvider::ChatCompletions => Arc::new(ChatCompletionsGenerator::new(
                http,
                &narrative.base_url,
                narrative.api_key.clone(),
                &narrative.model,
            )),
            NarrativeProvider::Gemini => Arc::new(GeminiGenerator::new(
                http,
                &narrative.base_url,
                narrative.api_key.clone(),
                &narrative.model,
            )),
        };

        let bridge = NarrativeBridge::new(
            generator,
            PromptBuilder::new(narrative.prompt_char_limit),
            narrative.timeout,
        );

        Ok(Self::new(Arc::new(source), bridge))
    }

    pub async fn run(&self, client_url: &str, competitor_url: &str) -> Result<Report> {
        let span = tracing::info_span!("analysis", client = %client_url, competitor = %competitor_url);
        self.run_inner(client_url, competitor_url).instrument(span).await
    }

    async fn run_inner(&self, client_url: &str, competitor_url: &str) -> Result<Report> {
        log::info!(
            "[ANALYSIS] {} vs {} (source: {}, narrative: {})",
            client_url,
            competitor_url,
            self.source.name(),
            self.bridge.generator_name()
        );

        let pages = acquire_pair(self.source.as_ref(), client_url, competitor_url).await;

        let (client, competitor) = match (&pages.client, &pages.competitor) {
            (PageOutcome::Crawled(client), PageOutcome::Crawled(competitor)) => (client, competitor),
            _ => {
                let err = AppError::AcquisitionFailed {
                    client: pages.client.failure_message().map(str::to_string),
                    competitor: pages.competitor.failure_message().map(str::to_string),
                };
                log::error!(
                    "[ANALYSIS] Acquisition failed (client: {:?}, competitor: {:?})",
                    pages.client.failure_message(),
                    pages.competitor.failure_message()
                );
                return Err(err);
            }
        };

        let comparison = self.engine.compare(client, competitor);
        let verdict = self.aggregator.aggregate(&comparison.scores);
        log::info!(
            "[ANALYSIS] Winners seo={} content={} uiux={} performance={} overall={}",
            verdict.winners.seo.as_str(),
            verdict.winners.content.as_str(),
            verdict.winners.uiux.as_str(),
            verdict.winners.performance.as_str(),
            verdict.overall.as_str()
        );

        let compressed = CompressedComparison::from(&comparison);
        let envelope = self.bridge.narrate(client, competitor, &compressed).await;

        Ok(self
            .assembler
            .assemble(client, competitor, comparison, &verdict, envelope))
    }
}
