//! Narrative bridge: prompt, one generator call, tolerant parse.
//!
//! `narrate` never fails. Timeouts, transport errors and malformed output all
//! collapse into [`NarrativeEnvelope::degraded`].

pub mod generator;
pub mod parse;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::comparison::CompressedComparison;
use crate::domain::models::PageRecord;
use crate::domain::narrative::NarrativeEnvelope;

pub use generator::{ChatCompletionsGenerator, GeminiGenerator, NarrativeGenerator};
pub use parse::{parse_envelope, strip_code_fence, try_parse_envelope};
pub use prompt::{NarrativeRequest, PromptBuilder};

pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct NarrativeBridge {
    generator: Arc<dyn NarrativeGenerator>,
    prompt: PromptBuilder,
    timeout: Duration,
}

impl NarrativeBridge {
    pub fn new(generator: Arc<dyn NarrativeGenerator>, prompt: PromptBuilder, timeout: Duration) -> Self {
        Self {
            generator,
            prompt,
            timeout,
        }
    }

    pub fn with_defaults(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self::new(generator, PromptBuilder::default(), DEFAULT_NARRATIVE_TIMEOUT)
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Ask the generator for a narrative. Exactly one attempt.
    pub async fn narrate(
        &self,
        client: &PageRecord,
        competitor: &PageRecord,
        comparison: &CompressedComparison,
    ) -> NarrativeEnvelope {
        let request = self.prompt.request(client, competitor, comparison);
        log::info!(
            "Requesting narrative from {} ({} prompt chars)",
            self.generator.name(),
            request.user_prompt.chars().count()
        );

        match tokio::time::timeout(self.timeout, self.generator.generate(&request)).await {
            Ok(Ok(text)) => parse_envelope(&text),
            Ok(Err(e)) => {
                log::warn!("Narrative generation failed, degrading: {:#}", e);
                NarrativeEnvelope::degraded()
            }
            Err(_) => {
                log::warn!(
                    "Narrative generation timed out after {:?}, degrading",
                    self.timeout
                );
                NarrativeEnvelope::degraded()
            }
        }
    }
}
