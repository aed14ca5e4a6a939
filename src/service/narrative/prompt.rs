//! Prompt assembly for the narrative generator.

use crate::domain::comparison::CompressedComparison;
use crate::domain::models::PageRecord;
use crate::domain::narrative::RECOMMENDATION_COUNT;

/// Hard upper bound on the user prompt, in characters.
pub const DEFAULT_PROMPT_CHAR_LIMIT: usize = 7000;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert digital marketing consultant. \
Always respond ONLY with valid JSON. No markdown.";

pub const TEMPERATURE: f64 = 0.2;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// One call to the text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl NarrativeRequest {
    pub fn new(user_prompt: String) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt,
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    max_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_CHAR_LIMIT)
    }
}

impl PromptBuilder {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Assemble the bounded user prompt. Oversized prompts are truncated,
    /// never rejected; the response format comes first so it survives the cut.
    pub fn build(
        &self,
        client: &PageRecord,
        competitor: &PageRecord,
        comparison: &CompressedComparison,
    ) -> String {
        let comparison_json =
            serde_json::to_string(comparison).unwrap_or_else(|_| "{}".to_string());

        let prompt = format!(
            "Analyze the CLIENT website against the COMPETITOR website using the metrics below.\n\
             Rules: respond ONLY with valid JSON, no markdown, no commentary. \
             Write concrete, strategic insights.\n\n\
             == RESPONSE FORMAT ==\n{}\n\n\
             == CLIENT ==\n{}\n\n\
             == COMPETITOR ==\n{}\n\n\
             == STRUCTURED COMPARISON ==\n{}",
            response_schema(),
            headline(client),
            headline(competitor),
            comparison_json,
        );

        truncate_chars(&prompt, self.max_chars)
    }

    pub fn request(
        &self,
        client: &PageRecord,
        competitor: &PageRecord,
        comparison: &CompressedComparison,
    ) -> NarrativeRequest {
        NarrativeRequest::new(self.build(client, competitor, comparison))
    }
}

fn headline(page: &PageRecord) -> String {
    format!(
        "URL: {}\nTitle: {}\nMeta Description: {}\nWord Count: {}\nImages: {}\nLoad Time: {}ms",
        page.url,
        page.title,
        page.meta_description,
        page.word_count,
        page.images.len(),
        page.performance.load_time.round(),
    )
}

fn response_schema() -> String {
    let dimension = r#"{"winner": "client | competitor | tie", "keyFindings": [], "clientStrengths": [], "clientWeaknesses": [], "competitorStrengths": [], "competitorWeaknesses": []}"#;
    format!(
        r#"{{"executiveSummary": "", "seoComparison": {d}, "contentComparison": {d}, "uiuxComparison": {d}, "performanceComparison": {{"winner": "client | competitor | tie", "keyFindings": []}}, "whatCompetitorDoesBetter": [], "whatClientDoesBetter": [], "recommendations": [exactly {n} items of {{"priority": 1, "category": "", "recommendation": "", "impact": "high | medium | low", "effort": "low | medium | high", "rationale": ""}}]}}"#,
        d = dimension,
        n = RECOMMENDATION_COUNT,
    )
}

/// Keep at most `max` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::comparison::ComparisonEngine;
    use crate::test_utils::fixtures;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn prompt_carries_headlines_and_comparison() {
        let client = fixtures::timed_page("https://client.example", 800.0, 600.0, 400.0);
        let competitor = fixtures::page("https://rival.example");
        let comparison = ComparisonEngine::new().compare(&client, &competitor);

        let prompt = PromptBuilder::default().build(&client, &competitor, &CompressedComparison::from(&comparison));

        assert!(prompt.contains("URL: https://client.example"));
        assert!(prompt.contains("URL: https://rival.example"));
        assert!(prompt.contains("Load Time: 800ms"));
        assert!(prompt.contains("\"openGraph\""));
        assert!(prompt.contains("exactly 15 items"));
        assert!(!prompt.contains("ctaQuality"), "compressed view drops CTA texts");
    }

    #[test]
    fn oversized_prompt_is_truncated_not_rejected() {
        let mut client = fixtures::page("https://client.example");
        client.meta_description = "x".repeat(20_000);
        let competitor = fixtures::page("https://rival.example");
        let comparison = ComparisonEngine::new().compare(&client, &competitor);

        let builder = PromptBuilder::new(DEFAULT_PROMPT_CHAR_LIMIT);
        let request = builder.request(&client, &competitor, &CompressedComparison::from(&comparison));

        assert_eq!(request.user_prompt.chars().count(), DEFAULT_PROMPT_CHAR_LIMIT);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_output_tokens, 2048);
        assert!(request.system_instruction.contains("ONLY with valid JSON"));
    }

    #[test]
    fn response_format_survives_truncation() {
        let mut client = fixtures::page("https://client.example");
        client.meta_description = "x".repeat(20_000);
        let competitor = fixtures::page("https://rival.example");
        let comparison = ComparisonEngine::new().compare(&client, &competitor);

        let prompt = PromptBuilder::default().build(&client, &competitor, &CompressedComparison::from(&comparison));

        assert_eq!(prompt.chars().count(), DEFAULT_PROMPT_CHAR_LIMIT);
        assert!(prompt.contains("== RESPONSE FORMAT =="));
        assert!(prompt.contains("exactly 15 items"));
        assert!(prompt.contains("\"performanceComparison\""));
        assert!(prompt.contains("URL: https://client.example"));
    }
}
