//! Turning raw generator text into a [`NarrativeEnvelope`].

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::domain::narrative::{NarrativeEnvelope, RECOMMENDATION_COUNT};

/// Strip a surrounding markdown code fence, if there is one.
///
/// Handles ```` ``` ````, ```` ```json ```` and a missing closing fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse generator output, failing on anything that is not a JSON object
/// shaped like the envelope.
pub fn try_parse_envelope(text: &str) -> Result<NarrativeEnvelope> {
    let cleaned = strip_code_fence(text);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(first_err) => {
            let inner = outermost_object(cleaned).context("no JSON object in response")?;
            serde_json::from_str(inner)
                .with_context(|| format!("invalid JSON in response: {}", first_err))?
        }
    };

    if !value.is_object() {
        bail!("expected a JSON object, got {}", json_kind(&value));
    }

    let mut envelope: NarrativeEnvelope =
        serde_json::from_value(value).context("response does not match the envelope schema")?;

    if envelope.recommendations.len() != RECOMMENDATION_COUNT {
        log::debug!(
            "Generator returned {} recommendations (expected {})",
            envelope.recommendations.len(),
            RECOMMENDATION_COUNT
        );
    }
    envelope.recommendations.truncate(RECOMMENDATION_COUNT);
    envelope.degraded = false;

    Ok(envelope)
}

/// Parse generator output; any failure yields the degraded envelope.
pub fn parse_envelope(text: &str) -> NarrativeEnvelope {
    match try_parse_envelope(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::error!("Failed to parse narrative JSON: {:#}", e);
            NarrativeEnvelope::degraded()
        }
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Winner;
    use serde_json::json;

    fn sample_json() -> String {
        let recs: Vec<Value> = (1..=20)
            .map(|i| json!({"priority": i, "category": "SEO", "recommendation": format!("Do {i}"),
                            "impact": "high", "effort": "low", "rationale": "because"}))
            .collect();
        json!({
            "executiveSummary": "Client is ahead on content.",
            "seoComparison": { "winner": "competitor", "keyFindings": ["Rival has schema"] },
            "contentComparison": { "winner": "client" },
            "uiuxComparison": { "winner": "tie" },
            "performanceComparison": { "winner": "client", "keyFindings": [] },
            "whatCompetitorDoesBetter": ["Structured data"],
            "whatClientDoesBetter": ["Copy depth"],
            "top15Recommendations": recs
        })
        .to_string()
    }

    #[test]
    fn strips_fences_best_effort() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parses_fenced_envelope_and_caps_recommendations() {
        let text = format!("```json\n{}\n```", sample_json());
        let env = try_parse_envelope(&text).unwrap();

        assert_eq!(env.executive_summary, "Client is ahead on content.");
        assert_eq!(env.seo_comparison.winner, Winner::Competitor);
        assert_eq!(env.content_comparison.winner, Winner::Client);
        assert_eq!(env.recommendations.len(), RECOMMENDATION_COUNT);
        assert_eq!(env.recommendations[0].recommendation, "Do 1");
        assert!(!env.degraded);
    }

    #[test]
    fn recovers_object_wrapped_in_prose() {
        let text = format!("Here is the analysis you asked for:\n{}\nHope this helps!", sample_json());
        let env = try_parse_envelope(&text).unwrap();
        assert_eq!(env.what_client_does_better, vec!["Copy depth"]);
    }

    #[test]
    fn non_json_degrades_without_error() {
        let env = parse_envelope("I'm sorry, I can't help with that.");
        assert!(env.degraded);
        assert_eq!(env.dimension_winners(), [Winner::Tie; 4]);
        assert!(env.recommendations.is_empty());
    }

    #[test]
    fn non_object_json_degrades() {
        assert!(try_parse_envelope("[1, 2, 3]").is_err());
        assert!(try_parse_envelope("\"just a string\"").is_err());
        assert!(parse_envelope("null").degraded);
    }

    #[test]
    fn truncated_json_degrades() {
        let json = sample_json();
        let cut = &json[..json.len() / 2];
        assert!(parse_envelope(cut).degraded);
    }
}
