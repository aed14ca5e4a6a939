//! Narrative envelope: the text generator's structured opinion.
//!
//! Deserialization is deliberately forgiving at the field level (free-text
//! winners, string priorities, "High" vs "high") so that one odd field does not
//! throw away an otherwise usable response. Structural failures are handled by
//! the bridge, which swaps in [`NarrativeEnvelope::degraded`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::models::Winner;

/// Number of recommendations requested from, and kept from, the generator.
pub const RECOMMENDATION_COUNT: usize = 15;

pub const DEGRADED_SUMMARY: &str =
    "Narrative analysis unavailable. Scores and winners are computed from crawl data only.";

// ====== Enums ======

/// Impact / effort rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    #[default]
    Medium,
    Low,
}

impl Level {
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim().to_ascii_lowercase();
        if raw.starts_with("high") {
            Level::High
        } else if raw.starts_with("low") {
            Level::Low
        } else {
            Level::Medium
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Level::coerce).unwrap_or_default())
    }
}

// ====== Envelope parts ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Findings {
    #[serde(deserialize_with = "lenient_strings")]
    pub key_findings: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub client_strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub client_weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub competitor_strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub competitor_weaknesses: Vec<String>,
}

/// One dimension as the generator sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionNarrative {
    #[serde(deserialize_with = "lenient_winner")]
    pub winner: Winner,
    #[serde(flatten)]
    pub findings: Findings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(deserialize_with = "lenient_priority")]
    pub priority: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub recommendation: String,
    pub impact: Level,
    pub effort: Level,
    #[serde(deserialize_with = "lenient_string")]
    pub rationale: String,
}

// ====== Envelope ======

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NarrativeEnvelope {
    #[serde(deserialize_with = "lenient_string")]
    pub executive_summary: String,
    pub seo_comparison: DimensionNarrative,
    pub content_comparison: DimensionNarrative,
    pub uiux_comparison: DimensionNarrative,
    pub performance_comparison: DimensionNarrative,
    #[serde(deserialize_with = "lenient_strings")]
    pub what_competitor_does_better: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub what_client_does_better: Vec<String>,
    #[serde(
        alias = "top15Recommendations",
        alias = "top10Recommendations",
        deserialize_with = "lenient_recommendations"
    )]
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_deserializing)]
    pub degraded: bool,
}

impl NarrativeEnvelope {
    /// Fallback used whenever generation or parsing fails: tie winners,
    /// empty findings and no recommendations.
    pub fn degraded() -> Self {
        Self {
            executive_summary: DEGRADED_SUMMARY.to_string(),
            degraded: true,
            ..Default::default()
        }
    }

    pub fn dimension_winners(&self) -> [Winner; 4] {
        [
            self.seo_comparison.winner,
            self.content_comparison.winner,
            self.uiux_comparison.winner,
            self.performance_comparison.winner,
        ]
    }
}

// ====== Lenient field decoders ======

fn lenient_winner<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Winner, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(Winner::coerce).unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|p| p.min(u32::MAX as u64) as u32)
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_recommendations<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Recommendation>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}
