//! Runtime configuration, loaded from the environment with defaults.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::service::narrative::generator::{
    GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GROQ_BASE_URL, GROQ_DEFAULT_MODEL,
};
use crate::service::narrative::prompt::DEFAULT_PROMPT_CHAR_LIMIT;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 CompetitorAnalyzerBot";

/// Page acquisition never waits less than this.
pub const MIN_CRAWL_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeProvider {
    /// Any OpenAI-compatible `/chat/completions` endpoint; Groq by default.
    ChatCompletions,
    Gemini,
}

impl FromStr for NarrativeProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" | "openai" | "chat" => Ok(Self::ChatCompletions),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(AppError::config(format!(
                "unknown NARRATIVE_PROVIDER {:?} (expected groq, openai or gemini)",
                other
            ))),
        }
    }
}

impl NarrativeProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::ChatCompletions => GROQ_BASE_URL,
            Self::Gemini => GEMINI_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::ChatCompletions => GROQ_DEFAULT_MODEL,
            Self::Gemini => GEMINI_DEFAULT_MODEL,
        }
    }

    fn fallback_key_var(&self) -> &'static str {
        match self {
            Self::ChatCompletions => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub emulation: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout: MIN_CRAWL_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            emulation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeConfig {
    pub provider: NarrativeProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub prompt_char_limit: usize,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        let provider = NarrativeProvider::ChatCompletions;
        Self {
            provider,
            api_key: None,
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            timeout: Duration::from_secs(DEFAULT_NARRATIVE_TIMEOUT_SECS),
            prompt_char_limit: DEFAULT_PROMPT_CHAR_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerConfig {
    pub crawl: CrawlConfig,
    pub narrative: NarrativeConfig,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("NARRATIVE_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => NarrativeProvider::ChatCompletions,
        };

        let api_key = get("NARRATIVE_API_KEY").or_else(|| get(provider.fallback_key_var()));
        let model = get("NARRATIVE_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let base_url =
            get("NARRATIVE_BASE_URL").unwrap_or_else(|| provider.default_base_url().to_string());

        let narrative_timeout = parse_number(
            "NARRATIVE_TIMEOUT_SECS",
            get("NARRATIVE_TIMEOUT_SECS"),
            DEFAULT_NARRATIVE_TIMEOUT_SECS,
        )?;
        let prompt_char_limit = parse_number(
            "PROMPT_CHAR_LIMIT",
            get("PROMPT_CHAR_LIMIT"),
            DEFAULT_PROMPT_CHAR_LIMIT,
        )?;
        if narrative_timeout == 0 {
            return Err(AppError::config("NARRATIVE_TIMEOUT_SECS must be greater than zero"));
        }
        if prompt_char_limit == 0 {
            return Err(AppError::config("PROMPT_CHAR_LIMIT must be greater than zero"));
        }

        let crawl_timeout = Duration::from_secs(parse_number(
            "CRAWL_TIMEOUT_SECS",
            get("CRAWL_TIMEOUT_SECS"),
            MIN_CRAWL_TIMEOUT.as_secs(),
        )?);
        if crawl_timeout < MIN_CRAWL_TIMEOUT {
            log::warn!(
                "CRAWL_TIMEOUT_SECS={} is below the minimum, using {}",
                crawl_timeout.as_secs(),
                MIN_CRAWL_TIMEOUT.as_secs()
            );
        }

        let emulation = match get("CRAWL_EMULATION") {
            Some(raw) => parse_bool("CRAWL_EMULATION", &raw)?,
            None => false,
        };

        Ok(Self {
            crawl: CrawlConfig {
                timeout: crawl_timeout.max(MIN_CRAWL_TIMEOUT),
                user_agent: get("CRAWL_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                emulation,
            },
            narrative: NarrativeConfig {
                provider,
                api_key,
                model,
                base_url,
                timeout: Duration::from_secs(narrative_timeout),
                prompt_char_limit,
            },
        })
    }
}

fn parse_number<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{} must be a non-negative integer, got {:?}", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!("{} must be a boolean, got {:?}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AnalyzerConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AnalyzerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.narrative.provider, NarrativeProvider::ChatCompletions);
        assert_eq!(config.narrative.model, "llama-3.1-8b-instant");
        assert_eq!(config.narrative.prompt_char_limit, 7000);
        assert_eq!(config.crawl.timeout, Duration::from_secs(60));
        assert!(config.narrative.api_key.is_none());
        assert!(!config.crawl.emulation);
    }

    #[test]
    fn gemini_provider_switches_defaults_and_key_fallback() {
        let config = load(&[
            ("NARRATIVE_PROVIDER", "Gemini"),
            ("GEMINI_API_KEY", "g-123"),
            ("GROQ_API_KEY", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.narrative.provider, NarrativeProvider::Gemini);
        assert_eq!(config.narrative.model, "gemini-2.0-flash");
        assert_eq!(config.narrative.base_url, GEMINI_BASE_URL);
        assert_eq!(config.narrative.api_key.as_deref(), Some("g-123"));
    }

    #[test]
    fn explicit_key_wins_over_provider_key() {
        let config = load(&[("NARRATIVE_API_KEY", "main"), ("GROQ_API_KEY", "groq")]).unwrap();
        assert_eq!(config.narrative.api_key.as_deref(), Some("main"));
    }

    #[test]
    fn crawl_timeout_is_never_below_minimum() {
        let config = load(&[("CRAWL_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.crawl.timeout, MIN_CRAWL_TIMEOUT);

        let config = load(&[("CRAWL_TIMEOUT_SECS", "90"), ("CRAWL_EMULATION", "yes")]).unwrap();
        assert_eq!(config.crawl.timeout, Duration::from_secs(90));
        assert!(config.crawl.emulation);
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(load(&[("PROMPT_CHAR_LIMIT", "lots")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("NARRATIVE_TIMEOUT_SECS", "-1")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("NARRATIVE_TIMEOUT_SECS", "0")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("PROMPT_CHAR_LIMIT", "0")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("NARRATIVE_PROVIDER", "claude")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("CRAWL_EMULATION", "maybe")]), Err(AppError::Config(_))));
    }
}
