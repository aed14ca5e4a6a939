//! Rich domain entities - behavior lives WITH data

use serde::{Deserialize, Serialize};

// ====== Sides & Winners ======

/// Which of the two analysed sites a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Client,
    Competitor,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Client => "client",
            Side::Competitor => "competitor",
        }
    }
}

/// A client/competitor pair of anything: raw metrics, scores, names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paired<T> {
    pub client: T,
    pub competitor: T,
}

impl<T> Paired<T> {
    pub fn new(client: T, competitor: T) -> Self {
        Self { client, competitor }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Client => &self.client,
            Side::Competitor => &self.competitor,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Paired<U> {
        Paired {
            client: f(&self.client),
            competitor: f(&self.competitor),
        }
    }
}

/// Three-valued winner label. Brand names are substituted only when a report
/// is assembled; everything upstream speaks this vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Client,
    Competitor,
    #[default]
    Tie,
}

impl Winner {
    /// Higher is better. Equal (or incomparable) scores are a tie.
    pub fn from_scores(client: f64, competitor: f64) -> Self {
        if client > competitor {
            Winner::Client
        } else if competitor > client {
            Winner::Competitor
        } else {
            Winner::Tie
        }
    }

    /// Lower is better (durations). Equal values are a tie.
    pub fn lower_is_better(client: f64, competitor: f64) -> Self {
        Self::from_scores(competitor, client)
    }

    /// Coerce a free-text label into the winner vocabulary.
    /// Anything unrecognised is a tie.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "client" => Winner::Client,
            "competitor" => Winner::Competitor,
            _ => Winner::Tie,
        }
    }

    /// The same verdict seen from the other side.
    pub fn swapped(self) -> Self {
        match self {
            Winner::Client => Winner::Competitor,
            Winner::Competitor => Winner::Client,
            Winner::Tie => Winner::Tie,
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Winner::Client => Some(Side::Client),
            Winner::Competitor => Some(Side::Competitor),
            Winner::Tie => None,
        }
    }

    /// Presentation name for this label: the side's brand name or "Tie".
    pub fn display_name(self, names: &Paired<String>) -> &str {
        match self.side() {
            Some(side) => names.get(side).as_str(),
            None => "Tie",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Client => "client",
            Winner::Competitor => "competitor",
            Winner::Tie => "tie",
        }
    }
}

// ====== Detailed Page Elements ======

/// Heading texts by level, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    pub fn level(&self, level: u8) -> &[String] {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            6 => &self.h6,
            _ => &[],
        }
    }

    pub fn push(&mut self, level: u8, text: String) {
        match level {
            1 => self.h1.push(text),
            2 => self.h2.push(text),
            3 => self.h3.push(text),
            4 => self.h4.push(text),
            5 => self.h5.push(text),
            6 => self.h6.push(text),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageElement {
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageElement {
    pub fn has_alt(&self) -> bool {
        !self.alt.trim().is_empty()
    }
}

/// Anchor descriptor, used for internal, external and navigation links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkElement {
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonElement {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Page timing in milliseconds. Zero means "not measured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceTiming {
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub first_paint: f64,
}

impl PerformanceTiming {
    pub fn new(load_time: f64, dom_content_loaded: f64, first_paint: f64) -> Self {
        Self {
            load_time: sanitize_ms(load_time),
            dom_content_loaded: sanitize_ms(dom_content_loaded),
            first_paint: sanitize_ms(first_paint),
        }
    }

    /// Clamp negative or non-finite timings to zero.
    pub fn normalized(self) -> Self {
        Self::new(self.load_time, self.dom_content_loaded, self.first_paint)
    }
}

fn sanitize_ms(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ====== Rich Entity: PageRecord ======

/// Normalized snapshot of one crawled page.
///
/// Every field defaults, so a record decoded from a partial payload is still
/// total: missing numbers are zero, missing sequences are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub canonical: bool,
    pub language: String,
    pub og_title: bool,
    pub og_description: bool,
    pub og_image: bool,
    pub twitter_card: String,

    #[serde(flatten)]
    pub headings: Headings,
    pub images: Vec<ImageElement>,
    pub internal_links: Vec<LinkElement>,
    pub external_links: Vec<LinkElement>,
    pub navigation_links: Vec<LinkElement>,
    pub buttons: Vec<ButtonElement>,

    pub schema: Vec<serde_json::Value>,
    pub structured_data_count: usize,

    pub word_count: u64,
    pub has_media_queries: bool,
    pub performance: PerformanceTiming,
}

impl PageRecord {
    pub fn images_with_alt(&self) -> usize {
        self.images.iter().filter(|img| img.has_alt()).count()
    }

    /// `@type` of every JSON-LD block, `"Unknown"` when absent.
    pub fn schema_types(&self) -> Vec<String> {
        self.schema.iter().map(schema_type).collect()
    }
}

fn schema_type(block: &serde_json::Value) -> String {
    match block.get("@type") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let names: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if names.is_empty() {
                "Unknown".to_string()
            } else {
                names.join(", ")
            }
        }
        _ => "Unknown".to_string(),
    }
}

// ====== Acquisition outcome ======

/// Terminal failure to acquire a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlFailure {
    pub url: String,
    pub message: String,
}

/// Result of acquiring one page: a record, or a terminal failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Crawled(PageRecord),
    Failed(CrawlFailure),
}

impl PageOutcome {
    pub fn failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        PageOutcome::Failed(CrawlFailure {
            url: url.into(),
            message: message.into(),
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }

    pub fn record(&self) -> Option<&PageRecord> {
        match self {
            PageOutcome::Crawled(record) => Some(record),
            PageOutcome::Failed(_) => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            PageOutcome::Crawled(_) => None,
            PageOutcome::Failed(failure) => Some(failure.message.as_str()),
        }
    }

    /// Decode the extraction wire format: a page record, or
    /// `{error: true, message, url}` when the `error` field is truthy.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("error").map(is_truthy).unwrap_or(false) {
            let url = value.get("url").and_then(|v| v.as_str()).unwrap_or_default();
            let message = value
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown extraction error");
            return Ok(Self::failed(url, message));
        }

        let mut record: PageRecord = serde_json::from_value(value)?;
        record.performance = record.performance.normalized();
        Ok(PageOutcome::Crawled(record))
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
