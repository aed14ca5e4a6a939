use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

use crate::domain::models::{
    ButtonElement, Headings, ImageElement, LinkElement, PageRecord, PerformanceTiming,
};

const SKIPPED_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements whose boundaries separate words. Inline markup does not.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "button", "caption", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "option", "p",
    "pre", "section", "summary", "table", "td", "th", "tr", "ul", "select",
];

/// Internal and external anchors of a page.
pub type LinkLists = (Vec<LinkElement>, Vec<LinkElement>);

/// Turns fetched HTML into a [`PageRecord`].
pub struct PageExtractor;

impl PageExtractor {
    pub fn extract(html: &str, url: &str, performance: PerformanceTiming) -> PageRecord {
        let document = Html::parse_document(html);
        let (internal_links, external_links) = Self::extract_links(&document, url);
        let schema = Self::extract_json_ld(&document);

        PageRecord {
            url: url.to_string(),
            title: Self::extract_title(&document).unwrap_or_default(),
            meta_description: Self::extract_meta_description(&document).unwrap_or_default(),
            canonical: Self::extract_canonical(&document).is_some(),
            language: Self::extract_language(&document).unwrap_or_default(),
            og_title: Self::meta_property(&document, "og:title").is_some(),
            og_description: Self::meta_property(&document, "og:description").is_some(),
            og_image: Self::meta_property(&document, "og:image").is_some(),
            twitter_card: Self::extract_twitter_card(&document).unwrap_or_default(),
            headings: Self::extract_headings(&document),
            images: Self::extract_images(&document, url),
            internal_links,
            external_links,
            navigation_links: Self::extract_navigation(&document, url),
            buttons: Self::extract_buttons(&document, url),
            structured_data_count: schema.len(),
            schema,
            word_count: Self::extract_word_count(&document),
            has_media_queries: Self::detect_responsive(&document),
            performance: performance.normalized(),
        }
    }

    pub fn extract_title(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("title").unwrap());
        html.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn extract_meta_description(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='description']").unwrap());
        first_attr(html, selector, "content")
    }

    pub fn extract_canonical(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("link[rel='canonical']").unwrap());
        first_attr(html, selector, "href")
    }

    pub fn extract_language(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("html[lang]").unwrap());
        first_attr(html, selector, "lang")
    }

    pub fn extract_twitter_card(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='twitter:card']").unwrap());
        first_attr(html, selector, "content")
    }

    /// Non-empty `content` of `meta[property=<property>]`.
    pub fn meta_property(html: &Html, property: &str) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("meta[property]").unwrap());
        html.select(selector)
            .filter(|el| el.value().attr("property") == Some(property))
            .filter_map(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }

    /// Visible words in `<body>`, skipping script-like containers.
    pub fn extract_word_count(html: &Html) -> u64 {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("body").unwrap());

        let Some(body) = html.select(selector).next() else {
            return 0;
        };

        let mut visible = String::new();
        push_visible_text(body, &mut visible);
        visible.split_whitespace().count() as u64
    }

    pub fn extract_headings(html: &Html) -> Headings {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

        let mut headings = Headings::default();
        for element in html.select(selector) {
            let Ok(level) = element.value().name().trim_start_matches('h').parse::<u8>() else {
                continue;
            };
            let text = collapse_whitespace(&element.text().collect::<String>());
            if !text.is_empty() {
                headings.push(level, text);
            }
        }
        headings
    }

    pub fn extract_images(html: &Html, base_url: &str) -> Vec<ImageElement> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("img[src]").unwrap());
        let base = Url::parse(base_url).ok();

        html.select(selector)
            .filter_map(|element| {
                let src = element.value().attr("src")?.trim();
                if src.is_empty() {
                    return None;
                }

                Some(ImageElement {
                    src: resolve(base.as_ref(), src),
                    alt: element.value().attr("alt").unwrap_or("").trim().to_string(),
                    title: element
                        .value()
                        .attr("title")
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty()),
                })
            })
            .collect()
    }

    /// Anchors split by whether they stay on the page's host and port.
    pub fn extract_links(html: &Html, base_url: &str) -> LinkLists {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());

        let base = Url::parse(base_url).ok();
        let base_host = base
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|s| s.to_string());
        let base_port = base.as_ref().and_then(|u| u.port_or_known_default());

        let mut internal = Vec::new();
        let mut external = Vec::new();

        for element in html.select(selector) {
            let Some(link) = link_element(element, base.as_ref()) else {
                continue;
            };

            let is_internal = match Url::parse(&link.url) {
                Ok(link_url) => {
                    link_url.host_str().map(|h| h.to_string()) == base_host
                        && link_url.port_or_known_default() == base_port
                }
                Err(_) => false,
            };

            if is_internal {
                internal.push(link);
            } else {
                external.push(link);
            }
        }

        (internal, external)
    }

    /// Anchors inside `<nav>` or `<header>`.
    pub fn extract_navigation(html: &Html, base_url: &str) -> Vec<LinkElement> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("nav a[href], header a[href]").unwrap());
        let base = Url::parse(base_url).ok();

        html.select(selector)
            .filter_map(|element| link_element(element, base.as_ref()))
            .collect()
    }

    /// Call-to-action candidates with non-empty text.
    pub fn extract_buttons(html: &Html, base_url: &str) -> Vec<ButtonElement> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| {
            Selector::parse(
                "button, input[type='submit'], input[type='button'], [role='button'], \
                 a[class*='btn'], a[class*='button'], a[class*='cta']",
            )
            .unwrap()
        });
        let base = Url::parse(base_url).ok();

        html.select(selector)
            .filter_map(|element| {
                let text = if element.value().name() == "input" {
                    element.value().attr("value").unwrap_or("").trim().to_string()
                } else {
                    anchor_text(element)
                };
                if text.is_empty() {
                    return None;
                }

                let href = element
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(|h| resolve(base.as_ref(), h));

                Some(ButtonElement { text, href })
            })
            .collect()
    }

    /// JSON-LD blocks. Top-level arrays and `@graph` are flattened; blocks
    /// that fail to parse are skipped.
    pub fn extract_json_ld(html: &Html) -> Vec<Value> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR
            .get_or_init(|| Selector::parse("script[type='application/ld+json']").unwrap());

        let mut blocks = Vec::new();
        for element in html.select(selector) {
            let raw = element.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => flatten_json_ld(value, &mut blocks),
                Err(e) => log::debug!("Skipping invalid JSON-LD block: {}", e),
            }
        }
        blocks
    }

    /// Media queries in inline styles or stylesheet links, or a device-width
    /// viewport.
    pub fn detect_responsive(html: &Html) -> bool {
        static STYLE: OnceLock<Selector> = OnceLock::new();
        static LINK_MEDIA: OnceLock<Selector> = OnceLock::new();
        static VIEWPORT: OnceLock<Selector> = OnceLock::new();
        let style = STYLE.get_or_init(|| Selector::parse("style").unwrap());
        let link_media = LINK_MEDIA.get_or_init(|| Selector::parse("link[media]").unwrap());
        let viewport = VIEWPORT.get_or_init(|| Selector::parse("meta[name='viewport']").unwrap());

        let inline_media = html
            .select(style)
            .any(|el| el.text().collect::<String>().contains("@media"));
        let linked_media = html
            .select(link_media)
            .filter_map(|el| el.value().attr("media"))
            .any(is_media_query);
        let device_width = html.select(viewport).any(|el| {
            el.value()
                .attr("content")
                .map(|c| c.replace(' ', "").contains("width=device-width"))
                .unwrap_or(false)
        });

        inline_media || linked_media || device_width
    }
}

/// `media` values with a viewport feature, e.g. `(max-width: 600px)`.
/// Plain media types such as `all`, `screen` or `print` do not count.
fn is_media_query(media: &str) -> bool {
    let media = media.to_ascii_lowercase();
    media.contains('(') && (media.contains("width") || media.contains("device"))
}

/// Body text in document order. Text nodes are concatenated as-is and a
/// space is added only around block-level elements.
fn push_visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if SKIPPED_TEXT_ELEMENTS.contains(&name) {
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push(' ');
        }
        push_visible_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

fn first_attr(html: &Html, selector: &Selector, attr: &str) -> Option<String> {
    html.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

fn link_element(element: ElementRef, base: Option<&Url>) -> Option<LinkElement> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
    {
        return None;
    }

    Some(LinkElement {
        url: resolve(base, href),
        text: anchor_text(element),
    })
}

/// Visible text, falling back to aria-label, title, then a child image's alt.
fn anchor_text(element: ElementRef) -> String {
    static IMG_SELECTOR: OnceLock<Selector> = OnceLock::new();
    let img_selector = IMG_SELECTOR.get_or_init(|| Selector::parse("img").unwrap());

    let text = collapse_whitespace(&element.text().collect::<String>());
    if !text.is_empty() {
        return text;
    }

    if let Some(attr) = element
        .value()
        .attr("aria-label")
        .or_else(|| element.value().attr("title"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return attr.to_string();
    }

    element
        .select(img_selector)
        .filter_map(|img| img.value().attr("alt"))
        .map(str::trim)
        .find(|alt| !alt.is_empty())
        .unwrap_or("")
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_json_ld(item, out);
            }
        }
        Value::Object(mut map) => match map.remove("@graph") {
            Some(graph) => flatten_json_ld(graph, out),
            None => out.push(Value::Object(map)),
        },
        _ => {}
    }
}
