//! HTML fetching and document query helpers

use std::time::{Duration, Instant};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::error::AnalysisError;
use crate::keywords::contains_any;

const META_SNIFF_BYTES: usize = 1024;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status: u16,
    pub body: String,
    /// Wall-clock time from sending the request to reading the full body.
    pub elapsed: Duration,
}

/// Build the HTTP client used for page fetches.
pub fn build_http_client(user_agent: &str) -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| AnalysisError::Network(e.to_string()))
}

/// Fetch a page. Timeouts, transport errors and non-2xx statuses are failures.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, AnalysisError> {
    let started = Instant::now();

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_request_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AnalysisError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let header_charset = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset_label)
        .map(str::to_string);
    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            AnalysisError::Timeout(timeout.as_secs())
        } else {
            AnalysisError::Body(e.to_string())
        }
    })?;
    let elapsed = started.elapsed();
    let body = decode_body(&bytes, header_charset.as_deref());

    debug!(
        url,
        final_url = final_url.as_str(),
        status = status.as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        bytes = bytes.len(),
        "Fetched page"
    );

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        body,
        elapsed,
    })
}

/// Decode a page body. The `Content-Type` charset wins, then a `<meta>`
/// declaration near the top of the document, then UTF-8.
pub fn decode_body(bytes: &[u8], header_charset: Option<&str>) -> String {
    let encoding = header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    static META_CHARSET: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)<meta[^>]*?charset\s*=").expect("valid regex"));

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_BYTES)]);
    let found = META_CHARSET.find(&head)?;
    let label = charset_label(&head[found.start()..])?;
    let encoding = Encoding::for_label(label.as_bytes())?;
    // An ASCII-readable UTF-16 declaration is wrong; read as UTF-8.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        Some(UTF_8)
    } else {
        Some(encoding)
    }
}

/// Value of the first `charset=` parameter in `text`.
fn charset_label(text: &str) -> Option<&str> {
    static CHARSET: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?i)charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).expect("valid regex")
    });

    CHARSET
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn classify_request_error(err: reqwest::Error, timeout: Duration) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout(timeout.as_secs())
    } else if err.is_builder() {
        AnalysisError::InvalidUrl(err.to_string())
    } else {
        AnalysisError::Network(err.to_string())
    }
}

/// Raw bodies of every JSON-LD script block, in document order.
///
/// Empty blocks are kept so that they still count as present markup.
pub fn json_ld_blocks(document: &Html) -> Vec<String> {
    select_all(document, "script")
        .into_iter()
        .filter(|element| {
            element
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .is_some_and(|t| t.contains("ld+json"))
        })
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// First element matching a CSS selector.
pub fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// All elements matching a CSS selector. An unparsable selector matches nothing.
pub fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn count_elements(document: &Html, selector: &str) -> usize {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

/// Trimmed text content of an element, descendants included.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector`, empty when absent.
pub fn first_text(document: &Html, selector: &str) -> String {
    select_first(document, selector)
        .map(element_text)
        .unwrap_or_default()
}

/// `content` attribute of the first element matching `selector`.
pub fn first_content(document: &Html, selector: &str) -> Option<String> {
    select_first(document, selector)
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string)
}

/// Number of elements matching `selector` whose class attribute contains any keyword.
pub fn count_class_matches(document: &Html, selector: &str, keywords: &[&str]) -> usize {
    select_all(document, selector)
        .into_iter()
        .filter(|element| {
            element
                .value()
                .attr("class")
                .is_some_and(|class| contains_any(class, keywords))
        })
        .count()
}

/// Number of visible text nodes matching `pattern`.
pub fn count_matching_text_nodes(document: &Html, pattern: &Regex) -> usize {
    visible_text_nodes(document)
        .filter(|text| pattern.is_match(text))
        .count()
}

/// Number of `tags` elements whose sole string matches `pattern`.
///
/// The sole string is the text of an element whose child chain consists of single
/// children ending in one text node; elements with mixed content have none.
pub fn count_sole_string_matches(document: &Html, tags: &str, pattern: &Regex) -> usize {
    select_all(document, tags)
        .into_iter()
        .filter_map(sole_string)
        .filter(|text| pattern.is_match(text))
        .count()
}

pub fn sole_string(element: ElementRef<'_>) -> Option<String> {
    let mut node = *element;
    loop {
        let mut children = node.children();
        let first = children.next()?;
        if children.next().is_some() {
            return None;
        }
        match first.value() {
            Node::Text(text) => return Some(String::from(&**text)),
            Node::Element(_) => node = first,
            _ => return None,
        }
    }
}

/// All text of the document with `script`/`style` content left out.
pub fn visible_text(document: &Html) -> String {
    visible_text_nodes(document).collect()
}

fn visible_text_nodes(document: &Html) -> impl Iterator<Item = &str> {
    document.tree.root().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| matches!(element.name(), "script" | "style"))
        });
        if hidden { None } else { Some(&**text) }
    })
}

/// Unicode-aware length, so Cyrillic and Latin text measure the same way.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
