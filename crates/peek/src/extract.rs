// ABOUTME: Core content extractor locating the main article text of an HTML document.
// ABOUTME: Tries domain-profile selectors then generic fallbacks, paragraph strategy before raw text.

//! Main-content extraction.
//!
//! Given a parsed document and its source URL, finds the best-guess article
//! body text or reports that no content was found.
//!
//! Key behaviors:
//! - The hostname resolves a domain profile; a matched profile's selector
//!   list is the active list, otherwise the generic fallback list is used.
//! - Selectors are tried in order. Per selector, the paragraph strategy
//!   (all `<p>` descendants across every matched container, document order)
//!   wins when it yields more than 2 paragraphs; otherwise the raw-container
//!   strategy wins when the joined inner text exceeds 200 characters.
//! - Strategies are never interleaved across selectors: both are exhausted
//!   for selector N before selector N+1 is consulted.
//! - The winning text is normalized once: runs of spaces/tabs collapse to a
//!   single space (newlines are kept as paragraph boundaries), then a hard
//!   character cut at the caller's ceiling.
//! - Total over its inputs: malformed URLs fall back to the generic list and
//!   an empty document yields `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profiles::{host_from_url, ProfileRegistry, GENERIC_SELECTORS};
use crate::selectors::get_or_compile;

/// Minimum paragraph count for the paragraph strategy to accept a selector.
///
/// Guards against selectors that accidentally match boilerplate such as a
/// single disclaimer paragraph.
const MIN_PARAGRAPHS: usize = 3;

/// Minimum raw inner-text length (in characters) for the raw-container strategy.
const MIN_RAW_CHARS: usize = 200;

/// Default ceiling on extracted text length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 20_000;

static HORIZONTAL_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Which selector list produced the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorTier {
    /// A domain profile's selector list.
    Domain,
    /// The generic fallback list.
    Generic,
}

/// Which sub-strategy produced the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Joined `<p>` descendant texts across all matched containers.
    Paragraphs,
    /// Joined inner text of the matched containers themselves.
    RawContainer,
}

/// A successful extraction: normalized text plus its provenance.
///
/// Created fresh per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Normalized article text.
    pub text: String,
    /// Selector list that produced the text.
    pub tier: SelectorTier,
    /// Sub-strategy that produced the text.
    pub strategy: Strategy,
    /// The winning selector.
    pub selector: String,
}

/// Rendered inner text of an element: concatenated text nodes, trimmed.
fn rendered_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collapses runs of horizontal whitespace into single spaces.
///
/// Newlines are preserved so paragraph boundaries survive normalization.
fn collapse_horizontal_whitespace(s: &str) -> String {
    HORIZONTAL_WS_RE.replace_all(s, " ").into_owned()
}

/// Hard character cut at `max_chars`; not sentence-aware.
fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

fn finalize(
    text: String,
    tier: SelectorTier,
    strategy: Strategy,
    selector: &str,
    max_chars: usize,
) -> Extraction {
    let normalized = truncate_chars(collapse_horizontal_whitespace(&text), max_chars);
    debug!(selector, ?tier, ?strategy, len = normalized.len(), "extraction accepted");
    Extraction {
        text: normalized,
        tier,
        strategy,
        selector: selector.to_string(),
    }
}

/// Extracts the main article text of `doc`.
///
/// `source_url` is used only to resolve a domain profile; malformed URLs fall
/// back to the generic selector list. Returns `None` when no selector in the
/// active list yields usable text.
pub fn extract(
    doc: &Html,
    source_url: &str,
    profiles: &ProfileRegistry,
    max_chars: usize,
) -> Option<Extraction> {
    let hostname = host_from_url(source_url);
    let profile = hostname.as_deref().and_then(|h| profiles.lookup(h));

    let (active, tier): (Vec<&str>, SelectorTier) = match profile {
        Some(p) => (
            p.selectors.iter().map(String::as_str).collect(),
            SelectorTier::Domain,
        ),
        None => (GENERIC_SELECTORS.to_vec(), SelectorTier::Generic),
    };

    for css in active {
        let Some(selector) = get_or_compile(css) else {
            continue;
        };
        let containers: Vec<ElementRef> = doc.select(&selector).collect();
        if containers.is_empty() {
            continue;
        }

        // Paragraph strategy: all <p> descendants across every matched
        // container, in document order.
        let paragraphs: Vec<String> = containers
            .iter()
            .flat_map(|c| c.select(&P_SELECTOR))
            .map(rendered_text)
            .collect();
        if paragraphs.len() >= MIN_PARAGRAPHS {
            return Some(finalize(
                paragraphs.join("\n\n"),
                tier,
                Strategy::Paragraphs,
                css,
                max_chars,
            ));
        }

        // Raw-container strategy: the containers' own inner text. Containers
        // with zero <p> children never block this fallback.
        let raw = containers
            .iter()
            .map(|c| rendered_text(*c))
            .collect::<Vec<_>>()
            .join("\n\n");
        if raw.chars().count() > MIN_RAW_CHARS {
            return Some(finalize(raw, tier, Strategy::RawContainer, css, max_chars));
        }

        debug!(selector = css, "selector yielded no usable text");
    }

    None
}
