// ABOUTME: Language detection from document attributes, meta tags, and URL heuristics.
// ABOUTME: Produces a normalized two-letter lowercase code with layered fallbacks.

//! Language detection.
//!
//! Priority chain, first non-empty (after normalization) wins:
//! 1. `html[lang]` root attribute
//! 2. `meta[property='og:locale']` content
//! 3. `meta[http-equiv=content-language]` content
//! 4. hostname-suffix hint (`.ee` -> `et`, `.fi` -> `fi`, else `en`), only
//!    when a source URL was supplied
//! 5. caller-supplied fallback
//! 6. empty string
//!
//! Codes are not validated against any ISO list; multi-part locales are
//! truncated to their primary subtag and lowercased (`en-US` -> `en`).

use scraper::Html;

use crate::profiles::host_from_url;
use crate::selectors::get_or_compile;

/// Normalizes a language/locale string to its lowercase primary subtag.
///
/// `"en_US"` -> `"en"`, `"EN-GB"` -> `"en"`, `"fr"` -> `"fr"`.
pub fn normalize_lang(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Hostname-suffix language hint.
pub fn lang_hint_from_host(hostname: &str) -> &'static str {
    let host = hostname.trim_end_matches('.').to_lowercase();
    if host.ends_with(".ee") {
        "et"
    } else if host.ends_with(".fi") {
        "fi"
    } else {
        "en"
    }
}

/// First non-empty trimmed attribute value among elements matching `css`.
fn attr_first(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = get_or_compile(css)?;
    for el in doc.select(&selector) {
        if let Some(value) = el.value().attr(attr) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Content of the `http-equiv` content-language meta tag, if present.
///
/// Matched case-insensitively on the http-equiv value since real pages use
/// both `content-language` and `Content-Language`.
fn http_equiv_content_language(doc: &Html) -> Option<String> {
    let selector = get_or_compile("meta[http-equiv]")?;
    for el in doc.select(&selector) {
        let equiv = el.value().attr("http-equiv")?;
        if equiv.eq_ignore_ascii_case("content-language") {
            if let Some(content) = el.value().attr("content") {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// Detects the document's language code.
///
/// Total over its inputs: a malformed `source_url` still yields the `en`
/// hint, and the result is `""` only when every tier is empty.
pub fn detect_language(doc: &Html, source_url: &str, fallback: Option<&str>) -> String {
    let candidates = [
        attr_first(doc, "html", "lang"),
        attr_first(doc, "meta[property='og:locale']", "content"),
        http_equiv_content_language(doc),
    ];
    for candidate in candidates.into_iter().flatten() {
        let normalized = normalize_lang(&candidate);
        if !normalized.is_empty() {
            return normalized;
        }
    }

    if !source_url.is_empty() {
        return match host_from_url(source_url) {
            Some(host) => lang_hint_from_host(&host).to_string(),
            None => "en".to_string(),
        };
    }

    if let Some(fb) = fallback {
        let normalized = normalize_lang(fb);
        if !normalized.is_empty() {
            return normalized;
        }
    }

    String::new()
}
