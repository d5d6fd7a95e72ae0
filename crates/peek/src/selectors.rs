// ABOUTME: Pre-compiled CSS selector cache for repeated DOM queries.
// ABOUTME: Compiles each selector string once and shares the result process-wide.

//! Selector caching for efficient repeated DOM queries.
//!
//! CSS selector parsing is expensive relative to the actual matching, and the
//! same small selector lists are evaluated on every extraction. This module
//! compiles each selector once and caches it, including invalid selectors
//! (cached as `None`).

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
/// Safe to call from multiple threads; reads take a shared lock.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Another thread may have inserted between the read and write locks.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles a batch of selectors into the cache.
///
/// Call during client construction (after the profile registry is loaded)
/// to warm the cache before extraction work starts.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap();
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            let compiled = Selector::parse(css).ok();
            cache.insert(css.to_string(), compiled);
        }
    }
}
