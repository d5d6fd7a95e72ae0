// ABOUTME: Domain profile data model and registry for site-specific article selectors.
// ABOUTME: Maps hostnames (exact or dot-suffix) to ordered selector lists, with embedded builtins.

//! Domain profiles for site-specific content extraction.
//!
//! A profile maps a hostname (or hostname suffix) to an ordered list of CSS
//! selectors pointing at the site's known article containers. A matched
//! profile's selector list is tried instead of the generic fallback list.

use serde::{Deserialize, Serialize};

/// Generic fallback selectors, ordered from most to least specific.
///
/// The list intentionally ends in maximally permissive selectors so that
/// extraction is always attempted even on unknown sites.
pub const GENERIC_SELECTORS: &[&str] = &[
    ".article-body__item",
    ".article-body",
    ".c-article-body",
    ".rus-article-body",
    ".col-article",
    "article",
    ".post-content",
    "main",
    "body",
];

/// Embedded JSON containing the builtin domain profiles.
const BUILTIN_PROFILES_JSON: &str = include_str!("../data/domain_profiles.json");

/// A site-specific selector list keyed by domain.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DomainProfile {
    /// Domain this profile applies to; subdomains match via dot-suffix.
    pub domain: String,
    /// Ordered list of article-container selectors to try.
    #[serde(default)]
    pub selectors: Vec<String>,
}

/// Ordered association list of domain profiles.
///
/// Exactly one lookup operation exists: exact hostname match or `.domain`
/// suffix match, first registered profile wins.
#[derive(Debug, Default, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<DomainProfile>,
}

impl ProfileRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile at the end of the lookup order.
    pub fn register(&mut self, profile: DomainProfile) {
        self.profiles.push(profile);
    }

    /// Looks up a profile by hostname (exact or dot-suffix match).
    ///
    /// The hostname is lowercased and trailing dots are ignored, so
    /// `WWW.Postimees.EE.` still resolves the `postimees.ee` profile.
    pub fn lookup(&self, hostname: &str) -> Option<&DomainProfile> {
        let host = hostname.trim_end_matches('.').to_lowercase();
        if host.is_empty() {
            return None;
        }
        self.profiles
            .iter()
            .find(|p| host == p.domain || host.ends_with(&format!(".{}", p.domain)))
    }

    /// Iterates over registered profiles in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainProfile> {
        self.profiles.iter()
    }

    /// Returns the number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if no profiles are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Loads the builtin profile registry from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn load_builtin_profiles() -> ProfileRegistry {
    let profiles: Vec<DomainProfile> =
        serde_json::from_str(BUILTIN_PROFILES_JSON).expect("failed to parse builtin profiles");

    let mut registry = ProfileRegistry::new();
    for profile in profiles {
        registry.register(profile);
    }
    registry
}

/// Extracts a normalized hostname from a URL string.
///
/// Lowercased, trailing-dot tolerant. Returns `None` for malformed URLs or
/// URLs without a host; never errors.
pub fn host_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
