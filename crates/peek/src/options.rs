// ABOUTME: Configuration options for the linkpeek client and the fluent ClientBuilder.
// ABOUTME: Carries the fetch timeout, extraction ceiling, and profile/http overrides.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::extract::DEFAULT_MAX_CHARS;
use crate::fetch::DEFAULT_FETCH_TIMEOUT;
use crate::profiles::ProfileRegistry;

/// Configuration options for the linkpeek client.
#[derive(Debug, Clone)]
pub struct Options {
    /// Fetch timeout; 5 seconds by default.
    pub timeout: Duration,
    pub user_agent: String,
    /// Ceiling on extracted text length in characters. Tunable: 20 000 by
    /// default, smaller values suit engines with tight input budgets.
    pub max_chars: usize,
    pub allow_private_networks: bool,
    /// Language used when detection comes up empty and no URL hint applies.
    pub fallback_language: Option<String>,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub profiles: Option<ProfileRegistry>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: "linkpeek/0.1".to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            allow_private_networks: false,
            fallback_language: None,
            headers: HashMap::new(),
            http_client: None,
            profiles: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the extracted-text character ceiling.
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.opts.max_chars = max_chars;
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Set the fallback language for when detection comes up empty.
    pub fn fallback_language(mut self, lang: impl Into<String>) -> Self {
        self.opts.fallback_language = Some(lang.into());
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Use a custom domain-profile registry instead of the builtins.
    pub fn profiles(mut self, profiles: ProfileRegistry) -> Self {
        self.opts.profiles = Some(profiles);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}
