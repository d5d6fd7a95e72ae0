// ABOUTME: The main Client tying fetch, language detection, and extraction together.
// ABOUTME: Provides async peek() over the network, sync peek_html() for in-hand documents.

use std::net::{IpAddr, ToSocketAddrs};

use scraper::Html;
use tracing::debug;

use crate::error::PeekError;
use crate::extract::extract;
use crate::fetch::{fetch_html, is_private_ip, FetchOptions};
use crate::lang::detect_language;
use crate::options::{ClientBuilder, Options};
use crate::profiles::{host_from_url, load_builtin_profiles, ProfileRegistry, GENERIC_SELECTORS};
use crate::result::{word_count, PeekResult, Summary};
use crate::selectors::precompile_selectors;
use crate::summarize::{engine_output_language, shared_context_for, SummarizeOptions, Summarizer};

/// The main linkpeek client.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    profiles: ProfileRegistry,
}

/// Reason a redirect hop must be refused, or `None` to follow it.
///
/// Resolution is synchronous because reqwest's redirect policy is a sync
/// callback; every hop is checked, not just the first and last URL.
fn redirect_block_reason(next: &url::Url) -> Option<&'static str> {
    let host = next.host_str()?;

    if let Ok(ip) = host.parse::<IpAddr>() {
        return is_private_ip(&ip).then_some("redirect to private IP blocked");
    }

    let port = next
        .port()
        .unwrap_or(if next.scheme() == "https" { 443 } else { 80 });
    match (host, port).to_socket_addrs() {
        Ok(mut addrs) => {
            if addrs.any(|sa| is_private_ip(&sa.ip())) {
                Some("redirect to private IP blocked")
            } else {
                None
            }
        }
        Err(_) => Some("DNS lookup failed during redirect"),
    }
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            let allow_private = opts.allow_private_networks;
            let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
                if !allow_private {
                    if let Some(reason) = redirect_block_reason(attempt.url()) {
                        return attempt.error(reason);
                    }
                }
                attempt.follow()
            });

            reqwest::Client::builder()
                .redirect(redirect_policy)
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let profiles = opts.profiles.clone().unwrap_or_else(load_builtin_profiles);

        // Warm the selector cache so extraction never parses CSS in-loop.
        precompile_selectors(
            GENERIC_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .chain(profiles.iter().flat_map(|p| p.selectors.iter().cloned())),
        );

        Self {
            opts,
            http_client,
            profiles,
        }
    }

    /// Peek a remote page: fetch, detect language, extract article text.
    ///
    /// Absent content is a populated [`PeekResult`] with `extraction: None`;
    /// only fetch-side problems are errors.
    pub async fn peek(&self, url: &str) -> Result<PeekResult, PeekError> {
        if url.is_empty() {
            return Err(PeekError::invalid_url(url, "Peek", None));
        }
        if url::Url::parse(url).is_err() {
            return Err(PeekError::invalid_url(
                url,
                "Peek",
                Some(anyhow::anyhow!("malformed URL")),
            ));
        }

        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };
        let fetched = fetch_html(&self.http_client, url, &fetch_opts).await?;
        let html = fetched.text();

        // Redirects decide which domain profile applies.
        let mut result = self.peek_html(&html, &fetched.final_url);
        result.url = url.to_string();
        Ok(result)
    }

    /// Peek an already-in-hand document, e.g. the current page.
    ///
    /// Total over its inputs: malformed URLs fall back to the generic
    /// selector tier and the language hint chain.
    pub fn peek_html(&self, html: &str, url: &str) -> PeekResult {
        let doc = Html::parse_document(html);

        let hostname = host_from_url(url).unwrap_or_default();
        let language = detect_language(&doc, url, self.opts.fallback_language.as_deref());
        let extraction = extract(&doc, url, &self.profiles, self.opts.max_chars);
        let wc = extraction.as_ref().map_or(0, |e| word_count(&e.text));

        debug!(
            url,
            hostname,
            language,
            found = extraction.is_some(),
            "peek finished"
        );

        PeekResult {
            url: url.to_string(),
            final_url: url.to_string(),
            hostname,
            language,
            extraction,
            word_count: wc,
        }
    }

    /// End-to-end convenience: peek `url`, then summarize with `engine`.
    ///
    /// `title_hint` is the hovered link's text; a question-shaped title turns
    /// the shared context into a question-answering instruction. Absent
    /// content surfaces as a `NoContent` error here since there is nothing
    /// to hand to the engine.
    pub async fn summarize_with(
        &self,
        engine: &dyn Summarizer,
        url: &str,
        title_hint: Option<&str>,
    ) -> Result<Summary, PeekError> {
        let peeked = self.peek(url).await?;
        let Some(text) = peeked.text() else {
            return Err(PeekError::no_content(url, "Summarize"));
        };

        let context = shared_context_for(&peeked.language, title_hint);
        let opts = SummarizeOptions {
            shared_context: context.text,
            output_language: engine_output_language(&peeked.language).to_string(),
            ..Default::default()
        };
        let summary = engine.summarize(text, &opts).await?;

        Ok(Summary {
            summary,
            source: peeked,
        })
    }
}
