// ABOUTME: Privileged HTML fetcher with timeout, SSRF refusal, size cap, and charset decoding.
// ABOUTME: The single network boundary of the pipeline; everything downstream is synchronous.

//! Remote HTML fetching.
//!
//! Retrieves the raw HTML of a linked page with a short, fixed timeout
//! (5 seconds by default) and descriptive errors on failure. Because hovered
//! links are arbitrary, private-network targets are refused unless the
//! caller opts in.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::PeekError;

/// Maximum allowed response body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Default fetch timeout, matching the reference relay behavior.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

static PRIVATE_V4: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
    ]
    .iter()
    .map(|net| net.parse().unwrap())
    .collect()
});

static PRIVATE_V6: Lazy<Vec<Ipv6Net>> =
    Lazy::new(|| ["fc00::/7", "fe80::/10"].iter().map(|net| net.parse().unwrap()).collect());

/// Options for fetching a page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decodes the body to a string using the content-type charset when
    /// declared, falling back to detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => ip.is_loopback() || PRIVATE_V6.iter().any(|net| net.contains(ip)),
    }
}

/// Refuses hosts that are, or resolve to, private/reserved addresses.
async fn refuse_private_host(url: &url::Url, original: &str) -> Result<(), PeekError> {
    let Some(host) = url.host_str() else {
        return Ok(());
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(PeekError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
        return Ok(());
    }

    let port = url
        .port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        PeekError::fetch(original, "Fetch", Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for addr in addrs {
        if is_private_ip(&addr.ip()) {
            return Err(PeekError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("host resolves to a private IP address")),
            ));
        }
    }
    Ok(())
}

/// Extracts the charset parameter from a content-type header value.
fn header_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            part.strip_prefix("charset=")
                .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
        })
}

/// Decodes body bytes using the declared charset, or detection when absent.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(charset) = content_type.and_then(header_charset) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let (decoded, _, _) = detector.guess(None, true).decode(body);
    decoded.into_owned()
}

/// Fetches the HTML page at `url`.
///
/// Errors carry the failing operation and URL; timeouts are distinguished
/// from other network failures via [`crate::ErrorCode::Timeout`].
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, PeekError> {
    if url.is_empty() {
        return Err(PeekError::invalid_url(url, "Fetch", None));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| PeekError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e))))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(PeekError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        refuse_private_host(&parsed, url).await?;
    }

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!(url, "fetching page");
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            PeekError::timeout(url, "Fetch", Some(anyhow::anyhow!("request timed out: {}", e)))
        } else {
            PeekError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
        }
    })?;

    // Redirects may land somewhere the original host check never saw.
    if !opts.allow_private_networks {
        let final_url = response.url().clone();
        refuse_private_host(&final_url, url).await?;
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(PeekError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            PeekError::timeout(url, "Fetch", Some(anyhow::anyhow!("body read timed out: {}", e)))
        } else {
            PeekError::fetch(url, "Fetch", Some(anyhow::anyhow!("failed to read body: {}", e)))
        }
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(PeekError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if !(200..300).contains(&status) {
        return Err(PeekError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchResult {
        url: url.to_string(),
        final_url,
        status,
        content_type,
        body,
    })
}
