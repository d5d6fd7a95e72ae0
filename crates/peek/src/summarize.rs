// ABOUTME: Summarization engine boundary: options, steering context, per-language cache.
// ABOUTME: The engine itself is external; a small extractive LeadSummarizer ships for offline use.

//! Summarization boundary.
//!
//! The summarization engine is an external capability consumed as a black
//! box: `summarize(text, options) -> string, fails on error`. This module
//! defines the trait for that boundary, the option set the reference engine
//! accepts, the per-language steering context prepended to requests, and an
//! explicit per-language instance cache owned by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PeekError;
use crate::lang::normalize_lang;

/// The kind of summary requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryKind {
    #[default]
    KeyPoints,
    #[serde(rename = "tl;dr")]
    Tldr,
    Teaser,
    Headline,
}

/// The output format of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    Markdown,
    PlainText,
}

/// The target summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Options handed to the engine on every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub format: SummaryFormat,
    pub length: SummaryLength,
    /// Natural-language steering instruction, see [`shared_context_for`].
    #[serde(default)]
    pub shared_context: String,
    /// Engine output language, see [`engine_output_language`].
    #[serde(default)]
    pub output_language: String,
}

/// An external summarization engine.
///
/// Both "unavailable" and "errored mid-call" surface as
/// [`crate::ErrorCode::Summarize`]; callers treat them as recoverable,
/// user-visible failures.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, opts: &SummarizeOptions) -> Result<String, PeekError>;
}

/// A steering context string plus whether an engine created with it may be
/// reused for the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContext {
    pub text: String,
    /// False when the context embeds a link-specific question.
    pub cacheable: bool,
}

/// Per-language instruction keeping the engine's output in the input language.
fn steering_prefix(lang: &str) -> &'static str {
    match lang {
        "et" => "Kui sisendkeel on eesti keel, tee kokkuvõte eesti keeles.",
        "fi" => "Jos syötekieli on suomi, tee yhteenveto suomeksi.",
        "sv" => "Om inmatningsspråket är svenska, sammanfatta på svenska.",
        "no" => "Hvis inndataspråket er norsk, oppsummer på norsk.",
        "da" => "Hvis inputsproget er dansk, opsummer på dansk.",
        "nl" => "Als de invoertaal Nederlands is, vat dan samen in het Nederlands.",
        "de" => "Wenn die Eingabesprache Deutsch ist, fassen Sie auf Deutsch zusammen.",
        "fr" => "Si la langue d'entrée est le français, résumez en français.",
        "es" => "Si el idioma de entrada es el español, resume en español.",
        "it" => "Se la lingua di input è l'italiano, riassumi in italiano.",
        _ => "If the input language is not English, summarize in English.",
    }
}

/// Builds the shared context for a language and optional link title.
///
/// A title containing `?` turns the context into a question-answering
/// instruction; such contexts are link-specific and must not be cached.
pub fn shared_context_for(lang: &str, link_title: Option<&str>) -> SharedContext {
    let prefix = steering_prefix(&normalize_lang(lang));
    match link_title {
        Some(title) if title.contains('?') => SharedContext {
            text: format!(
                "{} Answer the question briefly and concisely: {}",
                prefix,
                title.trim()
            ),
            cacheable: false,
        },
        _ => SharedContext {
            text: prefix.to_string(),
            cacheable: true,
        },
    }
}

/// Maps a detected language to the engine's supported output languages.
pub fn engine_output_language(lang: &str) -> &'static str {
    match normalize_lang(lang).as_str() {
        "es" => "es",
        "ja" => "ja",
        _ => "en",
    }
}

/// Caller-owned cache of one engine instance per language code.
///
/// Engine construction is expensive (model load), so callers keep one
/// instance alive per language for the session. The cache is an explicit
/// value rather than process state so tests inject a fresh one per case.
#[derive(Debug, Default)]
pub struct SummarizerCache<S> {
    by_lang: HashMap<String, Arc<S>>,
}

impl<S> SummarizerCache<S> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            by_lang: HashMap::new(),
        }
    }

    /// Returns the cached engine for `lang`, creating it when absent.
    pub fn get_or_create(&mut self, lang: &str, create: impl FnOnce() -> S) -> Arc<S> {
        let key = normalize_lang(lang);
        self.by_lang
            .entry(key)
            .or_insert_with(|| Arc::new(create()))
            .clone()
    }

    /// Returns an engine suited to `context`.
    ///
    /// Link-specific (non-cacheable) contexts get a fresh instance that is
    /// never stored, so a question steered toward one link cannot leak into
    /// later summaries for the same language.
    pub fn engine_for(
        &mut self,
        lang: &str,
        context: &SharedContext,
        create: impl FnOnce() -> S,
    ) -> Arc<S> {
        if context.cacheable {
            self.get_or_create(lang, create)
        } else {
            Arc::new(create())
        }
    }

    /// Number of cached engines.
    pub fn len(&self) -> usize {
        self.by_lang.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.by_lang.is_empty()
    }

    /// Drops all cached engines.
    pub fn clear(&mut self) {
        self.by_lang.clear();
    }
}

/// Built-in extractive engine: the leading sentence of each paragraph.
///
/// A stand-in for environments without a model-backed engine (tests, CLI).
/// Honors format and the headline kind; length and steering context are
/// beyond what an extractive engine can do.
#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    pub max_points: usize,
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self { max_points: 5 }
    }
}

/// First sentence of a paragraph, punctuation included.
fn leading_sentence(paragraph: &str) -> &str {
    let trimmed = paragraph.trim();
    match trimmed.find(|c| matches!(c, '.' | '!' | '?')) {
        Some(idx) => &trimmed[..=idx],
        None => trimmed,
    }
}

#[async_trait]
impl Summarizer for LeadSummarizer {
    async fn summarize(&self, text: &str, opts: &SummarizeOptions) -> Result<String, PeekError> {
        let points: Vec<&str> = text
            .split("\n\n")
            .map(leading_sentence)
            .filter(|s| !s.is_empty())
            .take(self.max_points)
            .collect();

        if points.is_empty() {
            return Err(PeekError::summarize(
                "",
                "Summarize",
                Some(anyhow::anyhow!("nothing to summarize")),
            ));
        }

        if opts.kind == SummaryKind::Headline {
            return Ok(points[0].to_string());
        }

        let summary = match opts.format {
            SummaryFormat::Markdown => points
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n"),
            SummaryFormat::PlainText => points.join("\n"),
        };
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shared_context_estonian() {
        let ctx = shared_context_for("et", None);
        assert!(ctx.text.starts_with("Kui sisendkeel on eesti keel"));
        assert!(ctx.cacheable);
    }

    #[test]
    fn test_shared_context_unknown_language_defaults_english() {
        let ctx = shared_context_for("xx", None);
        assert_eq!(
            ctx.text,
            "If the input language is not English, summarize in English."
        );
    }

    #[test]
    fn test_shared_context_question_title_not_cacheable() {
        let ctx = shared_context_for("en", Some("Is the water safe to drink?"));
        assert!(!ctx.cacheable);
        assert!(ctx.text.contains("Answer the question briefly and concisely:"));
        assert!(ctx.text.ends_with("Is the water safe to drink?"));
    }

    #[test]
    fn test_shared_context_plain_title_cacheable() {
        let ctx = shared_context_for("fi", Some("Daily news roundup"));
        assert!(ctx.cacheable);
        assert_eq!(ctx.text, steering_prefix("fi"));
    }

    #[test]
    fn test_shared_context_regional_subtag() {
        let ctx = shared_context_for("de-AT", None);
        assert_eq!(ctx.text, steering_prefix("de"));
    }

    #[test]
    fn test_engine_output_language() {
        assert_eq!(engine_output_language("es"), "es");
        assert_eq!(engine_output_language("ja-JP"), "ja");
        assert_eq!(engine_output_language("et"), "en");
        assert_eq!(engine_output_language(""), "en");
    }

    #[test]
    fn test_cache_reuses_instance_per_language() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let a = cache.get_or_create("et", LeadSummarizer::default);
        let b = cache.get_or_create("et", LeadSummarizer::default);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_separate_instances_per_language() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let a = cache.get_or_create("et", LeadSummarizer::default);
        let b = cache.get_or_create("fi", LeadSummarizer::default);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_normalizes_language_keys() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let a = cache.get_or_create("en-US", LeadSummarizer::default);
        let b = cache.get_or_create("en", LeadSummarizer::default);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_engine_for_reuses_cacheable_contexts() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let ctx = shared_context_for("et", Some("Daily news roundup"));
        let a = cache.engine_for("et", &ctx, LeadSummarizer::default);
        let b = cache.engine_for("et", &ctx, LeadSummarizer::default);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_engine_for_question_context_bypasses_cache() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let cached = cache.get_or_create("en", LeadSummarizer::default);

        let ctx = shared_context_for("en", Some("Is the water safe to drink?"));
        let fresh = cache.engine_for("en", &ctx, LeadSummarizer::default);

        assert!(!Arc::ptr_eq(&cached, &fresh));
        // The one-off instance must not displace or join the cached one.
        assert_eq!(cache.len(), 1);
        let again = cache.get_or_create("en", LeadSummarizer::default);
        assert!(Arc::ptr_eq(&cached, &again));
    }

    #[test]
    fn test_cache_clear() {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        cache.get_or_create("en", LeadSummarizer::default);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_lead_summarizer_markdown_bullets() {
        let engine = LeadSummarizer::default();
        let text = "First point. More detail here.\n\nSecond point! Extra.\n\nThird.";
        let summary = engine
            .summarize(text, &SummarizeOptions::default())
            .await
            .unwrap();
        assert_eq!(summary, "- First point.\n- Second point!\n- Third.");
    }

    #[tokio::test]
    async fn test_lead_summarizer_plain_text() {
        let engine = LeadSummarizer::default();
        let opts = SummarizeOptions {
            format: SummaryFormat::PlainText,
            ..Default::default()
        };
        let summary = engine.summarize("Alpha. Beta.\n\nGamma.", &opts).await.unwrap();
        assert_eq!(summary, "Alpha.\nGamma.");
    }

    #[tokio::test]
    async fn test_lead_summarizer_headline_kind() {
        let engine = LeadSummarizer::default();
        let opts = SummarizeOptions {
            kind: SummaryKind::Headline,
            ..Default::default()
        };
        let summary = engine
            .summarize("Big news today. Details follow.\n\nMore.", &opts)
            .await
            .unwrap();
        assert_eq!(summary, "Big news today.");
    }

    #[tokio::test]
    async fn test_lead_summarizer_respects_max_points() {
        let engine = LeadSummarizer { max_points: 2 };
        let summary = engine
            .summarize("A.\n\nB.\n\nC.\n\nD.", &SummarizeOptions::default())
            .await
            .unwrap();
        assert_eq!(summary, "- A.\n- B.");
    }

    #[tokio::test]
    async fn test_lead_summarizer_empty_input_errors() {
        let engine = LeadSummarizer::default();
        let err = engine
            .summarize("", &SummarizeOptions::default())
            .await
            .expect_err("empty input should fail");
        assert!(err.is_summarize());
    }

    #[test]
    fn test_options_serde_wire_names() {
        let opts = SummarizeOptions {
            kind: SummaryKind::Tldr,
            format: SummaryFormat::PlainText,
            length: SummaryLength::Short,
            shared_context: "ctx".to_string(),
            output_language: "en".to_string(),
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["type"], "tl;dr");
        assert_eq!(json["format"], "plain-text");
        assert_eq!(json["length"], "short");
    }
}
