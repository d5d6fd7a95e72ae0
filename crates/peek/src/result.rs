// ABOUTME: PeekResult and Summary structs holding the outcome of a peek pipeline run.
// ABOUTME: Absent content is a populated result with no extraction, not an error.

use serde::{Deserialize, Serialize};

use crate::extract::Extraction;

/// The result of peeking a page: detected language plus the extraction, if any.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PeekResult {
    /// The URL the peek was requested for.
    pub url: String,
    /// The URL the page was actually served from (after redirects).
    pub final_url: String,
    /// Normalized hostname; empty when the URL had none.
    pub hostname: String,
    /// Detected language code; possibly empty.
    pub language: String,
    /// The extracted article text and its provenance; `None` when no
    /// selector produced usable text.
    pub extraction: Option<Extraction>,
    /// Word count of the extracted text; 0 when absent.
    pub word_count: i32,
}

impl PeekResult {
    /// Returns true if usable article text was found.
    pub fn has_content(&self) -> bool {
        self.extraction.as_ref().map_or(false, |e| !e.text.is_empty())
    }

    /// The extracted text, if any.
    pub fn text(&self) -> Option<&str> {
        self.extraction.as_ref().map(|e| e.text.as_str())
    }
}

/// An end-to-end pipeline outcome: the engine's summary plus its source peek.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Summary {
    pub summary: String,
    pub source: PeekResult,
}

/// Count words in a text string using whitespace splitting.
pub fn word_count(text: &str) -> i32 {
    text.split_whitespace().count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{SelectorTier, Strategy};

    fn extraction(text: &str) -> Extraction {
        Extraction {
            text: text.to_string(),
            tier: SelectorTier::Generic,
            strategy: Strategy::Paragraphs,
            selector: "body".to_string(),
        }
    }

    #[test]
    fn test_has_content() {
        let mut result = PeekResult::default();
        assert!(!result.has_content());
        assert!(result.text().is_none());

        result.extraction = Some(extraction(""));
        assert!(!result.has_content());

        result.extraction = Some(extraction("some text"));
        assert!(result.has_content());
        assert_eq!(result.text(), Some("some text"));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one two  three\n\nfour"), 4);
    }

    #[test]
    fn test_serialize_absent_extraction() {
        let result = PeekResult {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["extraction"].is_null());
    }
}
