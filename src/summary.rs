//! Transcript summarization.
//!
//! The pipeline treats summarization as an opaque collaborator behind the
//! [`Summarizer`] trait. [`ExtractiveSummarizer`] is the built-in
//! deterministic implementation; a model-backed service can slot in behind
//! the same trait.

use crate::error::{Result, ScribaError};
use crate::language::Language;
use async_trait::async_trait;

/// Produces a meeting summary from transcript text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str, language: Language) -> Result<String>;
}

/// Text stored in place of a summary when summarization fails outright.
pub fn placeholder(language: Language) -> &'static str {
    match language {
        Language::Italian => "Riassunto non disponibile.",
        Language::English => "Summary not available.",
    }
}

/// Sentence-extraction summarizer.
///
/// Keeps the whole transcript up to five sentences, otherwise the first
/// three and the last two, under a language-appropriate heading.
#[derive(Debug, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, transcript: &str, language: Language) -> Result<String> {
        let sentences: Vec<&str> = transcript.split(". ").collect();
        let kept: Vec<&str> = if sentences.len() <= 5 {
            sentences
        } else {
            let mut kept = sentences[..3].to_vec();
            kept.extend_from_slice(&sentences[sentences.len() - 2..]);
            kept
        };

        let heading = match language {
            Language::Italian => "Riassunto automatico della riunione:\n\n",
            Language::English => "Automatic meeting summary:\n\n",
        };
        Ok(format!("{heading}{}", kept.join(". ")))
    }
}

/// Test double returning a canned summary or failing every call.
pub struct MockSummarizer {
    reply: Option<String>,
}

impl MockSummarizer {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _transcript: &str, _language: Language) -> Result<String> {
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ScribaError::Other("summarizer offline".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_transcript_is_kept_whole() {
        let text = "We met. We talked. We decided";

        let summary = ExtractiveSummarizer::new()
            .summarize(text, Language::English)
            .await
            .unwrap();

        assert_eq!(
            summary,
            "Automatic meeting summary:\n\nWe met. We talked. We decided"
        );
    }

    #[tokio::test]
    async fn test_long_transcript_keeps_first_three_and_last_two() {
        let text = "One. Two. Three. Four. Five. Six. Seven";

        let summary = ExtractiveSummarizer::new()
            .summarize(text, Language::English)
            .await
            .unwrap();

        assert_eq!(
            summary,
            "Automatic meeting summary:\n\nOne. Two. Three. Six. Seven"
        );
    }

    #[tokio::test]
    async fn test_exactly_five_sentences_are_kept_whole() {
        let text = "One. Two. Three. Four. Five";

        let summary = ExtractiveSummarizer::new()
            .summarize(text, Language::English)
            .await
            .unwrap();

        assert_eq!(summary, "Automatic meeting summary:\n\nOne. Two. Three. Four. Five");
    }

    #[tokio::test]
    async fn test_italian_heading() {
        let summary = ExtractiveSummarizer::new()
            .summarize("Ci siamo incontrati", Language::Italian)
            .await
            .unwrap();

        assert_eq!(
            summary,
            "Riassunto automatico della riunione:\n\nCi siamo incontrati"
        );
    }

    #[tokio::test]
    async fn test_empty_transcript_is_heading_only() {
        let summary = ExtractiveSummarizer::new()
            .summarize("", Language::English)
            .await
            .unwrap();

        assert_eq!(summary, "Automatic meeting summary:\n\n");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholder(Language::English), "Summary not available.");
        assert_eq!(placeholder(Language::Italian), "Riassunto non disponibile.");
    }

    #[tokio::test]
    async fn test_mock_replies_and_fails() {
        let ok = MockSummarizer::replying("canned")
            .summarize("anything", Language::English)
            .await;
        assert_eq!(ok.unwrap(), "canned");

        let err = MockSummarizer::failing()
            .summarize("anything", Language::English)
            .await;
        assert!(err.is_err());
    }
}
