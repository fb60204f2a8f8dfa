//! Supported transcription languages.

use crate::error::ScribaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the transcription and summarization services support.
///
/// The set is deliberately closed: callers submit a two-letter code and
/// anything outside it is rejected before any audio is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// The two-letter code sent to remote services.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Italian => "it",
            Language::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = ScribaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "it" => Ok(Language::Italian),
            "en" => Ok(Language::English),
            other => Err(ScribaError::UnsupportedLanguage {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_codes() {
        assert_eq!("it".parse::<Language>().unwrap(), Language::Italian);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let err = "de".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language code: de");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("IT".parse::<Language>().is_err());
        assert!("En".parse::<Language>().is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Language::Italian.to_string(), "it");
        assert_eq!(Language::English.to_string(), "en");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Language::Italian).unwrap();
        assert_eq!(json, "\"it\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::Italian);
    }
}
