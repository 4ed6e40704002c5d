//! Display languages supported by the rate board and calculator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned for an unsupported language tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: '{0}'")]
pub struct UnknownLanguage(pub String);

/// Language used for user-facing text such as calculation breakdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    /// Arabic
    #[default]
    Ar,
    /// Hebrew
    He,
    /// English
    En,
}

impl Language {
    /// Returns the two-letter language tag.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::He => "he",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" => Ok(Self::Ar),
            "he" => Ok(Self::He),
            "en" => Ok(Self::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = UnknownLanguage;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_is_arabic() {
        assert_eq!(Language::default(), Language::Ar);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str("ar").unwrap(), Language::Ar);
        assert_eq!(Language::from_str("HE").unwrap(), Language::He);
        assert_eq!(Language::from_str("en").unwrap(), Language::En);
        assert!(Language::from_str("fr").is_err());
        assert!(Language::from_str("").is_err());
    }

    #[test]
    fn test_serde_accepts_any_case() {
        let lang: Language = serde_json::from_str("\"HE\"").unwrap();
        assert_eq!(lang, Language::He);
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        assert!(serde_json::from_str::<Language>("\"fr\"").is_err());
    }

    #[test]
    fn test_language_display() {
        assert_eq!(Language::Ar.to_string(), "ar");
        assert_eq!(Language::He.to_string(), "he");
        assert_eq!(Language::En.to_string(), "en");
    }
}
