use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Client UI language, stored with each booking so the admin knows which
/// language to answer in. Never consulted by the booking logic itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
pub enum SupportedLanguage {
    #[serde(rename = "ru")]
    #[sqlx(rename = "ru")]
    Russian,
    #[serde(rename = "ro")]
    #[sqlx(rename = "ro")]
    Romanian,
    #[serde(rename = "en")]
    #[sqlx(rename = "en")]
    English,
}

impl SupportedLanguage {
    pub fn all() -> &'static [SupportedLanguage] {
        &[
            SupportedLanguage::Russian,
            SupportedLanguage::Romanian,
            SupportedLanguage::English,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            SupportedLanguage::Russian => "ru",
            SupportedLanguage::Romanian => "ro",
            SupportedLanguage::English => "en",
        }
    }

    /// Human-readable name, used in the admin notification text.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Russian => "Русский",
            SupportedLanguage::Romanian => "Română",
            SupportedLanguage::English => "English",
        }
    }
}

impl Default for SupportedLanguage {
    fn default() -> Self {
        SupportedLanguage::Russian
    }
}

impl Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SupportedLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" => Ok(SupportedLanguage::Russian),
            "ro" | "romanian" => Ok(SupportedLanguage::Romanian),
            "en" | "english" | "en-us" => Ok(SupportedLanguage::English),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes() {
        assert_eq!(
            "ru".parse::<SupportedLanguage>().unwrap(),
            SupportedLanguage::Russian
        );
        assert_eq!(
            "RO".parse::<SupportedLanguage>().unwrap(),
            SupportedLanguage::Romanian
        );
        assert_eq!(
            "en".parse::<SupportedLanguage>().unwrap(),
            SupportedLanguage::English
        );
        assert!("de".parse::<SupportedLanguage>().is_err());
    }

    #[test]
    fn default_is_russian() {
        assert_eq!(SupportedLanguage::default(), SupportedLanguage::Russian);
    }

    #[test]
    fn all_lists_every_language() {
        assert_eq!(SupportedLanguage::all().len(), 3);
    }
}
