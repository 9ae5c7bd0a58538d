use std::fmt;

use serde::{Deserialize, Serialize};

/// Locale codes whose display names are kept during enrichment.
pub const SUPPORTED_LOCALES: &[&str] = &[
    "en", "fr", "de", "es", "it", "ja", "ko", "zh-Hans", "zh-Hant",
];

/// An opaque display-locale code.
///
/// The core never validates it beyond accepting a string: an unknown code
/// simply resolves every name to its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_LOCALES.contains(&self.0.as_str())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Locale {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_are_accepted_but_not_supported() {
        assert!(Locale::default().is_supported());
        assert!(Locale::new("zh-Hant").is_supported());
        let klingon = Locale::new("tlh");
        assert!(!klingon.is_supported());
        assert_eq!(klingon.as_str(), "tlh");
    }
}
