//! Location URL parsing and language variants.
//!
//! yr.no publishes the same place under three path prefixes, one per
//! language: `/sted/` (Bokmål), `/stad/` (Nynorsk) and `/place/` (English).
//! A [`LocationSpec`] keeps the language-independent part of the path so the
//! feed URL can be rebuilt for any of them.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, YrError};

/// Accepted input shapes:
///   http://www.yr.no/place/Norway/Østfold/Halden/Halden/varsel.xml
///   /place/Norway/Østfold/Halden/Halden/
///   http://www.yr.no/sted/Norway/Østfold/Halden/Halden
static LOCATION_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?://(?:www\.)?yr\.no)?/(place|sted|stad)(/[\p{L}\p{N}_~/-]*?)(?:varsel\.xml)?$",
    )
    .unwrap_or_else(|e| unreachable!("location pattern is a valid regex: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Norwegian Bokmål.
    #[default]
    Nb,
    /// Norwegian Nynorsk.
    Nn,
    /// English.
    En,
}

impl Language {
    /// ISO 639-1 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Nb => "nb",
            Language::Nn => "nn",
            Language::En => "en",
        }
    }

    /// Path segment yr.no uses for this language.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Language::Nb => "sted",
            Language::Nn => "stad",
            Language::En => "place",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::Nb, Language::Nn, Language::En]
    }

    fn from_path_segment(segment: &str) -> Option<Self> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.path_segment().eq_ignore_ascii_case(segment))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = YrError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "nb" => Ok(Language::Nb),
            "nn" => Ok(Language::Nn),
            "en" => Ok(Language::En),
            _ => Err(YrError::UnsupportedLanguage(value.to_string())),
        }
    }
}

/// A validated yr.no location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSpec {
    raw_url: String,
    language: Language,
    path_fragment: String,
}

impl LocationSpec {
    /// Parse a yr.no place URL or site-relative path.
    pub fn resolve(raw_url: &str) -> Result<Self> {
        let invalid = |reason| YrError::InvalidUrl {
            url: raw_url.to_string(),
            reason,
        };

        let caps = LOCATION_URL
            .captures(raw_url.trim())
            .ok_or_else(|| invalid("expected [http://www.yr.no]/{place|sted|stad}/<location>[/varsel.xml]"))?;

        let language = Language::from_path_segment(&caps[1])
            .ok_or_else(|| invalid("unknown language segment"))?;

        let path = caps[2].trim_matches('/');
        if path.is_empty() {
            return Err(invalid("location path is empty"));
        }
        if path.split('/').any(str::is_empty) {
            return Err(invalid("location path contains an empty segment"));
        }

        Ok(Self {
            raw_url: raw_url.to_string(),
            language,
            path_fragment: format!("{path}/"),
        })
    }

    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// Language implied by the URL's path prefix.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Location path without language prefix or document suffix, always
    /// ending in exactly one `/`, e.g. `Norge/Østfold/Halden/Halden/`.
    pub fn path_fragment(&self) -> &str {
        &self.path_fragment
    }

    /// Address of a document under this location for `language`.
    pub fn document_url(&self, base_url: &str, language: Language, document: &str) -> String {
        format!(
            "{}/{}/{}{}",
            base_url.trim_end_matches('/'),
            language.path_segment(),
            self.path_fragment,
            document
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_language_prefixes_resolve_to_same_fragment() {
        let cases = [
            ("http://www.yr.no/sted/Norge/Østfold/Halden/Halden/", Language::Nb),
            ("http://www.yr.no/stad/Norge/Østfold/Halden/Halden/", Language::Nn),
            ("http://www.yr.no/place/Norge/Østfold/Halden/Halden/", Language::En),
        ];

        for (url, lang) in cases {
            let spec = LocationSpec::resolve(url).expect("valid url");
            assert_eq!(spec.language(), lang, "{url}");
            assert_eq!(spec.path_fragment(), "Norge/Østfold/Halden/Halden/", "{url}");
        }
    }

    #[test]
    fn accepts_relative_path_and_varsel_suffix() {
        let spec = LocationSpec::resolve("/place/Norway/Østfold/Halden/Halden/varsel.xml").unwrap();
        assert_eq!(spec.language(), Language::En);
        assert_eq!(spec.path_fragment(), "Norway/Østfold/Halden/Halden/");
    }

    #[test]
    fn appends_missing_trailing_separator() {
        let spec = LocationSpec::resolve("http://www.yr.no/sted/Norway/Østfold/Halden/Halden").unwrap();
        assert_eq!(spec.path_fragment(), "Norway/Østfold/Halden/Halden/");
    }

    #[test]
    fn collapses_repeated_trailing_separators() {
        let spec = LocationSpec::resolve("/sted/Norge/Oslo/Oslo/Oslo//").unwrap();
        assert_eq!(spec.path_fragment(), "Norge/Oslo/Oslo/Oslo/");
    }

    #[test]
    fn host_and_segment_are_case_insensitive() {
        let spec = LocationSpec::resolve("HTTP://YR.NO/Sted/Norge/Oslo/Oslo/Oslo").unwrap();
        assert_eq!(spec.language(), Language::Nb);
        assert_eq!(spec.path_fragment(), "Norge/Oslo/Oslo/Oslo/");
    }

    #[test]
    fn rejects_invalid_inputs() {
        let invalid = [
            "",
            "http://www.yr.no/Norge/Oslo/Oslo/Oslo/",
            "/sted/",
            "/sted",
            "/stedNorge/Oslo",
            "/sted/varsel.xml",
            "http://example.com/sted/Norge/Oslo/",
            "/sted/Norge/Oslo?foo=bar",
            "/sted/Norge//Oslo/",
            "/weather/Norge/Oslo/",
        ];

        for url in invalid {
            let err = LocationSpec::resolve(url).unwrap_err();
            assert!(matches!(err, YrError::InvalidUrl { .. }), "{url}: {err}");
        }
    }

    #[test]
    fn document_url_uses_requested_language() {
        let spec = LocationSpec::resolve("/place/Norge/Oslo/Oslo/Oslo").unwrap();
        assert_eq!(
            spec.document_url("http://www.yr.no", Language::Nn, "varsel.xml"),
            "http://www.yr.no/stad/Norge/Oslo/Oslo/Oslo/varsel.xml"
        );
        assert_eq!(
            spec.document_url("http://mirror.local/", Language::Nb, "varsel.pdf"),
            "http://mirror.local/sted/Norge/Oslo/Oslo/Oslo/varsel.pdf"
        );
    }

    #[test]
    fn language_as_str_roundtrip() {
        for lang in Language::all() {
            let parsed: Language = lang.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*lang, parsed);
        }
    }

    #[test]
    fn unknown_language_error() {
        let err = "de".parse::<Language>().unwrap_err();
        assert!(matches!(err, YrError::UnsupportedLanguage(ref l) if l == "de"));
    }
}
