use rust_stemmers::Algorithm;
use serde::{Serialize, Deserialize};
use std::fmt;
use crate::core::error::{Error, Result};

/// Languages with linguistic support for the full-text index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
    French,
    Spanish,
    Italian,
    Dutch,
    Portuguese,
    Swedish,
    Norwegian,
    Danish,
    Finnish,
    Russian,
}

impl Language {
    const ALL: [Language; 12] = [
        Language::English, Language::German, Language::French, Language::Spanish,
        Language::Italian, Language::Dutch, Language::Portuguese, Language::Swedish,
        Language::Norwegian, Language::Danish, Language::Finnish, Language::Russian,
    ];

    /// Resolves an ISO 639-1 tag; region subtags (`en-US`) are ignored.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag() == primary)
            .ok_or_else(|| Error::invalid(format!("Language '{}' not supported", tag)))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Swedish => "sv",
            Language::Norwegian => "no",
            Language::Danish => "da",
            Language::Finnish => "fi",
            Language::Russian => "ru",
        }
    }

    pub fn stemmer(&self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::German => Algorithm::German,
            Language::French => Algorithm::French,
            Language::Spanish => Algorithm::Spanish,
            Language::Italian => Algorithm::Italian,
            Language::Dutch => Algorithm::Dutch,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Swedish => Algorithm::Swedish,
            Language::Norwegian => Algorithm::Norwegian,
            Language::Danish => Algorithm::Danish,
            Language::Finnish => Algorithm::Finnish,
            Language::Russian => Algorithm::Russian,
        }
    }

    /// Built-in stop words; empty for languages without a bundled list.
    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "a", "an", "and", "are", "as", "at", "be", "by", "for",
                "from", "has", "he", "in", "is", "it", "its", "of", "on",
                "that", "the", "to", "was", "will", "with",
            ],
            Language::German => &[
                "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "das", "dass",
                "der", "die", "ein", "eine", "einer", "es", "für", "im", "in", "ist",
                "mit", "nicht", "und", "von", "zu",
            ],
            Language::French => &[
                "au", "aux", "de", "des", "du", "en", "et", "il", "la", "le",
                "les", "mais", "ou", "par", "pour", "que", "qui", "un", "une",
            ],
            _ => &[],
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}
