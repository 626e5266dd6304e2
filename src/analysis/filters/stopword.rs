use std::collections::HashSet;
use std::fs;
use std::path::Path;
use crate::analysis::filter::TokenFilter;
use crate::analysis::language::Language;
use crate::analysis::token::Token;
use crate::core::error::Result;

pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: impl IntoIterator<Item = String>) -> Self {
        StopWordFilter {
            stop_words: stop_words.into_iter().collect(),
        }
    }

    pub fn for_language(language: Language) -> Self {
        StopWordFilter::new(language.stop_words().iter().map(|w| w.to_string()))
    }

    /// Whitespace-separated list; lines starting with `#` are comments
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let words = content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .flat_map(str::split_whitespace)
            .map(String::from);
        Ok(StopWordFilter::new(words))
    }

    /// Applies the same normalization the analyzed tokens receive
    pub fn normalized(self, lowercase: bool, strip: bool) -> Self {
        let words = self.stop_words.into_iter().map(|mut w| {
            if lowercase {
                w = w.to_lowercase();
            }
            if strip {
                w = super::normalize::strip_diacritics(&w);
            }
            w
        });
        StopWordFilter::new(words)
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .filter(|token| !self.stop_words.contains(&token.text))
            .collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }
}
