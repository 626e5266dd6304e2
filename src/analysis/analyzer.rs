use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::normalize::{DiacriticsFilter, LowercaseFilter};
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::config::{FullTextOptions, StopWords};
use crate::core::error::Result;

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Pipeline for the full-text index. Case and diacritics are normalized
    /// before stop words are removed; stemming comes last.
    pub fn for_fulltext(options: &FullTextOptions) -> Result<Self> {
        let lowercase = !options.case_sensitive;
        let strip = !options.diacritics_sensitive;

        let mut analyzer = Analyzer::new(Box::new(StandardTokenizer::default()));
        if lowercase {
            analyzer = analyzer.add_filter(Box::new(LowercaseFilter));
        }
        if strip {
            analyzer = analyzer.add_filter(Box::new(DiacriticsFilter));
        }

        let stop_words = match &options.stop_words {
            StopWords::None => None,
            StopWords::Default => Some(StopWordFilter::for_language(options.language)),
            StopWords::File(path) => Some(StopWordFilter::from_file(path)?),
        };
        if let Some(filter) = stop_words {
            analyzer = analyzer.add_filter(Box::new(filter.normalized(lowercase, strip)));
        }

        if options.stemming {
            analyzer = analyzer.add_filter(Box::new(StemmerFilter::new(options.language.stemmer())));
        }
        Ok(analyzer)
    }

    /// `tokenizer>filter>…` for log output
    pub fn describe(&self) -> String {
        std::iter::once(self.tokenizer.name())
            .chain(self.filters.iter().map(|f| f.name()))
            .collect::<Vec<_>>()
            .join(">")
    }
}
