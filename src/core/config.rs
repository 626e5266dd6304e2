use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use crate::analysis::language::Language;
use crate::core::error::{Error, Result};
use crate::index::IndexType;
use crate::index::filter::NameFilter;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: PathBuf,
    pub options: IndexOptions,
}

impl Config {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Config {
            storage_path: storage_path.into(),
            options: IndexOptions::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./data"),
            options: IndexOptions::default(),
        }
    }
}

/// Where full-text stop words come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopWords {
    None,
    /// Built-in list of the configured language
    Default,
    /// Whitespace-separated word list on disk
    File(PathBuf),
}

impl StopWords {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "none" => StopWords::None,
            "default" => StopWords::Default,
            path => StopWords::File(PathBuf::from(path)),
        }
    }
}

/// Linguistic configuration of the full-text index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTextOptions {
    pub stemming: bool,
    pub case_sensitive: bool,
    pub diacritics_sensitive: bool,
    pub language: Language,
    pub stop_words: StopWords,
}

impl Default for FullTextOptions {
    fn default() -> Self {
        FullTextOptions {
            stemming: false,
            case_sensitive: false,
            diacritics_sensitive: false,
            language: Language::English,
            stop_words: StopWords::None,
        }
    }
}

/// Name filters restricting which records an index covers.
/// Comma-separated names, `*` wildcards allowed, empty = everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexIncludes {
    pub text: String,
    pub attribute: String,
    pub token: String,
    pub fulltext: String,
}

impl IndexIncludes {
    pub fn get(&self, index_type: IndexType) -> &str {
        match index_type {
            IndexType::Text => &self.text,
            IndexType::Attribute => &self.attribute,
            IndexType::Token => &self.token,
            IndexType::FullText => &self.fulltext,
            _ => "",
        }
    }

    pub fn set(&mut self, index_type: IndexType, names: &str) {
        let slot = match index_type {
            IndexType::Text => &mut self.text,
            IndexType::Attribute => &mut self.attribute,
            IndexType::Token => &mut self.token,
            IndexType::FullText => &mut self.fulltext,
            _ => return,
        };
        *slot = names.to_string();
    }
}

/// Indexing options consumed by create-index and optimize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    pub fulltext: FullTextOptions,
    pub split_size: u32,
    pub path_index: bool,
    pub text_index: bool,
    pub attribute_index: bool,
    pub token_index: bool,
    pub fulltext_index: bool,
    pub includes: IndexIncludes,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            fulltext: FullTextOptions::default(),
            split_size: 0,           // single run
            path_index: true,
            text_index: false,
            attribute_index: false,
            token_index: false,
            fulltext_index: false,
            includes: IndexIncludes::default(),
        }
    }
}

impl IndexOptions {
    /// Sets an option by its external name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "stemming" => self.fulltext.stemming = parse_bool(name, value)?,
            "case-sensitive" => self.fulltext.case_sensitive = parse_bool(name, value)?,
            "diacritics-sensitive" => self.fulltext.diacritics_sensitive = parse_bool(name, value)?,
            "language" => self.fulltext.language = Language::from_tag(value)?,
            "stop-words" => self.fulltext.stop_words = StopWords::parse(value),
            "split-size" => {
                self.split_size = value.trim().parse().map_err(|_| {
                    Error::invalid(format!("Option '{}' expects a number, found '{}'", name, value))
                })?
            }
            "path-index-enabled" => self.path_index = parse_bool(name, value)?,
            "text-index-enabled" => self.text_index = parse_bool(name, value)?,
            "attribute-index-enabled" => self.attribute_index = parse_bool(name, value)?,
            "token-index-enabled" => self.token_index = parse_bool(name, value)?,
            "fulltext-index-enabled" => self.fulltext_index = parse_bool(name, value)?,
            "text-include" => self.includes.text = value.to_string(),
            "attr-include" => self.includes.attribute = value.to_string(),
            "token-include" => self.includes.token = value.to_string(),
            "ft-include" => self.includes.fulltext = value.to_string(),
            _ => return Err(Error::invalid(format!("Unknown option '{}'", name))),
        }
        Ok(())
    }

    /// Whether the global configuration requests an index type
    pub fn enabled(&self, index_type: IndexType) -> bool {
        match index_type {
            IndexType::Text => self.text_index,
            IndexType::Attribute => self.attribute_index,
            IndexType::Token => self.token_index,
            IndexType::FullText => self.fulltext_index,
            IndexType::Path => self.path_index,
            IndexType::Tag | IndexType::AttributeName => true,
        }
    }

    /// Checks the option bundle for an index build without touching any state.
    pub fn validate(&self, index_type: IndexType) -> Result<()> {
        NameFilter::parse(self.includes.get(index_type))?;
        if index_type == IndexType::FullText {
            if let StopWords::File(path) = &self.fulltext.stop_words {
                if !path.is_file() {
                    return Err(Error::invalid(format!(
                        "Stop word list '{}' not found",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(Error::invalid(format!(
            "Option '{}' expects a boolean, found '{}'",
            name, value
        ))),
    }
}
