pub mod builder;
pub mod filter;
pub mod fulltext;
pub mod names;
pub mod path;
pub mod posting;
pub mod value;

use std::fmt;
use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use tracing::warn;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Pre;
use crate::storage::blocks;
use crate::storage::layout::StorageLayout;
use crate::storage::meta::MetaData;
use self::fulltext::{FullTextFile, FullTextIndex};
use self::names::NameIndex;
use self::path::PathIndex;
use self::value::ValueIndex;

/// Index family of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    /// Element names, with the texts they own
    Tag,
    /// Attribute names, with their values
    AttributeName,
    /// (name, kind, level) structure counts
    Path,
    Text,
    Attribute,
    Token,
    FullText,
}

impl IndexType {
    /// Types built on request and rebuilt selectively by optimize
    pub const SELECTIVE: [IndexType; 4] = [
        IndexType::Text,
        IndexType::Attribute,
        IndexType::Token,
        IndexType::FullText,
    ];

    /// Resolves a user-facing index name; only selectively built types are accepted.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(IndexType::Text),
            "attribute" | "attr" => Ok(IndexType::Attribute),
            "token" => Ok(IndexType::Token),
            "fulltext" | "full-text" => Ok(IndexType::FullText),
            _ => Err(Error::invalid(format!("Unrecognized index kind: '{}'", name))),
        }
    }

    pub fn is_selective(&self) -> bool {
        Self::SELECTIVE.contains(self)
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            IndexType::Tag => "tags",
            IndexType::AttributeName => "attrnames",
            IndexType::Path => "paths",
            IndexType::Text => "text",
            IndexType::Attribute => "attribute",
            IndexType::Token => "token",
            IndexType::FullText => "fulltext",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.file_stem().to_uppercase())
    }
}

/// Shared contract of every index structure
pub trait Index {
    type Key: ?Sized;

    fn index_type(&self) -> IndexType;

    /// Resets to empty; safe on an index that was never built
    fn init(&mut self);

    /// Registers an occurrence of `key` in record `pre`. `distinct` controls
    /// whether repeated occurrences within one record are collapsed.
    fn add(&mut self, pre: Pre, key: &Self::Key, value: Option<&[u8]>, distinct: bool);

    /// Number of distinct keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A freshly built selective index, ready to be installed
pub enum Built {
    Values(ValueIndex),
    FullText(FullTextIndex),
}

/// All index structures owned by a store
pub struct Indexes {
    pub tags: NameIndex,
    pub attribute_names: NameIndex,
    pub paths: PathIndex,
    pub text: Option<ValueIndex>,
    pub attributes: Option<ValueIndex>,
    pub tokens: Option<ValueIndex>,
    pub fulltext: Option<FullTextIndex>,
}

impl Indexes {
    pub fn new() -> Self {
        Indexes {
            tags: NameIndex::new(IndexType::Tag),
            attribute_names: NameIndex::new(IndexType::AttributeName),
            paths: PathIndex::new(),
            text: None,
            attributes: None,
            tokens: None,
            fulltext: None,
        }
    }

    /// Loads the persisted indexes. A selective index flagged present whose
    /// file is missing or unreadable is treated as absent and its flag cleared.
    /// An unreadable statistics index starts empty and marks the store stale
    /// until the next optimize.
    pub fn load(storage: &StorageLayout, meta: &mut MetaData) -> Result<Self> {
        let mut indexes = Indexes::new();
        if let Some(tags) = Self::load_statistics(storage, IndexType::Tag, meta) {
            indexes.tags = tags;
        }
        if let Some(names) = Self::load_statistics(storage, IndexType::AttributeName, meta) {
            indexes.attribute_names = names;
        }
        if let Some(paths) = Self::load_statistics(storage, IndexType::Path, meta) {
            indexes.paths = paths;
        }

        for index_type in IndexType::SELECTIVE {
            if !meta.is_indexed(index_type) {
                continue;
            }
            match Self::load_selective(storage, index_type) {
                Ok(Some(built)) => indexes.install(built),
                Ok(None) => {
                    warn!(index = %index_type, "index flagged present but missing, treating as absent");
                    meta.set_indexed(index_type, false);
                }
                Err(e) => {
                    warn!(index = %index_type, error = %e, "index unreadable, treating as absent");
                    meta.set_indexed(index_type, false);
                }
            }
        }
        Ok(indexes)
    }

    fn load_statistics<T: DeserializeOwned>(
        storage: &StorageLayout,
        index_type: IndexType,
        meta: &mut MetaData,
    ) -> Option<T> {
        let problem = match blocks::read_block(&storage.index_path(index_type)) {
            Ok(Some(index)) => return Some(index),
            Ok(None) => "missing".to_string(),
            Err(e) => e.to_string(),
        };
        warn!(index = %index_type, error = %problem, "statistics unreadable, store needs optimize");
        meta.uptodate = false;
        meta.dirty = true;
        None
    }

    fn load_selective(storage: &StorageLayout, index_type: IndexType) -> Result<Option<Built>> {
        let path = storage.index_path(index_type);
        Ok(match index_type {
            IndexType::FullText => match blocks::read_block::<FullTextFile>(&path)? {
                Some(file) => Some(Built::FullText(FullTextIndex::from_file(file)?)),
                None => None,
            },
            _ => blocks::read_block::<ValueIndex>(&path)?.map(Built::Values),
        })
    }

    pub fn install(&mut self, built: Built) {
        match built {
            Built::FullText(index) => self.fulltext = Some(index),
            Built::Values(index) => match index.index_type() {
                IndexType::Text => self.text = Some(index),
                IndexType::Attribute => self.attributes = Some(index),
                IndexType::Token => self.tokens = Some(index),
                _ => {}
            },
        }
    }

    pub fn is_loaded(&self, index_type: IndexType) -> bool {
        match index_type {
            IndexType::Text => self.text.is_some(),
            IndexType::Attribute => self.attributes.is_some(),
            IndexType::Token => self.tokens.is_some(),
            IndexType::FullText => self.fulltext.is_some(),
            IndexType::Tag | IndexType::AttributeName | IndexType::Path => true,
        }
    }

    pub fn values(&self, index_type: IndexType) -> Option<&ValueIndex> {
        match index_type {
            IndexType::Text => self.text.as_ref(),
            IndexType::Attribute => self.attributes.as_ref(),
            IndexType::Token => self.tokens.as_ref(),
            _ => None,
        }
    }

    /// Forgets the in-memory state of a selective index, leaving files alone
    pub fn discard(&mut self, index_type: IndexType) {
        match index_type {
            IndexType::Text => self.text = None,
            IndexType::Attribute => self.attributes = None,
            IndexType::Token => self.tokens = None,
            IndexType::FullText => self.fulltext = None,
            _ => {}
        }
    }

    /// Releases the in-memory and on-disk state of a selective index.
    /// Returns whether anything existed; dropping an absent index is a no-op.
    pub fn remove(&mut self, index_type: IndexType, storage: &StorageLayout) -> Result<bool> {
        let loaded = match index_type {
            IndexType::Text => self.text.take().is_some(),
            IndexType::Attribute => self.attributes.take().is_some(),
            IndexType::Token => self.tokens.take().is_some(),
            IndexType::FullText => self.fulltext.take().is_some(),
            _ => {
                return Err(Error::new(
                    ErrorKind::UnsupportedIndex,
                    format!("Index {} cannot be dropped", index_type),
                ))
            }
        };
        let removed = blocks::remove_block(&storage.index_path(index_type))?;
        Ok(loaded || removed)
    }

    /// Writes one index; absent selective indexes are skipped
    pub fn flush_index(&self, index_type: IndexType, storage: &StorageLayout) -> Result<()> {
        let path = storage.index_path(index_type);
        match index_type {
            IndexType::Tag => blocks::write_block(&path, &self.tags),
            IndexType::AttributeName => blocks::write_block(&path, &self.attribute_names),
            IndexType::Path => blocks::write_block(&path, &self.paths),
            IndexType::FullText => match &self.fulltext {
                Some(index) => blocks::write_block(&path, &index.to_file()),
                None => Ok(()),
            },
            _ => match self.values(index_type) {
                Some(index) => blocks::write_block(&path, index),
                None => Ok(()),
            },
        }
    }

    /// Writes the indexes maintained by the optimize scan
    pub fn flush_statistics(&self, storage: &StorageLayout) -> Result<()> {
        for index_type in [IndexType::Tag, IndexType::AttributeName, IndexType::Path] {
            self.flush_index(index_type, storage)?;
        }
        Ok(())
    }

    pub fn flush(&self, storage: &StorageLayout) -> Result<()> {
        self.flush_statistics(storage)?;
        for index_type in IndexType::SELECTIVE {
            self.flush_index(index_type, storage)?;
        }
        Ok(())
    }
}

impl Default for Indexes {
    fn default() -> Self {
        Self::new()
    }
}
