use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::core::config::{FullTextOptions, IndexIncludes};
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::IndexType;
use crate::storage::blocks;
use crate::storage::layout::StorageLayout;

/// Durable record of store statistics and index presence.
///
/// Readers consult the presence flags before trusting an index; `dirty` is
/// set whenever statistics may be stale and only cleared by a full optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    pub name: String,
    pub created_at: DateTime<Utc>,

    // Statistics
    pub size: u32,
    pub ndocs: u32,
    pub height: u32,

    // Presence flags
    pub text_index: bool,
    pub attribute_index: bool,
    pub token_index: bool,
    pub fulltext_index: bool,
    pub path_index: bool,

    // Requested through create-index
    pub create_text: bool,
    pub create_attribute: bool,
    pub create_token: bool,
    pub create_fulltext: bool,

    pub fulltext: FullTextOptions,
    pub split_size: u32,
    pub includes: IndexIncludes,

    pub dirty: bool,
    pub uptodate: bool,
}

impl MetaData {
    pub fn new(name: &str, size: u32) -> Self {
        MetaData {
            name: name.to_string(),
            created_at: Utc::now(),
            size,
            ndocs: 0,
            height: 0,
            text_index: false,
            attribute_index: false,
            token_index: false,
            fulltext_index: false,
            path_index: false,
            create_text: false,
            create_attribute: false,
            create_token: false,
            create_fulltext: false,
            fulltext: FullTextOptions::default(),
            split_size: 0,
            includes: IndexIncludes::default(),
            dirty: true,
            uptodate: false,
        }
    }

    pub fn is_indexed(&self, index_type: IndexType) -> bool {
        match index_type {
            IndexType::Text => self.text_index,
            IndexType::Attribute => self.attribute_index,
            IndexType::Token => self.token_index,
            IndexType::FullText => self.fulltext_index,
            IndexType::Path => self.path_index,
            IndexType::Tag | IndexType::AttributeName => self.uptodate,
        }
    }

    /// Sets the presence flag of a selectively built index
    pub fn set_indexed(&mut self, index_type: IndexType, present: bool) {
        match index_type {
            IndexType::Text => self.text_index = present,
            IndexType::Attribute => self.attribute_index = present,
            IndexType::Token => self.token_index = present,
            IndexType::FullText => self.fulltext_index = present,
            IndexType::Path => self.path_index = present,
            IndexType::Tag | IndexType::AttributeName => {}
        }
    }

    pub fn is_requested(&self, index_type: IndexType) -> bool {
        match index_type {
            IndexType::Text => self.create_text,
            IndexType::Attribute => self.create_attribute,
            IndexType::Token => self.create_token,
            IndexType::FullText => self.create_fulltext,
            _ => false,
        }
    }

    pub fn set_requested(&mut self, index_type: IndexType, requested: bool) {
        match index_type {
            IndexType::Text => self.create_text = requested,
            IndexType::Attribute => self.create_attribute = requested,
            IndexType::Token => self.create_token = requested,
            IndexType::FullText => self.create_fulltext = requested,
            _ => {}
        }
    }

    pub fn load(storage: &StorageLayout) -> Result<Self> {
        let path = storage.meta_path();
        blocks::read_block(&path)?.ok_or_else(|| {
            Error::new(ErrorKind::NotFound, format!("No metadata at {}", path.display()))
        })
    }

    pub fn save(&self, storage: &StorageLayout) -> Result<()> {
        blocks::write_block(&storage.meta_path(), self)
    }

    /// JSON rendering for status output
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::new(ErrorKind::Internal, e.to_string()))
    }
}
