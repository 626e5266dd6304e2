use tracing::{debug, warn};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Kind, Pre};
use crate::index::names::NameStats;
use crate::index::path::PathKey;
use crate::index::{IndexType, Indexes};
use crate::storage::layout::StorageLayout;
use crate::storage::meta::MetaData;
use crate::storage::records::RecordStore;

/// A document store: the record table, its metadata and every index built
/// over it. Mutating commands borrow it exclusively.
pub struct Store {
    pub(crate) config: Config,
    pub(crate) storage: StorageLayout,
    pub(crate) records: RecordStore,
    pub(crate) meta: MetaData,
    pub(crate) indexes: Indexes,
}

impl Store {
    /// Writes a new store from a finished record table. Nothing is indexed
    /// yet; index types enabled in the configuration are marked as requested.
    pub fn create(config: Config, name: &str, records: RecordStore) -> Result<Self> {
        let storage = StorageLayout::new(config.storage_path.clone())?;
        if storage.meta_path().exists() {
            return Err(Error::new(
                ErrorKind::InvalidState,
                format!("Store already exists at {}", storage.base_dir.display()),
            ));
        }

        let mut meta = MetaData::new(name, records.size() as u32);
        let options = &config.options;
        for index_type in IndexType::SELECTIVE {
            meta.set_requested(index_type, options.enabled(index_type));
        }
        meta.fulltext = options.fulltext.clone();
        meta.split_size = options.split_size;
        meta.includes = options.includes.clone();

        records.save(&storage.records_path())?;
        let indexes = Indexes::new();
        indexes.flush(&storage)?;
        meta.save(&storage)?;
        debug!(store = name, size = records.size(), "store created");

        Ok(Store {
            config,
            storage,
            records,
            meta,
            indexes,
        })
    }

    pub fn open(config: Config) -> Result<Self> {
        let storage = StorageLayout::new(config.storage_path.clone())?;
        let mut meta = MetaData::load(&storage)?;
        let records = RecordStore::load(&storage.records_path())?;

        if storage.update_marker_path().exists() {
            warn!(store = %meta.name, "previous update did not finish, statistics are stale");
            meta.dirty = true;
            meta.uptodate = false;
        }

        let indexes = Indexes::load(&storage, &mut meta)?;
        debug!(store = %meta.name, size = records.size(), "store opened");

        Ok(Store {
            config,
            storage,
            records,
            meta,
            indexes,
        })
    }

    /// Persists the metadata and every loaded index
    pub fn flush(&self) -> Result<()> {
        self.indexes.flush(&self.storage)?;
        self.meta.save(&self.storage)
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the options used by later commands
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.storage
    }

    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    /// Whether an index may be trusted by readers
    pub fn is_indexed(&self, index_type: IndexType) -> bool {
        self.meta.is_indexed(index_type) && self.indexes.is_loaded(index_type)
    }

    pub fn text_postings(&self, value: &str) -> Vec<Pre> {
        self.value_postings(IndexType::Text, value)
    }

    pub fn attribute_postings(&self, value: &str) -> Vec<Pre> {
        self.value_postings(IndexType::Attribute, value)
    }

    pub fn token_postings(&self, token: &str) -> Vec<Pre> {
        self.value_postings(IndexType::Token, token)
    }

    pub fn fulltext_postings(&self, word: &str) -> Vec<Pre> {
        match &self.indexes.fulltext {
            Some(index) if self.meta.fulltext_index => index.find(word),
            _ => Vec::new(),
        }
    }

    pub fn tag_stats(&self, name: &str) -> Option<&NameStats> {
        let id = self.records.element_names().id(name)?;
        self.indexes.tags.stats(id)
    }

    pub fn attribute_name_stats(&self, name: &str) -> Option<&NameStats> {
        let id = self.records.attribute_names().id(name)?;
        self.indexes.attribute_names.stats(id)
    }

    /// Occurrences of a (name, kind, level) path step; unnamed kinds use ""
    pub fn path_count(&self, name: &str, kind: Kind, level: usize) -> u32 {
        let id = match kind {
            Kind::Element => self.records.element_names().id(name),
            Kind::Attribute => self.records.attribute_names().id(name),
            _ => Some(0),
        };
        id.map_or(0, |id| self.indexes.paths.count(&PathKey::new(id, kind, level)))
    }

    fn value_postings(&self, index_type: IndexType, key: &str) -> Vec<Pre> {
        if !self.meta.is_indexed(index_type) {
            return Vec::new();
        }
        self.indexes
            .values(index_type)
            .map(|index| index.pres(key.as_bytes()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::records::RecordStoreBuilder;

    fn records() -> RecordStore {
        let mut b = RecordStoreBuilder::new();
        b.open_document().unwrap();
        b.open_element("a").unwrap();
        b.text("x").unwrap();
        b.close().unwrap();
        b.close().unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn create_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path());
        config.options.text_index = true;

        let store = Store::create(config.clone(), "db", records()).unwrap();
        assert!(store.meta().create_text);
        assert!(store.meta().dirty);
        drop(store);

        let store = Store::open(config).unwrap();
        assert_eq!(store.name(), "db");
        assert_eq!(store.records().size(), 3);
        assert!(!store.is_indexed(IndexType::Text));
        assert!(store.text_postings("x").is_empty());
    }

    #[test]
    fn create_refuses_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path());
        Store::create(config.clone(), "db", records()).unwrap();
        assert_eq!(
            Store::create(config, "db", records()).err().unwrap().kind,
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn open_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("nothing"));
        assert_eq!(Store::open(config).err().unwrap().kind, ErrorKind::NotFound);
    }
}
