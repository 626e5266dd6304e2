use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::core::types::Pre;
use crate::index::posting::Postings;
use crate::index::{Index, IndexType};

/// Value index over raw content bytes: text values, attribute values or
/// attribute tokens, depending on its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueIndex {
    index_type: IndexType,
    entries: BTreeMap<Vec<u8>, Postings>,
}

impl ValueIndex {
    pub fn new(index_type: IndexType) -> Self {
        ValueIndex {
            index_type,
            entries: BTreeMap::new(),
        }
    }

    pub fn postings(&self, key: &[u8]) -> Option<&Postings> {
        self.entries.get(key)
    }

    /// Records containing `key`; empty if the key is unknown
    pub fn pres(&self, key: &[u8]) -> Vec<Pre> {
        self.postings(key).map(Postings::to_vec).unwrap_or_default()
    }
}

impl Index for ValueIndex {
    type Key = [u8];

    fn index_type(&self) -> IndexType {
        self.index_type
    }

    fn init(&mut self) {
        self.entries.clear();
    }

    /// With `distinct`, repeated occurrences in the same record count once;
    /// otherwise every occurrence is counted.
    fn add(&mut self, pre: Pre, key: &[u8], _value: Option<&[u8]>, distinct: bool) {
        let postings = self.entries.entry(key.to_vec()).or_default();
        let fresh = postings.pres.insert(pre);
        if fresh || !distinct {
            postings.count += 1;
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_occurrences() {
        let mut index = ValueIndex::new(IndexType::Token);
        index.add(2, b"red", None, false);
        index.add(2, b"red", None, false);
        index.add(7, b"red", None, false);

        let postings = index.postings(b"red").unwrap();
        assert_eq!(postings.to_vec(), vec![2, 7]);
        assert_eq!(postings.count, 3);
    }

    #[test]
    fn distinct_counts_records() {
        let mut index = ValueIndex::new(IndexType::Text);
        index.add(2, b"red", None, true);
        index.add(2, b"red", None, true);
        assert_eq!(index.postings(b"red").unwrap().count, 1);
    }

    #[test]
    fn unknown_key_has_no_pres() {
        let mut index = ValueIndex::new(IndexType::Attribute);
        index.add(1, b"10", None, false);
        assert_eq!(index.pres(b"10"), vec![1]);
        assert!(index.pres(b"50").is_empty());
    }
}
