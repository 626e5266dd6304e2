use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::core::types::{NameId, Pre};
use crate::index::{Index, IndexType};

/// Statistics collected for one element or attribute name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameStats {
    /// Records carrying the name, ascending
    pub occurrences: Vec<Pre>,
    /// Values seen under the name: attribute values, or texts owned by an element
    pub values: Vec<Vec<u8>>,
}

impl NameStats {
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }
}

/// Name index keyed by interned name id. Serves as the tag index (elements
/// and the texts they own) and as the attribute-name index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameIndex {
    index_type: IndexType,
    stats: BTreeMap<NameId, NameStats>,
}

impl NameIndex {
    pub fn new(index_type: IndexType) -> Self {
        NameIndex {
            index_type,
            stats: BTreeMap::new(),
        }
    }

    pub fn stats(&self, name: NameId) -> Option<&NameStats> {
        self.stats.get(&name)
    }
}

impl Index for NameIndex {
    type Key = NameId;

    fn index_type(&self) -> IndexType {
        self.index_type
    }

    fn init(&mut self) {
        self.stats.clear();
    }

    /// `distinct` registers one occurrence of the name per record; repeating
    /// the call for the same record is ignored. Otherwise only the value is
    /// accumulated, once per call.
    fn add(&mut self, pre: Pre, key: &NameId, value: Option<&[u8]>, distinct: bool) {
        let stats = self.stats.entry(*key).or_default();
        if distinct {
            if stats.occurrences.last() == Some(&pre) {
                return;
            }
            stats.occurrences.push(pre);
        }
        if let Some(value) = value {
            stats.values.push(value.to_vec());
        }
    }

    fn len(&self) -> usize {
        self.stats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_add_records_one_occurrence_per_step() {
        let mut index = NameIndex::new(IndexType::Tag);
        index.add(3, &1, None, true);
        index.add(3, &1, None, true);
        index.add(5, &1, None, true);
        assert_eq!(index.stats(1).unwrap().occurrences, vec![3, 5]);
    }

    #[test]
    fn accumulating_add_keeps_every_value() {
        let mut index = NameIndex::new(IndexType::Tag);
        index.add(1, &2, None, true);
        index.add(2, &2, Some(b"hi"), false);
        index.add(3, &2, Some(b"hi"), false);
        let stats = index.stats(2).unwrap();
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.values, vec![b"hi".to_vec(), b"hi".to_vec()]);
    }

    #[test]
    fn init_clears() {
        let mut index = NameIndex::new(IndexType::AttributeName);
        index.add(1, &4, Some(b"v"), true);
        assert_eq!(index.len(), 1);
        index.init();
        assert!(index.is_empty());
        assert_eq!(index.index_type(), IndexType::AttributeName);
    }
}
