use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::core::types::{Kind, NameId, Pre};
use crate::index::{Index, IndexType};

/// Structural key: name (0 for unnamed kinds), kind and depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathKey {
    pub name: NameId,
    pub kind: Kind,
    pub level: u32,
}

impl PathKey {
    pub fn new(name: NameId, kind: Kind, level: usize) -> Self {
        PathKey {
            name,
            kind,
            level: level as u32,
        }
    }
}

/// Occurrence counts per structural key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathIndex {
    counts: BTreeMap<PathKey, u32>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, key: &PathKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

impl Index for PathIndex {
    type Key = PathKey;

    fn index_type(&self) -> IndexType {
        IndexType::Path
    }

    fn init(&mut self) {
        self.counts.clear();
    }

    /// Every call counts; paths carry no payload.
    fn add(&mut self, _pre: Pre, key: &PathKey, _value: Option<&[u8]>, _distinct: bool) {
        *self.counts.entry(*key).or_insert(0) += 1;
    }

    fn len(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_key() {
        let mut index = PathIndex::new();
        let item = PathKey::new(3, Kind::Element, 2);
        index.add(4, &item, None, false);
        index.add(9, &item, None, false);
        index.add(10, &PathKey::new(0, Kind::Text, 3), None, false);

        assert_eq!(index.count(&item), 2);
        assert_eq!(index.count(&PathKey::new(3, Kind::Attribute, 2)), 0);
        assert_eq!(index.len(), 2);
    }
}
