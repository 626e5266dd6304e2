use roaring::RoaringBitmap;
use serde::{Serialize, Deserialize};
use crate::core::types::Pre;

/// Postings of one value-index key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Postings {
    #[serde(with = "bitmap")]
    pub pres: RoaringBitmap,   // records containing the key
    pub count: u64,            // total occurrences, >= pres.len()
}

impl Postings {
    /// Pre values in ascending order
    pub fn to_vec(&self) -> Vec<Pre> {
        self.pres.iter().collect()
    }
}

/// One full-text occurrence: record and word position inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FtPosting {
    pub pre: Pre,
    pub position: u32,
}

mod bitmap {
    use roaring::RoaringBitmap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bitmap: &RoaringBitmap, serializer: S) -> Result<S::Ok, S::Error> {
        let mut bytes = Vec::with_capacity(bitmap.serialized_size());
        bitmap
            .serialize_into(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        bytes.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoaringBitmap, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        RoaringBitmap::deserialize_from(&bytes[..]).map_err(serde::de::Error::custom)
    }
}
