use crate::core::error::{Error, ErrorKind, Result};
use serde::{Serialize, Deserialize};

/// Compressed block storage for persisted structures
#[derive(Serialize, Deserialize)]
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
    pub compression: CompressionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    LZ4,      // Fast compression (~500 MB/s), ratio 2-3x
}

/// Blocks smaller than this are stored raw
const MIN_COMPRESS_SIZE: usize = 64;

impl CompressedBlock {
    pub fn compress(data: &[u8], compression: CompressionType) -> Result<Self> {
        let compressed = match compression {
            CompressionType::None => data.to_vec(),

            CompressionType::LZ4 => {
                lz4::block::compress(data, None, false)?
            }
        };

        Ok(CompressedBlock {
            data: compressed,
            original_size: data.len(),
            compression,
        })
    }

    /// LZ4 for anything worth compressing, raw otherwise
    pub fn compress_auto(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_COMPRESS_SIZE {
            Self::compress(data, CompressionType::None)
        } else {
            Self::compress(data, CompressionType::LZ4)
        }
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        match self.compression {
            CompressionType::None => Ok(self.data.clone()),

            CompressionType::LZ4 => {
                let size = i32::try_from(self.original_size).map_err(|_| {
                    Error::new(ErrorKind::Corrupt, "Block too large to decompress".to_string())
                })?;
                lz4::block::decompress(&self.data, Some(size))
                    .map_err(|e| Error::new(ErrorKind::Corrupt, e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_blocks_stay_raw() {
        let block = CompressedBlock::compress_auto(b"tiny").unwrap();
        assert_eq!(block.compression, CompressionType::None);
        assert_eq!(block.decompress().unwrap(), b"tiny");
    }

    #[test]
    fn repetitive_data_shrinks() {
        let data = b"<item>hello</item>".repeat(200);
        let block = CompressedBlock::compress_auto(&data).unwrap();
        assert_eq!(block.compression, CompressionType::LZ4);
        assert!(block.data.len() < data.len());
        assert_eq!(block.decompress().unwrap(), data);
    }
}
