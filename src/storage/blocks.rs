//! Checksummed, compressed single-file persistence used by the record table,
//! the metadata and every index file.
//!
//! Layout: `[crc32 of payload: u32 LE][payload]` where the payload is a
//! bincode-serialized [`CompressedBlock`] wrapping the bincode bytes of the value.
//! Files are written to a sibling temp file and renamed into place.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use crc32fast::Hasher;
use serde::Serialize;
use serde::de::DeserializeOwned;
use crate::compression::compress::CompressedBlock;
use crate::core::error::{Error, ErrorKind, Result};

const HEADER_SIZE: usize = 4;

pub fn write_block<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = bincode::serialize(value)?;
    let block = CompressedBlock::compress_auto(&raw)?;
    let payload = bincode::serialize(&block)?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&hasher.finalize().to_le_bytes());
    bytes.extend_from_slice(&payload);

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a block; `Ok(None)` if the file does not exist.
pub fn read_block<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if bytes.len() < HEADER_SIZE {
        return Err(corrupt(path, "truncated header"));
    }
    let (header, payload) = bytes.split_at(HEADER_SIZE);
    let mut expected = [0u8; HEADER_SIZE];
    expected.copy_from_slice(header);

    let mut hasher = Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != u32::from_le_bytes(expected) {
        return Err(corrupt(path, "checksum mismatch"));
    }

    let block: CompressedBlock = bincode::deserialize(payload)?;
    let raw = block.decompress()?;
    Ok(Some(bincode::deserialize(&raw)?))
}

/// Removes a block file; absence is not an error.
pub fn remove_block(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn corrupt(path: &Path, reason: &str) -> Error {
    Error::new(ErrorKind::Corrupt, format!("{}: {}", path.display(), reason))
}
