use std::time::Instant;
use tracing::debug;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::progress::Job;
use crate::core::types::{Kind, Pre};
use crate::index::filter::NameFilter;
use crate::index::fulltext::FullTextIndex;
use crate::index::value::ValueIndex;
use crate::index::{Built, Index, IndexType};
use crate::storage::meta::MetaData;
use crate::storage::records::RecordStore;

/// Records between two stop checks
const STOP_INTERVAL: usize = 4096;

/// Builds one selective index from scratch over the whole record store.
///
/// Configuration (name filter, full-text options, split size) is taken from
/// the metadata. With `interruptible`, the job's stop flag is honoured while
/// scanning.
pub fn build(
    index_type: IndexType,
    records: &RecordStore,
    meta: &MetaData,
    job: &Job,
    interruptible: bool,
) -> Result<Built> {
    let start = Instant::now();
    let filter = NameFilter::parse(meta.includes.get(index_type))?;
    job.start(records.size());

    let built = match index_type {
        IndexType::FullText => {
            let mut index = FullTextIndex::new(meta.fulltext.clone(), meta.split_size)?;
            scan(records, job, interruptible, |pre| {
                if records.kind(pre) == Kind::Text && filter.matches(owner_name(records, pre)) {
                    index.add(pre, records.text(pre), None, false);
                }
            })?;
            index.finish()?;
            debug!(terms = index.len(), splits = index.splits(), "full-text index built");
            Built::FullText(index)
        }
        IndexType::Text => {
            let mut index = ValueIndex::new(index_type);
            scan(records, job, interruptible, |pre| {
                if records.kind(pre) == Kind::Text && filter.matches(owner_name(records, pre)) {
                    index.add(pre, records.text(pre), None, false);
                }
            })?;
            Built::Values(index)
        }
        IndexType::Attribute => {
            let mut index = ValueIndex::new(index_type);
            scan(records, job, interruptible, |pre| {
                if records.kind(pre) == Kind::Attribute && filter.matches(records.name_str(pre)) {
                    index.add(pre, records.text(pre), None, false);
                }
            })?;
            Built::Values(index)
        }
        IndexType::Token => {
            let mut index = ValueIndex::new(index_type);
            scan(records, job, interruptible, |pre| {
                if records.kind(pre) == Kind::Attribute && filter.matches(records.name_str(pre)) {
                    for token in records.text(pre).split(u8::is_ascii_whitespace).filter(|t| !t.is_empty()) {
                        index.add(pre, token, None, false);
                    }
                }
            })?;
            Built::Values(index)
        }
        other => {
            return Err(Error::new(
                ErrorKind::UnsupportedIndex,
                format!("Index {} is maintained by optimize", other),
            ))
        }
    };

    job.advance(records.size());
    debug!(index = %index_type, elapsed = ?start.elapsed(), "index built");
    Ok(built)
}

fn scan<F: FnMut(Pre)>(records: &RecordStore, job: &Job, interruptible: bool, mut visit: F) -> Result<()> {
    for pos in 0..records.size() {
        if interruptible && pos % STOP_INTERVAL == 0 {
            job.check_stop()?;
        }
        visit(pos as Pre);
        job.advance(pos);
    }
    Ok(())
}

/// Name of the element owning a text record; empty under a document root
fn owner_name(records: &RecordStore, pre: Pre) -> &str {
    match records.parent(pre) {
        Some(parent) if records.kind(parent) == Kind::Element => records.name_str(parent),
        _ => "",
    }
}
