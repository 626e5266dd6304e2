use std::time::Instant;
use tracing::{debug, info};
use crate::command::{format_elapsed, Command, CommandInfo};
use crate::core::error::Result;
use crate::core::progress::Job;
use crate::core::store::Store;
use crate::index::IndexType;
use crate::storage::update::UpdateScope;

/// Removes one selective index from memory and disk and clears its
/// presence flag. Returns whether the index existed.
pub fn drop(index_type: IndexType, store: &mut Store) -> Result<bool> {
    store.meta.set_indexed(index_type, false);
    let existed = store.indexes.remove(index_type, &store.storage)?;
    debug!(index = %index_type, existed, "index dropped");
    Ok(existed)
}

/// `DROP INDEX <type>`
pub struct DropIndex {
    index: String,
    job: Job,
}

impl DropIndex {
    pub fn new(index: impl Into<String>) -> Self {
        DropIndex {
            index: index.into(),
            job: Job::new(),
        }
    }
}

impl Command for DropIndex {
    fn run(&mut self, store: &mut Store) -> Result<CommandInfo> {
        self.job.check_stop()?;
        let index_type = IndexType::parse(&self.index)?;
        let start = Instant::now();

        let scope = UpdateScope::begin(&store.storage)?;
        store.meta.set_requested(index_type, false);
        let result = drop(index_type, store);
        let finished = scope.finish(&store.storage, &store.meta);
        let existed = result?;
        finished?;

        let elapsed = start.elapsed();
        let message = if existed {
            format!("Index '{}' dropped in {}.", index_type, format_elapsed(elapsed))
        } else {
            format!("No index '{}' to drop.", index_type)
        };
        info!(store = %store.meta.name, "{}", message);
        Ok(CommandInfo { message, elapsed })
    }

    fn job(&self) -> &Job {
        &self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::error::ErrorKind;
    use crate::storage::records::RecordStoreBuilder;

    fn store(dir: &std::path::Path) -> Store {
        let mut b = RecordStoreBuilder::new();
        b.open_document().unwrap();
        b.open_element("a").unwrap();
        b.text("x").unwrap();
        b.close().unwrap();
        b.close().unwrap();
        Store::create(Config::new(dir), "db", b.finish().unwrap()).unwrap()
    }

    #[test]
    fn dropping_absent_index_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let info = DropIndex::new("text").run(&mut store).unwrap();
        assert_eq!(info.message, "No index 'TEXT' to drop.");
        assert!(!store.layout().update_marker_path().exists());
    }

    #[test]
    fn rejects_unknown_type_without_touching_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let before = store.meta().clone();
        let err = DropIndex::new("paths").run(&mut store).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(store.meta(), &before);
    }
}
