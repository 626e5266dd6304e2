use std::time::Instant;
use tracing::{debug, info, warn};
use crate::command::create_index::create;
use crate::command::{format_elapsed, Command, CommandInfo};
use crate::core::error::Result;
use crate::core::progress::Job;
use crate::core::store::Store;
use crate::core::types::{Kind, Pre};
use crate::index::path::PathKey;
use crate::index::{Index, IndexType};
use crate::storage::ancestry::AncestorStack;
use crate::storage::update::UpdateScope;

/// Outcome of the statistics pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub ndocs: u32,
    pub height: u32,
}

/// Recomputes statistics and the tag, attribute-name and path indexes in a
/// single pre-order pass, then rebuilds every selective index that is
/// present or enabled.
///
/// The caller must hold the update scope. Each selective rebuild writes its
/// own file; the scan-maintained indexes are flushed even if a rebuild fails.
/// `dirty` is cleared only when everything succeeded.
pub fn optimize(store: &mut Store, job: &Job) -> Result<ScanStats> {
    store.meta.dirty = true;
    let stats = scan(store, job);
    store.meta.ndocs = stats.ndocs;
    store.meta.height = stats.height;
    store.meta.path_index = store.config.options.path_index;
    store.meta.uptodate = true;

    let mut rebuilt = Ok(());
    for index_type in IndexType::SELECTIVE {
        if !store.meta.is_indexed(index_type) && !store.config.options.enabled(index_type) {
            continue;
        }
        debug!(index = %index_type, "rebuilding");
        if let Err(e) = create(index_type, store, job, false) {
            warn!(index = %index_type, error = %e, "rebuild failed");
            if rebuilt.is_ok() {
                rebuilt = Err(e);
            }
        }
    }
    if rebuilt.is_ok() {
        store.meta.dirty = false;
    }

    if let Err(e) = store.indexes.flush_statistics(&store.storage) {
        warn!(store = %store.meta.name, error = %e, "flushing indexes failed");
        store.meta.dirty = true;
        store.meta.uptodate = false;
        rebuilt?;
        return Err(e);
    }
    rebuilt.map(|_| stats)
}

fn scan(store: &mut Store, job: &Job) -> ScanStats {
    let start = Instant::now();
    let records = &store.records;
    let indexes = &mut store.indexes;
    let path_index = store.config.options.path_index;

    indexes.tags.init();
    indexes.attribute_names.init();
    indexes.paths.init();

    let mut stack = AncestorStack::new();
    let mut ndocs = 0;
    let mut height = 0;
    job.start(records.size());

    for pos in 0..records.size() {
        let pre = pos as Pre;
        let kind = records.kind(pre);
        let level = stack.close_until(records.parent(pre));

        match kind {
            Kind::Document => {
                stack.open(pre, 0);
                if path_index {
                    indexes.paths.add(pre, &PathKey::new(0, kind, stack.level()), None, false);
                }
                ndocs += 1;
            }
            Kind::Element => {
                let name = records.name(pre);
                indexes.tags.add(pre, &name, None, true);
                if path_index {
                    indexes.paths.add(pre, &PathKey::new(name, kind, level), None, false);
                }
                stack.open(pre, name);
            }
            Kind::Attribute => {
                let name = records.name(pre);
                indexes.attribute_names.add(pre, &name, Some(records.text(pre)), true);
                if path_index {
                    indexes.paths.add(pre, &PathKey::new(name, kind, level), None, false);
                }
            }
            _ => {
                let owner = stack.owner();
                if kind == Kind::Text && owner != 0 {
                    indexes.tags.add(pre, &owner, Some(records.text(pre)), false);
                }
                if path_index {
                    indexes.paths.add(pre, &PathKey::new(0, kind, level), None, false);
                }
            }
        }
        height = height.max(stack.level());
        job.advance(pos);
    }

    debug!(ndocs, height, elapsed = ?start.elapsed(), "statistics pass finished");
    ScanStats {
        ndocs,
        height: height as u32,
    }
}

/// `OPTIMIZE`: refreshes statistics and indexes. Only a stop requested
/// before it starts is honoured.
#[derive(Default)]
pub struct Optimize {
    job: Job,
}

impl Optimize {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for Optimize {
    fn run(&mut self, store: &mut Store) -> Result<CommandInfo> {
        self.job.check_stop()?;
        let start = Instant::now();

        let scope = UpdateScope::begin(&store.storage)?;
        let result = optimize(store, &self.job);
        let finished = scope.finish(&store.storage, &store.meta);
        result?;
        finished?;

        let elapsed = start.elapsed();
        let message = format!("Database '{}' optimized in {}.", store.meta.name, format_elapsed(elapsed));
        info!("{}", message);
        Ok(CommandInfo { message, elapsed })
    }

    fn job(&self) -> &Job {
        &self.job
    }

    fn stoppable(&self) -> bool {
        false
    }

    fn details(&self) -> &str {
        "Updating statistics"
    }
}
