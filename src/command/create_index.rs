use std::time::Instant;
use tracing::{debug, info, warn};
use crate::command::drop_index::drop;
use crate::command::{format_elapsed, Command, CommandInfo};
use crate::core::error::Result;
use crate::core::progress::Job;
use crate::core::store::Store;
use crate::index::builder;
use crate::index::IndexType;
use crate::storage::update::UpdateScope;

/// Drops and rebuilds one selective index, writes its file and flags it as
/// present. On failure the index is left absent.
pub fn create(index_type: IndexType, store: &mut Store, job: &Job, interruptible: bool) -> Result<()> {
    drop(index_type, store)?;
    let built = builder::build(index_type, &store.records, &store.meta, job, interruptible)?;
    store.indexes.install(built);
    if let Err(e) = store.indexes.flush_index(index_type, &store.storage) {
        warn!(index = %index_type, error = %e, "index could not be written");
        store.indexes.discard(index_type);
        return Err(e);
    }
    store.meta.set_indexed(index_type, true);
    Ok(())
}

/// Builds every index whose creation was requested, in one update.
/// Returns the types that were built.
pub fn create_all(store: &mut Store, job: &Job) -> Result<Vec<IndexType>> {
    let requested: Vec<IndexType> = IndexType::SELECTIVE
        .into_iter()
        .filter(|ty| store.meta.is_requested(*ty))
        .collect();
    if requested.is_empty() {
        return Ok(requested);
    }

    let scope = UpdateScope::begin(&store.storage)?;
    let result = requested
        .iter()
        .try_for_each(|ty| create(*ty, store, job, false));
    let finished = scope.finish(&store.storage, &store.meta);
    result?;
    finished?;
    debug!(store = %store.meta.name, count = requested.len(), "requested indexes built");
    Ok(requested)
}

/// `CREATE INDEX <type>`, using the store's current index options
pub struct CreateIndex {
    index: String,
    job: Job,
}

impl CreateIndex {
    pub fn new(index: impl Into<String>) -> Self {
        CreateIndex {
            index: index.into(),
            job: Job::new(),
        }
    }
}

impl Command for CreateIndex {
    fn run(&mut self, store: &mut Store) -> Result<CommandInfo> {
        self.job.check_stop()?;
        let index_type = IndexType::parse(&self.index)?;
        let options = store.config.options.clone();
        options.validate(index_type)?;
        let start = Instant::now();

        let scope = UpdateScope::begin(&store.storage)?;
        let meta = &mut store.meta;
        meta.set_requested(index_type, true);
        if index_type == IndexType::FullText {
            meta.fulltext = options.fulltext.clone();
        }
        meta.includes.set(index_type, options.includes.get(index_type));
        meta.split_size = options.split_size;

        let result = create(index_type, store, &self.job, true);
        let finished = scope.finish(&store.storage, &store.meta);
        result?;
        finished?;

        let elapsed = start.elapsed();
        let mut message = format!("Index '{}' created in {}.", index_type, format_elapsed(elapsed));
        if let Some(index) = store.indexes.fulltext.as_ref().filter(|_| index_type == IndexType::FullText) {
            if options.split_size > 0 {
                message.push_str(&format!(" Postings merged from {} runs.", index.splits()));
            }
        }
        info!(store = %store.meta.name, "{}", message);
        Ok(CommandInfo { message, elapsed })
    }

    fn job(&self) -> &Job {
        &self.job
    }
}
