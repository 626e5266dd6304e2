use std::collections::{BTreeMap, HashSet};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::FullTextOptions;
use crate::core::error::Result;
use crate::core::types::Pre;
use crate::index::posting::FtPosting;
use crate::index::{Index, IndexType};

/// Full-text index: analyzed terms to word-level postings.
///
/// Terms are buffered in runs of at most `split_size` postings; each full run
/// is sorted and merged into the pending terms. `finish` compiles the pending
/// terms into an FST dictionary whose values are slots into `postings`.
pub struct FullTextIndex {
    options: FullTextOptions,
    split_size: u32,
    analyzer: Analyzer,
    run: Vec<(String, FtPosting)>,
    pending: BTreeMap<String, Vec<FtPosting>>,
    splits: u32,
    dictionary: Map<Vec<u8>>,
    postings: Vec<Vec<FtPosting>>,
}

/// Persisted form
#[derive(Serialize, Deserialize)]
pub struct FullTextFile {
    pub options: FullTextOptions,
    pub split_size: u32,
    pub splits: u32,
    pub dictionary: Vec<u8>,
    pub postings: Vec<Vec<FtPosting>>,
}

impl FullTextIndex {
    pub fn new(options: FullTextOptions, split_size: u32) -> Result<Self> {
        let analyzer = Analyzer::for_fulltext(&options)?;
        debug!(analyzer = %analyzer.describe(), split_size, "full-text analyzer ready");
        Ok(FullTextIndex {
            options,
            split_size,
            analyzer,
            run: Vec::new(),
            pending: BTreeMap::new(),
            splits: 0,
            dictionary: Map::default(),
            postings: Vec::new(),
        })
    }

    pub fn options(&self) -> &FullTextOptions {
        &self.options
    }

    /// Number of runs merged during the last build
    pub fn splits(&self) -> u32 {
        self.splits
    }

    /// Merges the open run and compiles the term dictionary.
    pub fn finish(&mut self) -> Result<()> {
        self.merge_run();
        let mut builder = MapBuilder::memory();
        let mut postings = Vec::with_capacity(self.pending.len());
        for (slot, (term, list)) in std::mem::take(&mut self.pending).into_iter().enumerate() {
            builder.insert(term.as_bytes(), slot as u64)?;
            postings.push(list);
        }
        self.dictionary = builder.into_map();
        self.postings = postings;
        Ok(())
    }

    /// Postings of an already normalized term
    pub fn postings(&self, term: &str) -> &[FtPosting] {
        self.dictionary
            .get(term.as_bytes())
            .and_then(|slot| self.postings.get(slot as usize))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Analyzes `word` like indexed text and returns the records containing it
    pub fn find(&self, word: &str) -> Vec<Pre> {
        let Some(token) = self.analyzer.analyze(word).into_iter().next() else {
            return Vec::new();
        };
        let mut pres: Vec<Pre> = self.postings(&token.text).iter().map(|p| p.pre).collect();
        pres.dedup();
        pres
    }

    /// Terms starting with `prefix`, in order
    pub fn terms_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let prefix_bytes = prefix.as_bytes();
        let mut stream = self.dictionary.range().ge(prefix_bytes).into_stream();

        while let Some((term, _slot)) = stream.next() {
            if !term.starts_with(prefix_bytes) {
                break;
            }
            results.push(String::from_utf8_lossy(term).into_owned());
        }
        results
    }

    pub fn to_file(&self) -> FullTextFile {
        FullTextFile {
            options: self.options.clone(),
            split_size: self.split_size,
            splits: self.splits,
            dictionary: self.dictionary.as_fst().as_bytes().to_vec(),
            postings: self.postings.clone(),
        }
    }

    pub fn from_file(file: FullTextFile) -> Result<Self> {
        let mut index = FullTextIndex::new(file.options, file.split_size)?;
        index.splits = file.splits;
        index.dictionary = Map::new(file.dictionary)?;
        index.postings = file.postings;
        Ok(index)
    }

    fn merge_run(&mut self) {
        if self.run.is_empty() {
            return;
        }
        self.run.sort();
        for (term, posting) in self.run.drain(..) {
            self.pending.entry(term).or_default().push(posting);
        }
        self.splits += 1;
    }
}

impl Index for FullTextIndex {
    type Key = [u8];

    fn index_type(&self) -> IndexType {
        IndexType::FullText
    }

    fn init(&mut self) {
        self.run.clear();
        self.pending.clear();
        self.splits = 0;
        self.dictionary = Map::default();
        self.postings.clear();
    }

    /// Analyzes the text of record `pre`. With `distinct`, only the first
    /// position of each term is kept.
    fn add(&mut self, pre: Pre, key: &[u8], _value: Option<&[u8]>, distinct: bool) {
        let text = String::from_utf8_lossy(key);
        let mut seen = HashSet::new();
        for token in self.analyzer.analyze(&text) {
            if distinct && !seen.insert(token.text.clone()) {
                continue;
            }
            self.run.push((token.text, FtPosting { pre, position: token.position }));
            if self.split_size > 0 && self.run.len() >= self.split_size as usize {
                self.merge_run();
            }
        }
    }

    fn len(&self) -> usize {
        self.dictionary.len()
    }
}
