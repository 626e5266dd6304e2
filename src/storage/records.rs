use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Kind, NameId, Pre};
use crate::storage::blocks;

/// One entry of the flat pre-order table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub kind: Kind,
    pub name: NameId,
    /// Distance back to the structural parent; 0 for document roots
    pub dist: u32,
    pub text_offset: u32,
    pub text_len: u32,
}

/// Interned names; id 0 is reserved for "no name"
#[derive(Debug, Clone)]
pub struct NamePool {
    names: Vec<String>,
    ids: HashMap<String, NameId>,
}

impl NamePool {
    pub fn new() -> Self {
        NamePool {
            names: vec![String::new()],
            ids: HashMap::new(),
        }
    }

    fn from_names(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .skip(1)
            .map(|(id, name)| (name.clone(), id as NameId))
            .collect();
        NamePool { names, ids }
    }

    pub fn intern(&mut self, name: &str) -> NameId {
        if name.is_empty() {
            return 0;
        }
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as NameId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<NameId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: NameId) -> &str {
        self.names.get(id as usize).map(String::as_str).unwrap_or_default()
    }

    /// Number of interned names, excluding the reserved id 0
    pub fn len(&self) -> usize {
        self.names.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
struct RecordTable {
    records: Vec<Record>,
    heap: Vec<u8>,
    element_names: Vec<String>,
    attribute_names: Vec<String>,
}

/// Flat, pre-order addressed table of typed records.
///
/// A subtree occupies the contiguous range starting at its root. Parents are
/// not stored, only the relative distance back to them.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    heap: Vec<u8>,
    elements: NamePool,
    attributes: NamePool,
}

impl RecordStore {
    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, pre: Pre) -> &Record {
        &self.records[pre as usize]
    }

    pub fn kind(&self, pre: Pre) -> Kind {
        self.record(pre).kind
    }

    pub fn name(&self, pre: Pre) -> NameId {
        self.record(pre).name
    }

    pub fn dist(&self, pre: Pre) -> u32 {
        self.record(pre).dist
    }

    /// Structural parent, derived as `pre - dist`; `None` for document roots
    pub fn parent(&self, pre: Pre) -> Option<Pre> {
        let record = self.record(pre);
        match record.kind {
            Kind::Document => None,
            _ => pre.checked_sub(record.dist),
        }
    }

    /// Raw content bytes; empty for documents and elements
    pub fn text(&self, pre: Pre) -> &[u8] {
        let record = self.record(pre);
        let start = record.text_offset as usize;
        &self.heap[start..start + record.text_len as usize]
    }

    /// Resolves the name of an element or attribute record
    pub fn name_str(&self, pre: Pre) -> &str {
        let record = self.record(pre);
        self.name_of(record.kind, record.name)
    }

    pub fn name_of(&self, kind: Kind, id: NameId) -> &str {
        match kind {
            Kind::Attribute => self.attributes.name(id),
            _ => self.elements.name(id),
        }
    }

    pub fn element_names(&self) -> &NamePool {
        &self.elements
    }

    pub fn attribute_names(&self) -> &NamePool {
        &self.attributes
    }

    /// Pre values of all document roots
    pub fn documents(&self) -> impl Iterator<Item = Pre> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind == Kind::Document)
            .map(|(pre, _)| pre as Pre)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let table = RecordTable {
            records: self.records.clone(),
            heap: self.heap.clone(),
            element_names: self.elements.names.clone(),
            attribute_names: self.attributes.names.clone(),
        };
        blocks::write_block(path, &table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let table: RecordTable = blocks::read_block(path)?.ok_or_else(|| {
            Error::new(ErrorKind::NotFound, format!("No record table at {}", path.display()))
        })?;
        Ok(RecordStore {
            records: table.records,
            heap: table.heap,
            elements: NamePool::from_names(table.element_names),
            attributes: NamePool::from_names(table.attribute_names),
        })
    }
}

/// Streaming construction of a record store in document order.
///
/// Also keeps the absolute parent of every record so that reconstructed
/// ancestry can be checked against it.
pub struct RecordStoreBuilder {
    store: RecordStore,
    open: Vec<Pre>,
    parents: Vec<Option<Pre>>,
}

impl RecordStoreBuilder {
    pub fn new() -> Self {
        RecordStoreBuilder {
            store: RecordStore::default(),
            open: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn open_document(&mut self) -> Result<Pre> {
        if !self.open.is_empty() {
            return Err(state("documents cannot be nested"));
        }
        let pre = self.push(Kind::Document, 0, None, b"")?;
        self.open.push(pre);
        Ok(pre)
    }

    pub fn open_element(&mut self, name: &str) -> Result<Pre> {
        let parent = self.current()?;
        let id = self.store.elements.intern(name);
        let pre = self.push(Kind::Element, id, Some(parent), b"")?;
        self.open.push(pre);
        Ok(pre)
    }

    /// Attributes must directly follow their element or its other attributes
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<Pre> {
        let owner = self.current()?;
        if self.store.kind(owner) != Kind::Element {
            return Err(state("attributes need an open element"));
        }
        let last = (self.store.size() - 1) as Pre;
        let attached = last == owner
            || (self.store.kind(last) == Kind::Attribute && self.parents[last as usize] == Some(owner));
        if !attached {
            return Err(state("attributes must precede element content"));
        }
        let id = self.store.attributes.intern(name);
        self.push(Kind::Attribute, id, Some(owner), value.as_bytes())
    }

    pub fn text(&mut self, value: &str) -> Result<Pre> {
        self.leaf(Kind::Text, value)
    }

    pub fn comment(&mut self, value: &str) -> Result<Pre> {
        self.leaf(Kind::Comment, value)
    }

    pub fn processing_instruction(&mut self, value: &str) -> Result<Pre> {
        self.leaf(Kind::ProcessingInstruction, value)
    }

    /// Closes the innermost open element or document
    pub fn close(&mut self) -> Result<()> {
        self.open.pop().map(|_| ()).ok_or_else(|| state("nothing to close"))
    }

    /// Absolute parent of every record added so far
    pub fn ground_truth(&self) -> &[Option<Pre>] {
        &self.parents
    }

    pub fn finish(self) -> Result<RecordStore> {
        if !self.open.is_empty() {
            return Err(state("unclosed elements or documents"));
        }
        Ok(self.store)
    }

    fn leaf(&mut self, kind: Kind, value: &str) -> Result<Pre> {
        let parent = self.current()?;
        self.push(kind, 0, Some(parent), value.as_bytes())
    }

    fn current(&self) -> Result<Pre> {
        self.open.last().copied().ok_or_else(|| state("no open document"))
    }

    fn push(&mut self, kind: Kind, name: NameId, parent: Option<Pre>, text: &[u8]) -> Result<Pre> {
        let pre = Pre::try_from(self.store.records.len())
            .map_err(|_| Error::new(ErrorKind::InvalidState, "record table is full".to_string()))?;
        let (text_offset, text_len) = text_span(self.store.heap.len(), text.len())?;
        self.store.heap.extend_from_slice(text);
        self.store.records.push(Record {
            kind,
            name,
            dist: parent.map_or(0, |p| pre - p),
            text_offset,
            text_len,
        });
        self.parents.push(parent);
        Ok(pre)
    }
}

/// Heap offset and length of a new text, both addressable as `u32`
fn text_span(offset: usize, len: usize) -> Result<(u32, u32)> {
    let full = || Error::new(ErrorKind::InvalidState, "text heap is full".to_string());
    let text_offset = u32::try_from(offset).map_err(|_| full())?;
    let text_len = u32::try_from(len).map_err(|_| full())?;
    Ok((text_offset, text_len))
}

impl Default for RecordStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn state(context: &str) -> Error {
    Error::new(ErrorKind::InvalidState, context.to_string())
}
