pub mod core;
pub mod storage;
pub mod compression;
pub mod analysis;
pub mod index;
pub mod command;

pub use crate::command::{Command, CommandInfo, CreateIndex, DropIndex, Optimize};
pub use crate::core::config::{Config, IndexOptions};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::store::Store;
pub use crate::index::IndexType;

/*
┌──────────────────────────────────────── COMMANDS ────────────────────────────────────────┐
│                                                                                            │
│   CreateIndex ──┐        DropIndex ──┐         Optimize ──────────────────────┐           │
│                 │                    │                                        │           │
│                 ▼                    ▼                                        ▼           │
│        create(type) ───────► drop(type)                     scan: AncestorStack over      │
│            │                                                pre 0..size, feeds tags,      │
│            ▼                                                attribute names, paths        │
│   index::builder::build ◄─────────────────────────────────── then create() per selective  │
│                                                             type present or enabled       │
│   every command: UpdateScope::begin ... finish (flock + meta/updating marker)              │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────────────── STORE ──────────────────────────────────────────┐
│ struct Store                                                                               │
│   storage: StorageLayout      base/records.bin, base/meta/meta.bin, base/idx/<type>.idx   │
│   records: RecordStore        flat pre-order table: kind, name id, dist, text slice        │
│   meta:    MetaData           size, ndocs, height, presence + create flags, dirty/uptodate │
│   indexes: Indexes                                                                         │
│     tags, attribute_names: NameIndex     name id → occurrences + values                    │
│     paths:                 PathIndex     (name id, kind, level) → count                    │
│     text, attributes, tokens: ValueIndex value bytes → roaring postings                    │
│     fulltext:              FullTextIndex fst term dictionary → positional postings         │
└────────────────────────────────────────────────────────────────────────────────────────────┘

Persisted files: crc32 header + bincode(CompressedBlock { lz4 payload }), written to a
temporary file and renamed into place.
*/
