#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use treedex::storage::records::{RecordStore, RecordStoreBuilder};

/// `<a id="1">hello</a><b/>` under one document
pub fn sample_records() -> RecordStore {
    let mut b = RecordStoreBuilder::new();
    b.open_document().unwrap();
    b.open_element("a").unwrap();
    b.attribute("id", "1").unwrap();
    b.text("hello").unwrap();
    b.close().unwrap();
    b.open_element("b").unwrap();
    b.close().unwrap();
    b.close().unwrap();
    b.finish().unwrap()
}

/// A few documents with texts, attributes and comments
pub fn library_records() -> RecordStore {
    let mut b = RecordStoreBuilder::new();
    for (title, author, text) in [
        ("Trees", "ana lee", "Running through the trees"),
        ("Stacks", "bo", "A stack of running records"),
        ("Paths", "ana", "Paths lead to trees"),
    ] {
        b.open_document().unwrap();
        b.open_element("book").unwrap();
        b.attribute("author", author).unwrap();
        b.open_element("title").unwrap();
        b.text(title).unwrap();
        b.close().unwrap();
        b.comment("body follows").unwrap();
        b.open_element("body").unwrap();
        b.text(text).unwrap();
        b.close().unwrap();
        b.close().unwrap();
        b.close().unwrap();
    }
    b.finish().unwrap()
}

/// Random forest of documents; returns the table and the parent of every record
/// as recorded while building it.
pub fn random_records(seed: u64, docs: usize) -> (RecordStore, Vec<Option<u32>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let names = ["a", "b", "c", "item", "x:y"];
    let mut b = RecordStoreBuilder::new();

    for _ in 0..docs {
        b.open_document().unwrap();
        let mut depth = 0;
        let steps = rng.gen_range(0..60);
        for _ in 0..steps {
            match rng.gen_range(0..10) {
                0..=3 if depth < 12 => {
                    b.open_element(names[rng.gen_range(0..names.len())]).unwrap();
                    if rng.gen_bool(0.5) {
                        b.attribute(names[rng.gen_range(0..names.len())], "v w").unwrap();
                    }
                    depth += 1;
                }
                4..=5 if depth > 0 => {
                    b.close().unwrap();
                    depth -= 1;
                }
                6 => {
                    b.comment("c").unwrap();
                }
                7 => {
                    b.processing_instruction("pi").unwrap();
                }
                _ => {
                    b.text("some text").unwrap();
                }
            }
        }
        for _ in 0..depth {
            b.close().unwrap();
        }
        b.close().unwrap();
    }

    let parents = b.ground_truth().to_vec();
    (b.finish().unwrap(), parents)
}
