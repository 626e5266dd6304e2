use serde::{Serialize, Deserialize};
use std::fmt;

/// Pre-order position of a record. Stable only until the next structural edit.
pub type Pre = u32;

/// Interned element or attribute name. Id 0 means "no name".
pub type NameId = u32;

/// Record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl Kind {
    /// Kinds that open a stack frame during traversal
    pub fn is_container(&self) -> bool {
        matches!(self, Kind::Document | Kind::Element)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Document => "document",
            Kind::Element => "element",
            Kind::Attribute => "attribute",
            Kind::Text => "text",
            Kind::Comment => "comment",
            Kind::ProcessingInstruction => "processing-instruction",
        };
        f.write_str(name)
    }
}
