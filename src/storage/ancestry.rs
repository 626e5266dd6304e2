use crate::core::types::{NameId, Pre};

/// Open ancestors during a forward pre-order scan.
///
/// Two parallel stacks: the pre value of each open document/element and the
/// element name it contributes (0 for documents). `level` is the number of
/// open ancestors and is the depth of the record being visited.
#[derive(Debug, Default)]
pub struct AncestorStack {
    parents: Vec<Pre>,
    names: Vec<NameId>,
}

impl AncestorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes every ancestor whose subtree ended before the record whose
    /// parent is `parent`, and returns the resulting level.
    pub fn close_until(&mut self, parent: Option<Pre>) -> usize {
        while let Some(&top) = self.parents.last() {
            if Some(top) > parent {
                self.parents.pop();
                self.names.pop();
            } else {
                break;
            }
        }
        self.parents.len()
    }

    pub fn open(&mut self, pre: Pre, name: NameId) {
        self.parents.push(pre);
        self.names.push(name);
    }

    pub fn level(&self) -> usize {
        self.parents.len()
    }

    /// Innermost open ancestor
    pub fn parent(&self) -> Option<Pre> {
        self.parents.last().copied()
    }

    /// Name of the innermost open element; 0 under a document root
    pub fn owner(&self) -> NameId {
        self.names.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_closed_subtrees() {
        let mut stack = AncestorStack::new();
        assert_eq!(stack.close_until(None), 0);
        stack.open(0, 0);
        assert_eq!(stack.close_until(Some(0)), 1);
        stack.open(1, 7);
        stack.open(2, 8);
        assert_eq!(stack.owner(), 8);

        // sibling of 1
        assert_eq!(stack.close_until(Some(0)), 1);
        assert_eq!(stack.parent(), Some(0));
        assert_eq!(stack.owner(), 0);

        // next document
        assert_eq!(stack.close_until(None), 0);
        assert_eq!(stack.parent(), None);
    }
}
