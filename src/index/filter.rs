use regex::Regex;
use crate::core::error::Result;

/// Include list for element/attribute names.
/// Comma-separated entries, `*` matches any run of characters. Empty matches all.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    patterns: Vec<Regex>,
}

impl NameFilter {
    pub fn parse(names: &str) -> Result<Self> {
        let patterns = names
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let pattern = regex::escape(entry).replace("\\*", ".*");
                Regex::new(&format!("^{}$", pattern))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(NameFilter { patterns })
    }

    pub fn matches_all(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matches_all() || self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_matches_everything() {
        let filter = NameFilter::parse(" , ").unwrap();
        assert!(filter.matches_all());
        assert!(filter.matches("anything"));
        assert!(filter.matches(""));
    }

    #[test]
    fn matches_names_and_wildcards() {
        let filter = NameFilter::parse("title, *:name, a.b").unwrap();
        assert!(filter.matches("title"));
        assert!(filter.matches("dc:name"));
        assert!(filter.matches("a.b"));
        assert!(!filter.matches("axb"));
        assert!(!filter.matches("subtitle"));
        assert!(!filter.matches(""));
    }
}
