//! Group-keyed translation table.

use std::collections::HashMap;

/// Mapping `group -> (source value -> target value)`.
///
/// Built once from a lookup source and then only read. Inserting a
/// `(group, source)` pair that already exists replaces the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    groups: HashMap<String, HashMap<String, String>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Returns the previous target if the pair was present.
    pub fn insert(
        &mut self,
        group: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Option<String> {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(source.into(), target.into())
    }

    pub fn get(&self, group: &str, source: &str) -> Option<&str> {
        self.groups
            .get(group)
            .and_then(|entries| entries.get(source))
            .map(String::as_str)
    }

    /// Resolve a value, returning the original on a miss.
    pub fn translate<'a>(&'a self, group: &str, value: &'a str) -> &'a str {
        self.get(group, value).unwrap_or(value)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of `(group, source)` entries.
    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(HashMap::is_empty)
    }
}
