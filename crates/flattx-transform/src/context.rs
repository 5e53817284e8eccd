//! Immutable transformation context.
//!
//! Built once per run from configuration, then shared read-only by every
//! worker through an `Arc`.

use std::collections::BTreeSet;

use flattx_model::{FieldRule, TranslationTable};

use crate::registry::{FieldRuleRegistry, RegistryReport};

/// Rule registry and translation table for one run.
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    registry: FieldRuleRegistry,
    table: TranslationTable,
}

impl TransformContext {
    pub fn new(registry: FieldRuleRegistry, table: TranslationTable) -> Self {
        Self { registry, table }
    }

    pub fn registry(&self) -> &FieldRuleRegistry {
        &self.registry
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn rule_for(&self, field: &str) -> &FieldRule {
        self.registry.rule_for(field)
    }

    /// Look up a value for a field in its translation group.
    pub fn resolve_lookup<'a>(&'a self, field: &'a str, value: &'a str) -> LookupResult<'a> {
        let group = self.registry.lookup_group(field);
        match self.table.get(group, value) {
            Some(target) => LookupResult::Found(target),
            None => LookupResult::PassThrough(value),
        }
    }

    /// Lookup groups referenced by rules but absent from the table.
    pub fn missing_groups(&self) -> Vec<String> {
        let missing: BTreeSet<&str> = self
            .registry
            .sorted_rules()
            .into_iter()
            .filter(|(_, rule)| matches!(rule, FieldRule::ValueLookup))
            .map(|(field, _)| self.registry.lookup_group(field))
            .filter(|group| !self.table.contains_group(group))
            .collect();
        missing.into_iter().map(str::to_string).collect()
    }

    /// One-line description for logging a freshly built context.
    pub fn describe(&self, report: &RegistryReport) -> String {
        format!(
            "{} rules ({} typed, {} listed), {} shared groups, {} table entries in {} groups",
            self.registry.len(),
            report.typed_rules,
            report.listed_lookups,
            report.shared_groups,
            self.table.len(),
            self.table.group_count()
        )
    }
}

/// Result of a value lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult<'a> {
    /// Mapped target value.
    Found(&'a str),
    /// No mapping; the original value is kept.
    PassThrough(&'a str),
}

impl LookupResult<'_> {
    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}
