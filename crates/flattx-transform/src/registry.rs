//! Field rule registry and its builder.
//!
//! Three configuration layouts feed the registry:
//!
//! - `fieldTransformations`: `field:kind[:param]` entries, comma separated
//! - `fieldsToTranslate`: a plain list of fields that use value lookup
//! - `sharedTranslationGroups`: `field:group` entries letting several fields
//!   read one translation group
//!
//! The typed entries always win: a field listed in both `fieldTransformations`
//! and `fieldsToTranslate` keeps its typed rule. Repeated entries within one
//! layout are last-write-wins.

use std::collections::{BTreeMap, HashMap};

use flattx_model::{FieldRule, RuleKind, UniqueIdStrategy};
use tracing::warn;

use crate::error::RuleSpecError;

const ENTRY_SEPARATOR: char = ',';
const PART_SEPARATOR: char = ':';

static PASS_THROUGH: FieldRule = FieldRule::PassThrough;

/// Immutable per-field rule lookup.
#[derive(Debug, Clone, Default)]
pub struct FieldRuleRegistry {
    rules: HashMap<String, FieldRule>,
    shared_groups: HashMap<String, String>,
}

impl FieldRuleRegistry {
    /// Rule for a field, `PassThrough` when none was assigned.
    pub fn rule_for(&self, field: &str) -> &FieldRule {
        self.rules.get(field).unwrap_or(&PASS_THROUGH)
    }

    /// Translation group for a field: its shared group, or its own name.
    pub fn lookup_group<'a>(&'a self, field: &'a str) -> &'a str {
        self.shared_groups.get(field).map_or(field, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True if any field uses value lookup.
    pub fn uses_lookup(&self) -> bool {
        self.rules
            .values()
            .any(|rule| matches!(rule, FieldRule::ValueLookup))
    }

    /// True if every assigned rule is deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.rules.values().all(FieldRule::is_deterministic)
    }

    /// Rules sorted by field name, for display.
    pub fn sorted_rules(&self) -> Vec<(&str, &FieldRule)> {
        let ordered: BTreeMap<&str, &FieldRule> = self
            .rules
            .iter()
            .map(|(field, rule)| (field.as_str(), rule))
            .collect();
        ordered.into_iter().collect()
    }

    /// Shared group assignments sorted by field name, for display.
    pub fn sorted_shared_groups(&self) -> Vec<(&str, &str)> {
        let ordered: BTreeMap<&str, &str> = self
            .shared_groups
            .iter()
            .map(|(field, group)| (field.as_str(), group.as_str()))
            .collect();
        ordered.into_iter().collect()
    }
}

/// Counts gathered while building a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryReport {
    /// Fields with an explicit typed rule.
    pub typed_rules: usize,
    /// Fields that received `ValueLookup` from the plain field list.
    pub listed_lookups: usize,
    /// Listed fields ignored because a typed rule already exists.
    pub listed_overridden: usize,
    /// Rule entries skipped for missing a kind or field name.
    pub rule_entries_skipped: usize,
    /// Shared group assignments.
    pub shared_groups: usize,
    /// Shared group entries skipped for not being `field:group`.
    pub shared_entries_skipped: usize,
}

/// Collects rule configuration and produces a [`FieldRuleRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    typed: HashMap<String, FieldRule>,
    listed: Vec<String>,
    shared_groups: HashMap<String, String>,
    report: RegistryReport,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `field:kind[:param]` entries.
    ///
    /// Field names, kinds and parameters are trimmed, so a `default_value`
    /// literal never starts or ends with whitespace. Entries without a field
    /// name or kind are skipped and counted.
    ///
    /// # Errors
    ///
    /// Fails on an unknown kind token or a `default_value` without a value.
    pub fn with_field_transformations(mut self, list: &str) -> Result<Self, RuleSpecError> {
        for entry in entries(list) {
            let mut parts = entry.splitn(3, PART_SEPARATOR);
            let field = parts.next().unwrap_or_default().trim();
            let Some(kind) = parts.next().map(str::trim).filter(|kind| !kind.is_empty()) else {
                warn!(entry, "skipping transformation entry without a kind");
                self.report.rule_entries_skipped += 1;
                continue;
            };
            if field.is_empty() {
                warn!(entry, "skipping transformation entry without a field name");
                self.report.rule_entries_skipped += 1;
                continue;
            }
            let kind: RuleKind = kind.parse().map_err(|source| RuleSpecError::UnknownKind {
                entry: entry.to_string(),
                source,
            })?;
            let rule = build_rule(field, kind, parts.next())?;
            self.typed.insert(field.to_string(), rule);
        }
        Ok(self)
    }

    /// Add a plain comma-separated list of fields that use value lookup.
    pub fn with_fields_to_translate(mut self, list: &str) -> Self {
        self.listed.extend(entries(list).map(str::to_string));
        self
    }

    /// Parse `field:group` shared translation group entries.
    pub fn with_shared_groups(mut self, list: &str) -> Self {
        for entry in entries(list) {
            let parts: Vec<&str> = entry.split(PART_SEPARATOR).map(str::trim).collect();
            match parts.as_slice() {
                [field, group] if !field.is_empty() && !group.is_empty() => {
                    self.shared_groups
                        .insert((*field).to_string(), (*group).to_string());
                }
                _ => {
                    warn!(entry, "skipping malformed shared group entry");
                    self.report.shared_entries_skipped += 1;
                }
            }
        }
        self
    }

    pub fn build(self) -> (FieldRuleRegistry, RegistryReport) {
        let Self {
            mut typed,
            listed,
            shared_groups,
            mut report,
        } = self;

        report.typed_rules = typed.len();
        for field in listed {
            if typed.contains_key(&field) {
                report.listed_overridden += 1;
                continue;
            }
            typed.insert(field, FieldRule::ValueLookup);
            report.listed_lookups += 1;
        }
        report.shared_groups = shared_groups.len();

        let registry = FieldRuleRegistry {
            rules: typed,
            shared_groups,
        };
        (registry, report)
    }
}

fn entries(list: &str) -> impl Iterator<Item = &str> {
    list.split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn build_rule(
    field: &str,
    kind: RuleKind,
    param: Option<&str>,
) -> Result<FieldRule, RuleSpecError> {
    let rule = match kind {
        RuleKind::OneToOne => FieldRule::PassThrough,
        RuleKind::ValueTranslation => FieldRule::ValueLookup,
        RuleKind::DefaultValue => {
            let value = param.ok_or_else(|| RuleSpecError::MissingDefault {
                field: field.to_string(),
            })?;
            FieldRule::DefaultValue(value.trim().to_string())
        }
        RuleKind::UniqueId => FieldRule::UniqueId(UniqueIdStrategy::from_param(param)),
    };
    Ok(rule)
}
