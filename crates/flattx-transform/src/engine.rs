//! Per-record rule dispatch.

use std::sync::Arc;

use flattx_model::{FieldRule, Header, Record};

use crate::context::{LookupResult, TransformContext};
use crate::error::TransformError;
use crate::unique_id::generate_unique_id;

/// Transforms one record positionally against a header.
///
/// Implementations are shared across worker threads and must not hold
/// per-record state.
pub trait RecordTransform: Send + Sync {
    /// Apply the transformation.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::FieldCountMismatch`] when the record width
    /// differs from the header width.
    fn transform(&self, header: &Header, record: Record) -> Result<Record, TransformError>;
}

/// Applies the configured field rules from a shared [`TransformContext`].
#[derive(Debug, Clone)]
pub struct TransformEngine {
    context: Arc<TransformContext>,
}

impl TransformEngine {
    pub fn new(context: Arc<TransformContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &TransformContext {
        &self.context
    }

    fn apply(&self, field: &str, value: &mut String) {
        match self.context.rule_for(field) {
            FieldRule::PassThrough => {}
            FieldRule::ValueLookup => {
                let replacement = match self.context.resolve_lookup(field, value) {
                    LookupResult::Found(target) => Some(target.to_string()),
                    LookupResult::PassThrough(_) => None,
                };
                if let Some(target) = replacement {
                    *value = target;
                }
            }
            FieldRule::DefaultValue(literal) => literal.clone_into(value),
            FieldRule::UniqueId(strategy) => *value = generate_unique_id(*strategy),
        }
    }
}

impl RecordTransform for TransformEngine {
    fn transform(&self, header: &Header, mut record: Record) -> Result<Record, TransformError> {
        if record.len() != header.len() {
            return Err(TransformError::FieldCountMismatch {
                expected: header.len(),
                found: record.len(),
            });
        }
        for (field, value) in header.fields().iter().zip(record.values_mut()) {
            self.apply(field, value);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use flattx_model::{Delimiter, TranslationTable, UniqueIdStrategy};

    fn engine(rules: &str, shared: &str, rows: &[(&str, &str, &str)]) -> TransformEngine {
        let (registry, _) = RegistryBuilder::new()
            .with_field_transformations(rules)
            .unwrap()
            .with_shared_groups(shared)
            .build();
        let mut table = TranslationTable::new();
        for (group, source, target) in rows {
            table.insert(*group, *source, *target);
        }
        TransformEngine::new(Arc::new(TransformContext::new(registry, table)))
    }

    fn run(engine: &TransformEngine, header: &str, line: &str) -> Result<String, TransformError> {
        let header = Header::parse(header, Delimiter::Pipe);
        let record = Record::parse(line, Delimiter::Pipe);
        engine
            .transform(&header, record)
            .map(|out| out.join(Delimiter::Pipe))
    }

    #[test]
    fn value_lookup_replaces_mapped_values() {
        let engine = engine("status:value_translation", "", &[("status", "A", "Active")]);
        assert_eq!(
            run(&engine, "id|status|country", "7|A|US").unwrap(),
            "7|Active|US"
        );
    }

    #[test]
    fn value_lookup_miss_keeps_original() {
        let engine = engine("status:value_translation", "", &[("status", "A", "Active")]);
        assert_eq!(
            run(&engine, "id|status|country", "7|Z|US").unwrap(),
            "7|Z|US"
        );
    }

    #[test]
    fn default_value_ignores_input() {
        let engine = engine("region:default_value:EU", "", &[]);
        assert_eq!(
            run(&engine, "id|name|region", "1|x|anything").unwrap(),
            "1|x|EU"
        );
        assert_eq!(run(&engine, "id|name|region", "2|y|").unwrap(), "2|y|EU");
    }

    #[test]
    fn shared_group_serves_several_fields() {
        let engine = engine(
            "billing:value_translation,shipping:value_translation",
            "billing:country,shipping:country",
            &[("country", "US", "United States"), ("billing", "US", "unused")],
        );
        assert_eq!(
            run(&engine, "billing|shipping", "US|US").unwrap(),
            "United States|United States"
        );
    }

    #[test]
    fn unique_id_replaces_value() {
        let engine = engine("id:unique_id:uuid,name:one_to_one", "", &[]);
        let out = run(&engine, "id|name", "original|bob").unwrap();
        let (id, name) = out.split_once('|').unwrap();
        assert_ne!(id, "original");
        assert_eq!(id.len(), 36);
        assert_eq!(name, "bob");
    }

    #[test]
    fn fields_without_rules_pass_through() {
        let engine = engine("", "", &[("name", "bob", "robert")]);
        assert_eq!(run(&engine, "id|name", "1|bob").unwrap(), "1|bob");
    }

    #[test]
    fn width_mismatch_is_an_error() {
        let engine = engine("region:default_value:EU", "", &[]);
        assert_eq!(
            run(&engine, "id|name|region", "1|x"),
            Err(TransformError::FieldCountMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            run(&engine, "id|name", "1|x|y"),
            Err(TransformError::FieldCountMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn engine_exposes_context() {
        let engine = engine("id:unique_id:incremental", "", &[]);
        assert_eq!(
            engine.context().rule_for("id"),
            &FieldRule::UniqueId(UniqueIdStrategy::Incremental)
        );
    }
}
