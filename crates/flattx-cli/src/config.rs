//! TOML run configuration.
//!
//! ```toml
//! inputFilePath = "input.txt"
//! outputFilePath = "output.txt"
//! translationFilePath = "translations.csv"
//! fieldTransformations = "id:unique_id:uuid,status:value_translation,region:default_value:EU"
//! sharedTranslationGroups = "billing:country,shipping:country"
//! fieldsToTranslate = "billing,shipping"
//! errorLogPath = "translation_error.log"
//! delimiter = "|"
//! onFieldCountMismatch = "skip"
//! ```

use std::path::{Path, PathBuf};

use flattx_core::DEFAULT_ERROR_LOG;
use flattx_model::{Delimiter, MismatchPolicy, ProcessingOptions};
use flattx_transform::{FieldRuleRegistry, RegistryBuilder, RegistryReport, RuleSpecError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration is missing `{key}`")]
    MissingPath { key: &'static str },

    #[error(transparent)]
    Rules(#[from] RuleSpecError),
}

/// Settings for one transformation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    pub input_file_path: Option<PathBuf>,
    pub output_file_path: Option<PathBuf>,
    pub translation_file_path: Option<PathBuf>,
    /// Plain list of fields that use value lookup.
    #[serde(default)]
    pub fields_to_translate: String,
    /// `field:group` pairs.
    #[serde(default)]
    pub shared_translation_groups: String,
    /// `field:kind[:param]` entries.
    #[serde(default)]
    pub field_transformations: String,
    pub error_log_path: Option<PathBuf>,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub on_field_count_mismatch: MismatchPolicy,
    pub workers: Option<usize>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub error_log: Option<PathBuf>,
    pub workers: Option<usize>,
}

impl RunConfig {
    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.input.is_some() {
            self.input_file_path = overrides.input;
        }
        if overrides.output.is_some() {
            self.output_file_path = overrides.output;
        }
        if overrides.error_log.is_some() {
            self.error_log_path = overrides.error_log;
        }
        if overrides.workers.is_some() {
            self.workers = overrides.workers;
        }
        self
    }

    pub fn input_path(&self) -> Result<&Path, ConfigError> {
        self.input_file_path
            .as_deref()
            .ok_or(ConfigError::MissingPath {
                key: "inputFilePath",
            })
    }

    pub fn output_path(&self) -> Result<&Path, ConfigError> {
        self.output_file_path
            .as_deref()
            .ok_or(ConfigError::MissingPath {
                key: "outputFilePath",
            })
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.error_log_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG))
    }

    pub fn processing_options(&self) -> ProcessingOptions {
        ProcessingOptions::new()
            .with_delimiter(self.delimiter)
            .with_mismatch_policy(self.on_field_count_mismatch)
            .with_workers(self.workers)
    }

    /// Unify the three rule layouts into one registry.
    ///
    /// # Errors
    ///
    /// Fails on an unknown rule kind or a `default_value` without a value.
    pub fn build_registry(&self) -> Result<(FieldRuleRegistry, RegistryReport), ConfigError> {
        let registry = RegistryBuilder::new()
            .with_field_transformations(&self.field_transformations)?
            .with_fields_to_translate(&self.fields_to_translate)
            .with_shared_groups(&self.shared_translation_groups)
            .build();
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flattx_model::FieldRule;

    fn parse(contents: &str) -> Result<RunConfig, ConfigError> {
        RunConfig::parse(contents, Path::new("test.toml"))
    }

    #[test]
    fn parses_full_configuration() {
        let config = parse(
            r#"
            inputFilePath = "in.txt"
            outputFilePath = "out.txt"
            translationFilePath = "table.csv"
            fieldsToTranslate = "billing"
            sharedTranslationGroups = "billing:country"
            fieldTransformations = "status:value_translation"
            errorLogPath = "errors.log"
            delimiter = ","
            onFieldCountMismatch = "pass_through"
            workers = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.input_path().unwrap(), Path::new("in.txt"));
        assert_eq!(config.error_log_path(), PathBuf::from("errors.log"));
        let options = config.processing_options();
        assert_eq!(options.delimiter, Delimiter::Comma);
        assert_eq!(options.mismatch_policy, MismatchPolicy::PassThrough);
        assert_eq!(options.workers, Some(3));
    }

    #[test]
    fn defaults_apply() {
        let config = parse("").unwrap();
        assert_eq!(config.delimiter, Delimiter::Pipe);
        assert_eq!(config.on_field_count_mismatch, MismatchPolicy::Skip);
        assert_eq!(config.error_log_path(), PathBuf::from(DEFAULT_ERROR_LOG));
        assert!(matches!(
            config.input_path(),
            Err(ConfigError::MissingPath {
                key: "inputFilePath"
            })
        ));
    }

    #[test]
    fn rejects_invalid_delimiter_and_unknown_keys() {
        assert!(matches!(
            parse(r#"delimiter = ";""#),
            Err(ConfigError::Toml { .. })
        ));
        assert!(matches!(
            parse(r#"inputFile = "x""#),
            Err(ConfigError::Toml { .. })
        ));
        assert!(matches!(
            parse(r#"onFieldCountMismatch = "pad""#),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn mismatch_policy_spellings() {
        for (text, expected) in [
            ("skip", MismatchPolicy::Skip),
            ("SKIP", MismatchPolicy::Skip),
            ("pass_through", MismatchPolicy::PassThrough),
            ("PASS_THROUGH", MismatchPolicy::PassThrough),
            ("passthrough", MismatchPolicy::PassThrough),
        ] {
            let config = parse(&format!("onFieldCountMismatch = {text:?}")).unwrap();
            assert_eq!(config.on_field_count_mismatch, expected, "{text}");
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let config = parse(r#"inputFilePath = "a.txt""#)
            .unwrap()
            .with_overrides(Overrides {
                input: Some(PathBuf::from("b.txt")),
                output: Some(PathBuf::from("c.txt")),
                ..Overrides::default()
            });
        assert_eq!(config.input_path().unwrap(), Path::new("b.txt"));
        assert_eq!(config.output_path().unwrap(), Path::new("c.txt"));
    }

    #[test]
    fn builds_unified_registry() {
        let config = parse(
            r#"
            fieldsToTranslate = "status,region"
            fieldTransformations = "region:default_value:EU"
            "#,
        )
        .unwrap();
        let (registry, report) = config.build_registry().unwrap();
        assert_eq!(registry.rule_for("status"), &FieldRule::ValueLookup);
        assert_eq!(
            registry.rule_for("region"),
            &FieldRule::DefaultValue("EU".to_string())
        );
        assert_eq!(report.listed_overridden, 1);
    }

    #[test]
    fn unknown_kind_is_a_configuration_error() {
        let config = parse(r#"fieldTransformations = "status:shuffle""#).unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Rules(RuleSpecError::UnknownKind { .. }))
        ));
    }
}
