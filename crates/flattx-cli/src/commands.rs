use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use flattx_core::{DiagnosticsSink, LineProcessor};
use flattx_ingest::{TableLoadReport, load_translation_table};
use flattx_model::{FieldRule, TranslationTable};
use flattx_transform::{FieldRuleRegistry, TransformContext, TransformEngine};

use crate::cli::{RulesArgs, TranslateArgs};
use crate::config::{ConfigError, Overrides, RunConfig};
use crate::summary::apply_table_style;
use crate::types::TranslateResult;

pub fn run_translate(args: &TranslateArgs) -> Result<TranslateResult> {
    let span = info_span!("translate", config = %args.config.display());
    let _guard = span.enter();

    let overrides = Overrides {
        input: args.input.clone(),
        output: args.output.clone(),
        error_log: args.error_log.clone(),
        workers: args.workers,
    };
    // Configuration failures still land in the diagnostics log; before the
    // file is parsed only the command-line path or the default is known.
    let config = match RunConfig::load(&args.config) {
        Ok(config) => config.with_overrides(overrides),
        Err(error) => {
            let fallback = RunConfig::default().with_overrides(overrides);
            return Err(record_config_error(&fallback, error));
        }
    };
    let error_log = config.error_log_path();
    let sink = Arc::new(DiagnosticsSink::new(&error_log));

    let (input, output) = match (config.input_path(), config.output_path()) {
        (Ok(input), Ok(output)) => (input.to_path_buf(), output.to_path_buf()),
        (Err(error), _) | (_, Err(error)) => return Err(record_error(&sink, error)),
    };
    let (registry, registry_report) = config
        .build_registry()
        .map_err(|error| record_error(&sink, error))?;

    let (table, table_report) = load_table(&config, &registry, &sink);
    let context = TransformContext::new(registry, table);
    info!("{}", context.describe(&registry_report));
    let missing_groups = context.missing_groups();
    for group in &missing_groups {
        warn!(group = %group, "translation group not present in table; values pass through");
    }

    let engine = TransformEngine::new(Arc::new(context));
    let mut processor = LineProcessor::new(
        Arc::new(engine),
        config.processing_options(),
        Arc::clone(&sink),
    );
    let summary = processor
        .process_file(&input, &output)
        .map_err(|error| {
            sink.record(&error.to_string());
            error
        })
        .with_context(|| format!("transform {}", input.display()))?;

    Ok(TranslateResult {
        input,
        output,
        error_log,
        registry: registry_report,
        table: table_report,
        missing_groups,
        summary,
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let (registry, report) = config.build_registry()?;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Rule", "Parameter", "Lookup group"]);
    apply_table_style(&mut table);
    for (field, rule) in registry.sorted_rules() {
        let parameter = match rule {
            FieldRule::DefaultValue(value) => format!("{value:?}"),
            FieldRule::UniqueId(strategy) => strategy.display_name().to_string(),
            FieldRule::PassThrough | FieldRule::ValueLookup => "-".to_string(),
        };
        let group = if matches!(rule, FieldRule::ValueLookup) {
            registry.lookup_group(field).to_string()
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            field.to_string(),
            rule.display_name().to_string(),
            parameter,
            group,
        ]);
    }
    println!("{table}");

    let shared = registry.sorted_shared_groups();
    if !shared.is_empty() {
        let mut groups = Table::new();
        groups.set_header(vec!["Field", "Shared group"]);
        apply_table_style(&mut groups);
        for (field, group) in shared {
            groups.add_row(vec![field, group]);
        }
        println!("{groups}");
    }
    println!(
        "{} typed rules, {} listed lookups ({} overridden), {} entries skipped",
        report.typed_rules,
        report.listed_lookups,
        report.listed_overridden,
        report.rule_entries_skipped + report.shared_entries_skipped
    );
    if !registry.is_deterministic() {
        println!("Output includes generated unique ids and differs between runs.");
    }
    Ok(())
}

/// Load the configured table, degrading to an empty one on failure.
fn load_table(
    config: &RunConfig,
    registry: &FieldRuleRegistry,
    sink: &DiagnosticsSink,
) -> (TranslationTable, Option<TableLoadReport>) {
    let Some(path) = config.translation_file_path.as_deref() else {
        if registry.uses_lookup() {
            warn!("no translationFilePath configured; value lookups pass through");
        }
        return (TranslationTable::new(), None);
    };
    match load_translation_table(path) {
        Ok((table, report)) => {
            info!(
                path = %path.display(),
                rows = report.rows_loaded,
                skipped = report.rows_skipped,
                groups = report.groups,
                "translation table loaded"
            );
            (table, Some(report))
        }
        Err(error) => {
            sink.record(&format!(
                "{error}; continuing with an empty translation table"
            ));
            (TranslationTable::new(), None)
        }
    }
}

fn record_config_error(config: &RunConfig, error: ConfigError) -> anyhow::Error {
    let sink = DiagnosticsSink::new(config.error_log_path());
    record_error(&sink, error)
}

fn record_error(sink: &DiagnosticsSink, error: ConfigError) -> anyhow::Error {
    sink.record(&error.to_string());
    anyhow::Error::new(error).context("invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn args(config: &Path) -> TranslateArgs {
        TranslateArgs {
            config: config.to_path_buf(),
            input: None,
            output: None,
            error_log: None,
            workers: Some(2),
        }
    }

    #[test]
    fn unreadable_table_degrades_to_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("in.txt"), "id|status\n1|A\n").unwrap();
        let config = root.join("run.toml");
        fs::write(
            &config,
            format!(
                "inputFilePath = {:?}\noutputFilePath = {:?}\ntranslationFilePath = {:?}\n\
                 errorLogPath = {:?}\nfieldTransformations = \"status:value_translation\"\n",
                root.join("in.txt"),
                root.join("out.txt"),
                root.join("missing.csv"),
                root.join("errors.log"),
            ),
        )
        .unwrap();

        let result = run_translate(&args(&config)).unwrap();

        assert_eq!(
            fs::read_to_string(root.join("out.txt")).unwrap(),
            "id|status\n1|A\n"
        );
        assert!(result.table.is_none());
        assert_eq!(result.missing_groups, vec!["status".to_string()]);
        let log = fs::read_to_string(root.join("errors.log")).unwrap();
        assert!(log.contains("missing.csv"));
    }

    #[test]
    fn configuration_error_produces_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("in.txt"), "id\n1\n").unwrap();
        let config = root.join("run.toml");
        fs::write(
            &config,
            format!(
                "inputFilePath = {:?}\noutputFilePath = {:?}\nerrorLogPath = {:?}\n\
                 fieldTransformations = \"id:scramble\"\n",
                root.join("in.txt"),
                root.join("out.txt"),
                root.join("errors.log"),
            ),
        )
        .unwrap();

        let err = run_translate(&args(&config)).unwrap_err();

        assert!(format!("{err:#}").contains("id:scramble"));
        assert!(!root.join("out.txt").exists());
        let log = fs::read_to_string(root.join("errors.log")).unwrap();
        assert!(log.contains("id:scramble"));
    }
}
