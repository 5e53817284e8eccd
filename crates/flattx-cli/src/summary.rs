use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::TranslateResult;

pub fn print_summary(result: &TranslateResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());

    let summary = &result.summary;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let typed = result.registry.typed_rules + result.registry.listed_lookups;
    table.add_row(vec![Cell::new("Field rules"), Cell::new(typed)]);
    table.add_row(vec![
        Cell::new("Config entries skipped"),
        count_cell(
            result.registry.rule_entries_skipped + result.registry.shared_entries_skipped,
            Color::Yellow,
        ),
    ]);
    match result.table {
        Some(report) => {
            table.add_row(vec![
                Cell::new("Translation rows"),
                Cell::new(report.rows_loaded),
            ]);
            table.add_row(vec![
                Cell::new("Translation rows skipped"),
                count_cell(report.rows_skipped, Color::Yellow),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Translation rows"), dim_cell("-")]);
        }
    }
    table.add_row(vec![Cell::new("Data lines"), Cell::new(summary.data_lines)]);
    table.add_row(vec![
        Cell::new("Written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.written).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Passed through unchanged"),
        count_cell(summary.passed_through, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Dropped"),
        count_cell(summary.skipped, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Diagnostics"),
        count_cell(summary.diagnostics, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.2?}", summary.elapsed)),
    ]);
    println!("{table}");

    if !result.missing_groups.is_empty() {
        eprintln!(
            "Groups missing from the translation table: {}",
            result.missing_groups.join(", ")
        );
    }
    if result.has_diagnostics() {
        eprintln!("Diagnostics written to {}", result.error_log.display());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
