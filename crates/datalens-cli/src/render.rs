//! Terminal rendering of dataset summaries.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use datalens_common::{format_hms, format_numeric};
use datalens_model::{
    ColumnStats, ColumnSummary, DatasetSummary, NumericStats, Stat,
};

/// Missing rate above which a column is highlighted.
const MISSING_CAUTION: f64 = 0.2;

pub fn print_summary(summary: &DatasetSummary) {
    println!("Dataset: {}", summary.name);
    println!(
        "Rows: {}  Columns: {}",
        summary.row_count, summary.column_count
    );
    println!("{}", summary_table(summary));
    if let Some(table) = sample_table(summary) {
        println!();
        println!("Sample:");
        println!("{table}");
    }
    let cautions: Vec<&ColumnSummary> = summary.cautions(MISSING_CAUTION).collect();
    if !cautions.is_empty() {
        println!();
        println!("Cautions:");
        for column in cautions {
            println!("- {}: {}", column.name, caution_text(column));
        }
    }
}

/// One row per column: name, kind, missing and statistics.
pub fn summary_table(summary: &DatasetSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Missing"),
        header_cell("Statistics"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &summary.columns {
        table.add_row(vec![
            name_cell(column),
            Cell::new(column.kind),
            missing_cell(column),
            Cell::new(stats_text(&column.stats)),
        ]);
    }
    table
}

fn sample_table(summary: &DatasetSummary) -> Option<Table> {
    if summary.sample_rows.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(
        summary
            .columns
            .iter()
            .map(|column| header_cell(&column.name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in &summary.sample_rows {
        table.add_row(row.iter().map(|value| {
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            }
        }));
    }
    Some(table)
}

/// Statistics rendered on one line.
pub fn stats_text(stats: &ColumnStats) -> String {
    match stats {
        ColumnStats::Numeric(numeric) => numeric_text(numeric, &stat_text),
        ColumnStats::Duration(duration) => numeric_text(&duration.seconds, &|stat| {
            stat.value()
                .and_then(format_hms)
                .unwrap_or_else(|| "-".to_string())
        }),
        ColumnStats::Datetime(datetime) => match (datetime.min, datetime.max) {
            (Some(min), Some(max)) => format!(
                "{} .. {}, {} distinct",
                min.format("%Y-%m-%d %H:%M:%S"),
                max.format("%Y-%m-%d %H:%M:%S"),
                datetime.distinct_count
            ),
            _ => "no values".to_string(),
        },
        ColumnStats::Boolean(boolean) => {
            format!("true {}, false {}", boolean.true_count, boolean.false_count)
        }
        ColumnStats::Frequency(frequency) => {
            let top: Vec<String> = frequency
                .top_values
                .iter()
                .map(|value| format!("{} ({})", value.value, value.count))
                .collect();
            if top.is_empty() {
                "no values".to_string()
            } else {
                format!("{} distinct, top: {}", frequency.distinct_count, top.join(", "))
            }
        }
    }
}

fn numeric_text(stats: &NumericStats, render: &dyn Fn(Stat) -> String) -> String {
    if stats.count == 0 {
        return "no values".to_string();
    }
    format!(
        "mean {}, median {}, sd {}, min {}, max {}",
        render(stats.mean),
        render(stats.median),
        render(stats.std_dev),
        render(stats.min),
        render(stats.max)
    )
}

fn stat_text(stat: Stat) -> String {
    stat.value()
        .map_or_else(|| "-".to_string(), |value| format_numeric(round(value)))
}

/// Four decimals is enough for a terminal.
fn round(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn caution_text(column: &ColumnSummary) -> String {
    match &column.warning {
        Some(warning) => format!(
            "{} of {} values ({:.1}%) dropped as {} (e.g. {})",
            warning.dropped,
            warning.total,
            warning.dropped_rate() * 100.0,
            warning.kind,
            warning.examples.join(", ")
        ),
        None => format!("{:.1}% missing", column.missing_rate * 100.0),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(column: &ColumnSummary) -> Cell {
    if column.role.is_helper() {
        Cell::new(&column.name).fg(Color::DarkGrey)
    } else {
        Cell::new(&column.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn missing_cell(column: &ColumnSummary) -> Cell {
    let text = format!(
        "{} ({:.1}%)",
        column.missing_count,
        column.missing_rate * 100.0
    );
    if column.missing_count == 0 {
        dim_cell(text)
    } else if column.needs_caution(MISSING_CAUTION) {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
