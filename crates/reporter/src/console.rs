use analytics::PerformanceReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::WeightTable;

/// Decimal places used when no precision is configured.
pub const DEFAULT_PRECISION: usize = 4;

/// Formats a statistic, rendering an undefined value as `NaN`.
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "NaN".to_string(),
    }
}

/// One `name: value` line per statistic, in reporting order.
pub fn report_lines(report: &PerformanceReport) -> Vec<String> {
    report_lines_with_precision(report, DEFAULT_PRECISION)
}

pub fn report_lines_with_precision(report: &PerformanceReport, precision: usize) -> Vec<String> {
    report
        .metrics()
        .iter()
        .map(|(name, value)| format!("{}: {}", name, format_value(*value, precision)))
        .collect()
}

/// A two-column table of every statistic plus the sample size.
pub fn summary_table(report: &PerformanceReport, precision: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        Cell::new("periods"),
        Cell::new(report.periods).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("periods_per_year"),
        Cell::new(report.periods_per_year).set_alignment(CellAlignment::Right),
    ]);
    for (name, value) in report.metrics() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format_value(value, precision)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("downside_volatility"),
        Cell::new(format_value(report.downside_volatility, precision))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Prints the report lines followed by the summary table.
pub fn print_report(title: &str, report: &PerformanceReport, precision: usize) {
    println!("{}", title);
    for line in report_lines_with_precision(report, precision) {
        println!("{}", line);
    }
    println!();
    println!("{}", summary_table(report, precision));
}

/// The last `rows` fully defined rows of a weight table, oldest first.
pub fn weights_table(weights: &WeightTable, rows: usize, precision: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Date".to_string()];
    header.extend(weights.columns().iter().cloned());
    table.set_header(header);

    let mut defined: Vec<usize> = (0..weights.nrows())
        .rev()
        .filter(|&t| weights.row_is_defined(t))
        .take(rows)
        .collect();
    defined.reverse();

    for t in defined {
        let mut cells = vec![Cell::new(weights.index()[t])];
        cells.extend(weights.row(t).into_iter().map(|w| {
            Cell::new(format_value(Some(w), precision)).set_alignment(CellAlignment::Right)
        }));
        table.add_row(cells);
    }
    table
}
