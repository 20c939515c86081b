use crate::error::ReportError;
use analytics::EquityCurve;
use core_types::Series;
use plotly::common::{Fill, Line, Mode, Title};
use plotly::common::AxisSide;
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use std::fs;
use std::path::Path;

fn date_labels(series: &Series) -> Vec<String> {
    series.index().iter().map(|d| d.to_string()).collect()
}

/// Writes the cumulative return, its running maximum and the shaded drawdown of
/// an equity curve as a standalone HTML chart.
pub fn write_drawdown_chart(
    curve: &EquityCurve,
    title: &str,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    if curve.is_empty() {
        return Err(ReportError::NothingToPlot("equity curve is empty".to_string()));
    }
    let n = curve.len();
    if curve.cumulative.len() != n || curve.running_max.len() != n || curve.drawdown.len() != n {
        return Err(ReportError::Mismatch(format!(
            "equity curve has {} dates but {}/{}/{} values",
            n,
            curve.cumulative.len(),
            curve.running_max.len(),
            curve.drawdown.len()
        )));
    }

    let x: Vec<String> = curve.index.iter().map(|d| d.to_string()).collect();
    let cumulative: Vec<f64> = curve.cumulative.iter().map(|c| c - 1.0).collect();
    let running_max: Vec<f64> = curve.running_max.iter().map(|m| m - 1.0).collect();
    let drawdown: Vec<f64> = curve.drawdown.iter().map(|d| -d).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(x.clone(), cumulative)
            .name("Cumulative Returns")
            .mode(Mode::Lines),
    );
    plot.add_trace(
        Scatter::new(x.clone(), running_max)
            .name("Cumulative Max")
            .mode(Mode::Lines)
            .line(Line::new().width(0.5)),
    );
    plot.add_trace(
        Scatter::new(x, drawdown)
            .name("Drawdowns")
            .mode(Mode::Lines)
            .fill(Fill::ToZeroY)
            .fill_color("rgba(255, 0, 0, 0.5)")
            .line(Line::new().color("red").width(0.5)),
    );

    let layout = Layout::new()
        .title(Title::from(title))
        .x_axis(Axis::new().show_grid(true))
        .y_axis(Axis::new().tick_format(".0%"));
    plot.set_layout(layout);

    write_plot(&plot, path.as_ref())
}

/// Writes cumulative growth on the primary axis and a rolling annualized mean
/// return on a secondary axis.
pub fn write_rolling_mean_chart(
    cumulative: &Series,
    rolling: &Series,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    if cumulative.is_empty() || rolling.is_empty() {
        return Err(ReportError::NothingToPlot(format!(
            "'{}' or '{}' has no observations",
            cumulative.name, rolling.name
        )));
    }

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(date_labels(cumulative), cumulative.values().to_vec())
            .name(cumulative.name.as_str())
            .mode(Mode::Lines),
    );
    plot.add_trace(
        Scatter::new(date_labels(rolling), rolling.values().to_vec())
            .name(rolling.name.as_str())
            .mode(Mode::Lines)
            .y_axis("y2")
            .line(Line::new().color("#d62728")),
    );

    let layout = Layout::new()
        .title(Title::from(rolling.name.as_str()))
        .y_axis(Axis::new().title(Title::from("Cumulative return")))
        .y_axis2(
            Axis::new()
                .title(Title::from("Rolling annualized mean"))
                .overlaying("y")
                .side(AxisSide::Right)
                .tick_format(".0%"),
        );
    plot.set_layout(layout);

    write_plot(&plot, path.as_ref())
}

fn write_plot(plot: &Plot, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    plot.write_html(path);
    tracing::info!(path = %path.display(), "Wrote chart.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        (0..n as u64).map(|i| start + Days::new(i)).collect()
    }

    fn curve() -> EquityCurve {
        EquityCurve {
            index: dates(3),
            cumulative: vec![1.0, 1.1, 0.99],
            running_max: vec![1.0, 1.1, 1.1],
            drawdown: vec![0.0, 0.0, 0.1],
        }
    }

    #[test]
    fn drawdown_chart_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("risk_parity_returns.html");

        write_drawdown_chart(&curve(), "Cumulative Returns of Risk-Parity Portfolio", &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Cumulative Returns of Risk-Parity Portfolio"));
        assert!(html.contains("Drawdowns"));
    }

    #[test]
    fn ragged_curve_is_rejected() {
        let mut ragged = curve();
        ragged.drawdown.pop();
        let dir = tempfile::tempdir().unwrap();
        let result = write_drawdown_chart(&ragged, "t", dir.path().join("c.html"));
        assert!(matches!(result, Err(ReportError::Mismatch(_))));
    }

    #[test]
    fn rolling_mean_chart_plots_both_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolling_1y.html");
        let cumulative = Series::new("ES=F cumulative", dates(3), vec![1.0, 1.02, 1.01]).unwrap();
        let rolling = Series::new("ES=F rolling 2", dates(3), vec![f64::NAN, 0.5, 0.25]).unwrap();

        write_rolling_mean_chart(&cumulative, &rolling, &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("ES=F cumulative"));
        assert!(html.contains("ES=F rolling 2"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let empty = Series::new("empty", vec![], vec![]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = write_rolling_mean_chart(&empty, &empty, dir.path().join("x.html"));
        assert!(matches!(result, Err(ReportError::NothingToPlot(_))));
    }
}
