use serde::Serialize;
use utoipa::ToSchema;
use warehouse::{Column, TabularResult, Value};

use crate::{
    Axis, ChartKind, ChartSpec, Mark, MetricSpec, PresentationError, TableSpec, Transform,
    ViewSpec,
    format::format_metric,
    rank::{distinct_in_order, numeric, percent_of_group, rank_top_n},
};

/// Message carried by placeholders for empty results
pub const NO_DATA: &str = "No data for the selected range";

/// Direction bars grow in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Categories on the x axis
    Vertical,
    /// Categories on the y axis
    Horizontal,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Trace {
    /// Legend name
    pub name: String,
    /// How the series is drawn
    pub mark: Mark,
    /// Value axis
    pub axis: Axis,
    /// Fixed color, if any
    pub color: Option<String>,
    /// One value per category; `null` where the series has no value
    pub values: Vec<Value>,
}

/// A chart description ready to hand to a plotting library
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Figure {
    /// Chart title
    pub title: String,
    /// Chart kind
    pub kind: ChartKind,
    /// Bar direction
    pub orientation: Orientation,
    /// Category labels shared by every trace
    pub categories: Vec<Value>,
    /// Plotted series
    pub traces: Vec<Trace>,
    /// Primary value axis title
    pub y_title: Option<String>,
    /// Secondary value axis title
    pub y2_title: Option<String>,
}

/// A formatted scalar
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RenderedMetric {
    /// Caption
    pub label: String,
    /// Raw value
    pub value: Value,
    /// Formatted value
    pub display: String,
}

/// One table row with its 1-based rank
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankedRow {
    /// Position, starting at 1
    pub rank: usize,
    /// Values aligned with the table columns
    pub values: Vec<Value>,
}

/// A ranked table
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RenderedTable {
    /// Heading
    pub title: String,
    /// Columns
    pub columns: Vec<Column>,
    /// Rows in rank order
    pub rows: Vec<RankedRow>,
}

/// Shown instead of a view when the query returned no rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Placeholder {
    /// Title of the view that would have been shown
    pub title: String,
    /// Explanation
    pub message: String,
}

/// Output of [`render`]
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedView {
    /// Chart description
    Figure(Figure),
    /// Formatted scalar
    Metric(RenderedMetric),
    /// Ranked table
    Table(RenderedTable),
    /// Empty result
    Placeholder(Placeholder),
}

impl ViewSpec {
    /// Title or label of the view
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Chart(c) => c.title,
            Self::Metric(m) => m.label,
            Self::Table(t) => t.title,
        }
    }
}

/// Map `result` onto `view`.
///
/// Pure: the same inputs always give the same output. Empty results render a
/// [`Placeholder`]; zero values are kept.
pub fn render(result: &TabularResult, view: &ViewSpec) -> Result<RenderedView, PresentationError> {
    if result.is_empty() {
        return Ok(RenderedView::Placeholder(Placeholder {
            title: view.title().to_owned(),
            message: NO_DATA.to_owned(),
        }));
    }
    match view {
        ViewSpec::Chart(chart) => render_chart(result, chart).map(RenderedView::Figure),
        ViewSpec::Metric(metric) => render_metric(result, metric).map(RenderedView::Metric),
        ViewSpec::Table(table) => render_table(result, table).map(RenderedView::Table),
    }
}

fn column_index(result: &TabularResult, column: &str) -> Result<usize, PresentationError> {
    result.column_index(column).ok_or_else(|| PresentationError::MissingColumn(column.to_owned()))
}

/// Values of `column`, checked numeric, with the chart transform applied
fn series_values(
    result: &TabularResult,
    chart: &ChartSpec,
    column: &str,
) -> Result<Vec<Value>, PresentationError> {
    match chart.transform {
        Some(Transform::PercentOfGroup) => percent_of_group(result, chart.category, column),
        None => {
            let idx = column_index(result, column)?;
            result
                .rows()
                .iter()
                .enumerate()
                .map(|(row, values)| {
                    numeric(&values[idx], column, row)?;
                    Ok(values[idx].clone())
                })
                .collect()
        }
    }
}

const fn mark_for(kind: ChartKind, axis: Axis) -> Mark {
    match (kind, axis) {
        (ChartKind::Line, _) | (ChartKind::DualAxis, Axis::Secondary) => Mark::Line,
        (ChartKind::Pie, _) => Mark::Pie,
        _ => Mark::Bar,
    }
}

fn render_chart(result: &TabularResult, chart: &ChartSpec) -> Result<Figure, PresentationError> {
    if chart.series.is_empty() {
        return Err(PresentationError::NoSeries(chart.title.to_owned()));
    }
    let category = column_index(result, chart.category)?;

    let (categories, traces) = match (chart.kind, chart.split_by) {
        (ChartKind::StackedBar, Some(split_by)) => stacked(result, chart, category, split_by)?,
        _ => {
            let categories = result.rows().iter().map(|r| r[category].clone()).collect();
            let traces = chart
                .series
                .iter()
                .map(|s| {
                    Ok(Trace {
                        name: s.label.to_owned(),
                        mark: mark_for(chart.kind, s.axis),
                        axis: s.axis,
                        color: s.color.map(str::to_owned),
                        values: series_values(result, chart, s.column)?,
                    })
                })
                .collect::<Result<Vec<_>, PresentationError>>()?;
            (categories, traces)
        }
    };

    Ok(Figure {
        title: chart.title.to_owned(),
        kind: chart.kind,
        orientation: if chart.kind == ChartKind::StackedBar {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        },
        categories,
        traces,
        y_title: chart.y_title.map(str::to_owned),
        y2_title: chart.y2_title.map(str::to_owned),
    })
}

/// One trace per distinct `split_by` value, each aligned to the distinct
/// categories. Missing combinations are `null`.
fn stacked(
    result: &TabularResult,
    chart: &ChartSpec,
    category: usize,
    split_by: &str,
) -> Result<(Vec<Value>, Vec<Trace>), PresentationError> {
    let split = column_index(result, split_by)?;
    let series = &chart.series[0];
    let values = series_values(result, chart, series.column)?;
    let rows = result.rows();

    let categories = distinct_in_order(rows.iter().map(|r| &r[category]));
    let splits = distinct_in_order(rows.iter().map(|r| &r[split]));

    let traces = splits
        .iter()
        .map(|&segment| Trace {
            name: segment.to_string(),
            mark: Mark::Bar,
            axis: series.axis,
            color: None,
            values: categories
                .iter()
                .map(|&cat| {
                    rows.iter()
                        .position(|r| &r[category] == cat && &r[split] == segment)
                        .map_or(Value::Null, |i| values[i].clone())
                })
                .collect(),
        })
        .collect();

    Ok((categories.into_iter().cloned().collect(), traces))
}

fn render_metric(
    result: &TabularResult,
    metric: &MetricSpec,
) -> Result<RenderedMetric, PresentationError> {
    let idx = column_index(result, metric.column)?;
    let value = result.rows()[0][idx].clone();
    let display = format_metric(&value, &metric.format)
        .ok_or_else(|| PresentationError::NonNumeric { column: metric.column.to_owned(), row: 0 })?;
    Ok(RenderedMetric { label: metric.label.to_owned(), value, display })
}

fn render_table(
    result: &TabularResult,
    table: &TableSpec,
) -> Result<RenderedTable, PresentationError> {
    let ordered = match table.rank_by {
        Some(by) => rank_top_n(result, by, table.descending, &table.tie_break, table.limit)?,
        None => {
            let keep = table.limit.unwrap_or(usize::MAX).min(result.len());
            result.select_rows(&(0..keep).collect::<Vec<_>>())
        }
    };
    Ok(RenderedTable {
        title: table.title.to_owned(),
        columns: ordered.columns().to_vec(),
        rows: ordered
            .rows()
            .iter()
            .enumerate()
            .map(|(i, values)| RankedRow { rank: i + 1, values: values.clone() })
            .collect(),
    })
}
