//! Declarative descriptions of how a result is shown

use serde::Serialize;
use utoipa::ToSchema;

/// How one page region presents its query result
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSpec {
    /// A chart description
    Chart(ChartSpec),
    /// A single formatted number
    Metric(MetricSpec),
    /// A ranked table
    Table(TableSpec),
}

/// Kind of chart to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bars
    Bar,
    /// Lines
    Line,
    /// Pie with one slice per category
    Pie,
    /// Bars on the primary axis, lines on the secondary axis
    DualAxis,
    /// Horizontal bars stacked by a split column
    StackedBar,
}

/// Value axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Left axis
    #[default]
    Primary,
    /// Right axis, overlaying the primary one
    Secondary,
}

/// Mark used to draw a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// Bar
    Bar,
    /// Line with markers
    Line,
    /// Pie slices
    Pie,
}

/// Per-series value transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Share of the value within its category, in percent
    PercentOfGroup,
}

/// Binds one result column to a plotted series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBinding {
    /// Source column
    pub column: &'static str,
    /// Legend label
    pub label: &'static str,
    /// Axis to plot against
    pub axis: Axis,
    /// Fixed color, if any
    pub color: Option<&'static str>,
}

impl SeriesBinding {
    /// Series on the primary axis labelled with its column name
    pub const fn new(column: &'static str) -> Self {
        Self { column, label: column, axis: Axis::Primary, color: None }
    }

    /// Override the legend label
    pub const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Plot on the secondary axis
    pub const fn secondary(mut self) -> Self {
        self.axis = Axis::Secondary;
        self
    }

    /// Fix the series color
    pub const fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

/// Chart description
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart title
    pub title: &'static str,
    /// Chart kind
    pub kind: ChartKind,
    /// Category column (x axis, pie names, or y axis for stacked bars)
    pub category: &'static str,
    /// Plotted series
    pub series: Vec<SeriesBinding>,
    /// Column splitting stacked bars into segments
    pub split_by: Option<&'static str>,
    /// Transform applied to every series
    pub transform: Option<Transform>,
    /// Primary value axis title
    pub y_title: Option<&'static str>,
    /// Secondary value axis title
    pub y2_title: Option<&'static str>,
}

impl ChartSpec {
    /// Chart of `kind` over `category` with the given series
    pub fn new(
        title: &'static str,
        kind: ChartKind,
        category: &'static str,
        series: Vec<SeriesBinding>,
    ) -> Self {
        Self {
            title,
            kind,
            category,
            series,
            split_by: None,
            transform: None,
            y_title: None,
            y2_title: None,
        }
    }

    /// Single-series bar chart
    pub fn bar(title: &'static str, category: &'static str, series: SeriesBinding) -> Self {
        Self::new(title, ChartKind::Bar, category, vec![series])
    }

    /// Single-series line chart
    pub fn line(title: &'static str, category: &'static str, series: SeriesBinding) -> Self {
        Self::new(title, ChartKind::Line, category, vec![series])
    }

    /// Pie of `values` sliced by `names`
    pub fn pie(title: &'static str, names: &'static str, values: &'static str) -> Self {
        Self::new(title, ChartKind::Pie, names, vec![SeriesBinding::new(values)])
    }

    /// Bars on the left axis with a line on the right axis
    pub fn dual_axis(
        title: &'static str,
        category: &'static str,
        bars: SeriesBinding,
        line: SeriesBinding,
    ) -> Self {
        Self::new(title, ChartKind::DualAxis, category, vec![bars, line.secondary()])
    }

    /// Horizontal bars per `category`, stacked by `split_by`
    pub fn stacked_bar(
        title: &'static str,
        category: &'static str,
        split_by: &'static str,
        values: SeriesBinding,
    ) -> Self {
        Self {
            split_by: Some(split_by),
            ..Self::new(title, ChartKind::StackedBar, category, vec![values])
        }
    }

    /// Apply `transform` to the plotted values
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Set the axis titles
    pub fn axis_titles(mut self, y: &'static str, y2: Option<&'static str>) -> Self {
        self.y_title = Some(y);
        self.y2_title = y2;
        self
    }
}

/// How a metric value is turned into text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricFormat {
    /// Text before the number, e.g. `$`
    pub prefix: &'static str,
    /// Text after the number, e.g. `K Wallets`
    pub suffix: &'static str,
    /// Value is divided by this before formatting
    pub divisor: f64,
    /// Digits after the decimal point
    pub decimals: usize,
    /// Insert thousands separators
    pub group_thousands: bool,
}

impl MetricFormat {
    /// Whole number with thousands separators, e.g. `$1,234,567`
    pub const fn grouped(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix, divisor: 1.0, decimals: 0, group_thousands: true }
    }

    /// Value divided by `divisor` with fixed decimals, e.g. `$1.2M`
    pub const fn scaled(
        prefix: &'static str,
        divisor: f64,
        decimals: usize,
        suffix: &'static str,
    ) -> Self {
        Self { prefix, suffix, divisor, decimals, group_thousands: false }
    }
}

/// A single value from the first row of a result
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    /// Caption shown above the value
    pub label: &'static str,
    /// Source column
    pub column: &'static str,
    /// Text format
    pub format: MetricFormat,
}

impl MetricSpec {
    /// Metric showing `column` under `label`
    pub const fn new(label: &'static str, column: &'static str, format: MetricFormat) -> Self {
        Self { label, column, format }
    }
}

/// A ranked table
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// Table heading
    pub title: &'static str,
    /// Column ranked on, if any
    pub rank_by: Option<&'static str>,
    /// Rank highest values first
    pub descending: bool,
    /// Columns compared ascending when the rank key ties
    pub tie_break: Vec<&'static str>,
    /// Maximum rows kept
    pub limit: Option<usize>,
}

impl TableSpec {
    /// Table keeping the result's order
    pub const fn new(title: &'static str) -> Self {
        Self { title, rank_by: None, descending: true, tie_break: Vec::new(), limit: None }
    }

    /// Rank rows by `column`, highest first, breaking ties on `tie_break`
    pub fn ranked(mut self, column: &'static str, tie_break: Vec<&'static str>) -> Self {
        self.rank_by = Some(column);
        self.descending = true;
        self.tie_break = tie_break;
        self
    }

    /// Keep at most `limit` rows
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
