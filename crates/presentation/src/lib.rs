//! Turns tabular query results into chart descriptions, formatted metrics
//! and ranked tables.
//!
//! Nothing here draws pixels: a [`Figure`] is a plain description that a
//! front end hands to its plotting library.

mod error;
mod format;
mod rank;
mod render;
mod view;

pub use error::PresentationError;
pub use format::{NOT_AVAILABLE, format_metric};
pub use rank::{percent_of_group, rank_top_n};
pub use render::{
    Figure, NO_DATA, Orientation, Placeholder, RankedRow, RenderedMetric, RenderedTable,
    RenderedView, Trace, render,
};
pub use view::{
    Axis, ChartKind, ChartSpec, Mark, MetricFormat, MetricSpec, SeriesBinding, TableSpec,
    Transform, ViewSpec,
};
