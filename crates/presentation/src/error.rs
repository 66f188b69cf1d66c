/// A view could not be bound to a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// The view references a column the result does not have
    #[error("column '{0}' is not part of the result")]
    MissingColumn(String),
    /// A plotted or formatted column holds a non-numeric value
    #[error("column '{column}' row {row} is not numeric")]
    NonNumeric {
        /// Column name
        column: String,
        /// Row index
        row: usize,
    },
    /// The view declares no series to plot
    #[error("chart '{0}' has no series")]
    NoSeries(String),
}
