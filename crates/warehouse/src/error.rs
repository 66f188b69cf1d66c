/// The warehouse rejected or failed to execute a query.
///
/// The diagnostic reported by the database (syntax, permissions, timeouts,
/// connectivity) is kept verbatim in `message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query execution failed: {message}")]
pub struct QueryExecutionError {
    /// Diagnostic text reported by the warehouse client
    pub message: String,
}

impl QueryExecutionError {
    /// Create a new error from any displayable diagnostic.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self { message: message.to_string() }
    }
}

impl From<clickhouse::error::Error> for QueryExecutionError {
    fn from(err: clickhouse::error::Error) -> Self {
        Self::new(err)
    }
}
