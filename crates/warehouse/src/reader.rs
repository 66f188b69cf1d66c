//! `ClickHouse` reader used by the query catalog (read-only operations)

use std::time::Instant;

use clickhouse::{Client, Row};
use derive_more::Debug;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::{
    error::QueryExecutionError,
    tabular::{TabularResult, TabularRow},
};

/// Read-only `ClickHouse` client holding the analytics connection settings
#[derive(Clone, Debug)]
pub struct WarehouseReader {
    /// Base client
    #[debug(skip)]
    base: Client,
    /// Database holding the Axelar tables
    db_name: String,
}

impl WarehouseReader {
    /// Create a new reader.
    ///
    /// No connection is opened until the first query runs.
    pub fn new(
        url: Url,
        db_name: String,
        username: String,
        password: String,
    ) -> Result<Self, QueryExecutionError> {
        if db_name.trim().is_empty() {
            return Err(QueryExecutionError::new("database name must not be empty"));
        }
        let client = Client::default()
            .with_url(url)
            .with_database(db_name.clone())
            .with_user(username)
            .with_password(password);

        Ok(Self { base: client, db_name })
    }

    /// Database the reader was configured with
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    async fn execute<R>(&self, query: &str) -> Result<Vec<R>, QueryExecutionError>
    where
        R: Row + for<'b> Deserialize<'b>,
    {
        let client = self.base.clone();
        let start = Instant::now();

        let result = client.query(query).fetch_all::<R>().await;

        let duration_ms = start.elapsed().as_millis();
        match &result {
            Ok(rows) => {
                debug!(query = %query, duration_ms, rows = rows.len(), "ClickHouse query executed")
            }
            Err(e) => error!(query = %query, duration_ms, error = %e, "ClickHouse query failed"),
        }
        result.map_err(Into::into)
    }

    /// Run `query` and collect its rows as a [`TabularResult`] with the
    /// column schema declared by `R`.
    pub async fn query_table<R: TabularRow>(
        &self,
        query: &str,
    ) -> Result<TabularResult, QueryExecutionError> {
        let rows = self.execute::<R>(query).await?;
        Ok(TabularResult::from_rows(rows))
    }
}
