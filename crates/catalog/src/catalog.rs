use std::fmt;

use tracing::debug;
use warehouse::{
    DestinationChainRow, FailedTransactionsRow, NewUsersRow, QueryExecutionError, RepeatUserRow,
    RetainedUsersRow, SatelliteKpiRow, SatelliteUserActivityRow, SatelliteUsersRow,
    SourceChainRow, SquidActivityRow, SquidKpiRow, SymbolRow, SymbolSourceChainRow,
    TabularResult, TransactionFeesRow, WarehouseReader,
};

use crate::{
    QueryParams, QueryRequest, TemplateId, ValidationError,
    sql::{Window, nullable_f64, satellite_overview, squid_service, squid_with_symbol},
};

/// Maximum rows returned by the ranked user tables
pub const TOP_USERS_LIMIT: u32 = 100;

/// Rendered SQL for one template invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText(String);

impl QueryText {
    /// SQL text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure to produce a template's result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Parameters were rejected, nothing ran
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The warehouse failed to run the query
    #[error(transparent)]
    Execution(#[from] QueryExecutionError),
}

/// The fixed set of query templates, bound to one database.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    db: String,
}

impl QueryCatalog {
    /// Create a catalog whose queries read tables from `db`
    pub fn new(db: impl Into<String>) -> Self {
        Self { db: db.into() }
    }

    /// Database the queries read from
    pub fn db_name(&self) -> &str {
        &self.db
    }

    /// Render the SQL for `template` with `params`.
    ///
    /// Rendering is pure: identical inputs always give identical text.
    pub fn render(
        &self,
        template: TemplateId,
        params: &QueryParams,
    ) -> Result<QueryText, ValidationError> {
        params.validate()?;
        let db = self.db.as_str();
        let w = Window::new(params);

        let sql = match template {
            TemplateId::NewUsers => format!(
                "SELECT {bucket} AS date, uniqExact(tx_from) AS new_users \
                 FROM ( \
                    SELECT tx_from, min(toDate(block_timestamp)) AS first_txn_date \
                    FROM {db}.fact_transactions \
                    WHERE tx_succeeded = true \
                    GROUP BY tx_from \
                 ) \
                 WHERE {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("first_txn_date"),
                filter = w.filter("first_txn_date"),
                order = w.order_filled("date"),
            ),
            TemplateId::UserRetention => format!(
                "SELECT {bucket} AS date, uniqExact(t.tx_from) AS retained_users \
                 FROM {db}.fact_transactions AS t \
                 INNER JOIN ( \
                    SELECT tx_from, min(block_timestamp) AS first_ts \
                    FROM {db}.fact_transactions \
                    WHERE tx_succeeded = true \
                    GROUP BY tx_from \
                 ) AS f ON t.tx_from = f.tx_from \
                 WHERE t.block_timestamp > f.first_ts AND {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("t.block_timestamp"),
                filter = w.filter("t.block_timestamp"),
                order = w.order_filled("date"),
            ),
            TemplateId::TransactionsFees => format!(
                "SELECT {bucket} AS date, \
                    uniqExact(tx_id) AS transactions, \
                    toFloat64(round(ifNull(sum(fee), 0) / 1e6)) AS fees \
                 FROM {db}.fact_transactions \
                 WHERE tx_succeeded = true AND {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("block_timestamp"),
                filter = w.filter("block_timestamp"),
                order = w.order_filled("date"),
            ),
            TemplateId::FailedTransactions => format!(
                "SELECT {bucket} AS date, uniqExact(tx_id) AS failed \
                 FROM {db}.fact_transactions \
                 WHERE tx_succeeded = false AND {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("block_timestamp"),
                filter = w.filter("block_timestamp"),
                order = w.order_filled("date"),
            ),
            TemplateId::RepeatUsers => format!(
                "SELECT tx_from AS sender, toDate(block_timestamp) AS txn_date, \
                    uniqExact(tx_id) AS txns \
                 FROM {db}.fact_transactions \
                 WHERE {filter} \
                 GROUP BY sender, txn_date \
                 HAVING txns > 1 \
                 ORDER BY txns DESC, sender ASC, txn_date ASC \
                 LIMIT {TOP_USERS_LIMIT}",
                filter = w.filter("block_timestamp"),
            ),
            TemplateId::SquidKpis => format!(
                "SELECT uniqExact(id) AS transfers, \
                    uniqExact(user_address) AS users, \
                    {volume} AS volume, \
                    {swap_time} AS avg_swap_time, \
                    {per_user} AS avg_swaps_per_user, \
                    {volume_per_user} AS avg_volume_per_user \
                 FROM ({service}) AS squid \
                 WHERE {filter}",
                volume = nullable_f64("round(sum(amount_usd))"),
                swap_time = nullable_f64(
                    "round(uniqExact(toDate(created_at)) * 86400 / nullIf(uniqExact(id), 0))"
                ),
                per_user =
                    nullable_f64("round(uniqExact(id) / nullIf(uniqExact(user_address), 0))"),
                volume_per_user =
                    nullable_f64("round(sum(amount_usd) / nullIf(uniqExact(user_address), 0))"),
                service = squid_service(db),
                filter = w.filter("created_at"),
            ),
            TemplateId::SquidActivity => format!(
                "SELECT {bucket} AS date, \
                    uniqExact(id) AS swap_count, \
                    uniqExact(user_address) AS swapper_count, \
                    {volume} AS swap_volume, \
                    {volume_per_user} AS volume_per_swapper \
                 FROM ({service}) AS squid \
                 WHERE {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("created_at"),
                volume = nullable_f64("round(sum(amount_usd))"),
                volume_per_user =
                    nullable_f64("round(sum(amount_usd) / nullIf(uniqExact(user_address), 0))"),
                service = squid_service(db),
                filter = w.filter("created_at"),
                order = w.order_filled("date"),
            ),
            TemplateId::SquidSourceChains => chain_breakdown(db, &w, "source_chain"),
            TemplateId::SquidDestinationChains => chain_breakdown(db, &w, "destination_chain"),
            TemplateId::SquidSymbols => format!(
                "SELECT symbol, uniqExact(id) AS swap_count, {volume} AS swap_volume \
                 FROM ({swaps}) AS swaps \
                 WHERE symbol != '' \
                 GROUP BY symbol \
                 ORDER BY swap_count DESC, symbol ASC",
                volume = nullable_f64("round(sum(amount_usd))"),
                swaps = squid_with_symbol(db, &w),
            ),
            TemplateId::SquidSymbolSourceChains => format!(
                "SELECT source_chain, symbol, {volume} AS volume, uniqExact(id) AS transfers \
                 FROM ({swaps}) AS swaps \
                 GROUP BY source_chain, symbol \
                 ORDER BY transfers DESC, source_chain ASC, symbol ASC",
                volume = nullable_f64("round(sum(amount_usd))"),
                swaps = squid_with_symbol(db, &w),
            ),
            TemplateId::SatelliteKpis => format!(
                "SELECT uniqExact(tx_hash) AS transfers, \
                    uniqExact(sender) AS users, \
                    {volume} AS volume_usd, \
                    {daily_users} AS avg_daily_users, \
                    {daily_txns} AS avg_daily_txns, \
                    {daily_volume} AS avg_daily_volume \
                 FROM ({overview}) AS overview",
                volume = nullable_f64("round(sum(amount_usd))"),
                daily_users = nullable_f64("round(uniqExact(sender) / nullIf(uniqExact(date), 0), 1)"),
                daily_txns = nullable_f64("round(uniqExact(tx_hash) / nullIf(uniqExact(date), 0), 1)"),
                daily_volume = nullable_f64("round(sum(amount_usd) / nullIf(uniqExact(date), 0), 1)"),
                overview = satellite_overview(db, &w),
            ),
            TemplateId::SatelliteUsers => format!(
                "SELECT a.date AS date, \
                    uniqExactIf(a.sender, a.date = f.first_bucket) AS new_users, \
                    uniqExactIf(a.sender, a.date != f.first_bucket) AS returning_users, \
                    uniqExact(a.sender) AS total_users \
                 FROM ( \
                    SELECT {bucket} AS date, sender \
                    FROM {db}.ez_bridge_satellite \
                    GROUP BY date, sender \
                 ) AS a \
                 INNER JOIN ( \
                    SELECT sender, min({bucket}) AS first_bucket \
                    FROM {db}.ez_bridge_satellite \
                    GROUP BY sender \
                 ) AS f ON a.sender = f.sender \
                 WHERE {filter} \
                 GROUP BY date \
                 {order}",
                bucket = w.bucket("block_timestamp"),
                filter = w.bucket_filter("a.date"),
                order = w.order_filled("date"),
            ),
            TemplateId::SatelliteTopUsers => format!(
                "SELECT sender AS address, \
                    uniqExact(tx_hash) AS transfers, \
                    {volume} AS volume, \
                    uniqExact(token_symbol) AS tokens, \
                    uniqExact(concat(source_chain, '➡', destination_chain)) AS paths, \
                    uniqExact(date) AS activity_days \
                 FROM ({overview}) AS overview \
                 GROUP BY address \
                 ORDER BY transfers DESC, address ASC \
                 LIMIT {TOP_USERS_LIMIT}",
                volume = nullable_f64("round(sum(amount_usd))"),
                overview = satellite_overview(db, &w),
            ),
        };

        Ok(QueryText(sql))
    }

    /// Render and execute `request`, returning the template's declared columns.
    pub async fn run(
        &self,
        reader: &WarehouseReader,
        request: &QueryRequest,
    ) -> Result<TabularResult, QueryError> {
        let query = self.render(request.template, &request.params)?;
        debug!(request = %request, "running query template");
        let sql = query.as_str();

        let table = match request.template {
            TemplateId::NewUsers => reader.query_table::<NewUsersRow>(sql).await,
            TemplateId::UserRetention => reader.query_table::<RetainedUsersRow>(sql).await,
            TemplateId::TransactionsFees => reader.query_table::<TransactionFeesRow>(sql).await,
            TemplateId::FailedTransactions => {
                reader.query_table::<FailedTransactionsRow>(sql).await
            }
            TemplateId::RepeatUsers => reader.query_table::<RepeatUserRow>(sql).await,
            TemplateId::SquidKpis => reader.query_table::<SquidKpiRow>(sql).await,
            TemplateId::SquidActivity => reader.query_table::<SquidActivityRow>(sql).await,
            TemplateId::SquidSourceChains => reader.query_table::<SourceChainRow>(sql).await,
            TemplateId::SquidDestinationChains => {
                reader.query_table::<DestinationChainRow>(sql).await
            }
            TemplateId::SquidSymbols => reader.query_table::<SymbolRow>(sql).await,
            TemplateId::SquidSymbolSourceChains => {
                reader.query_table::<SymbolSourceChainRow>(sql).await
            }
            TemplateId::SatelliteKpis => reader.query_table::<SatelliteKpiRow>(sql).await,
            TemplateId::SatelliteUsers => reader.query_table::<SatelliteUsersRow>(sql).await,
            TemplateId::SatelliteTopUsers => {
                reader.query_table::<SatelliteUserActivityRow>(sql).await
            }
        }?;

        Ok(table)
    }
}

/// Squid swaps grouped by one chain column
fn chain_breakdown(db: &str, w: &Window<'_>, chain: &str) -> String {
    format!(
        "SELECT {chain}, \
            uniqExact(id) AS swap_count, \
            uniqExact(user_address) AS swapper_count, \
            {volume} AS swap_volume \
         FROM ({service}) AS squid \
         WHERE {filter} \
         GROUP BY {chain} \
         ORDER BY swap_count DESC, {chain} ASC",
        volume = nullable_f64("round(sum(amount_usd))"),
        service = squid_service(db),
        filter = w.filter("created_at"),
    )
}
