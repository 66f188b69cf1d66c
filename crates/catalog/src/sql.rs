//! `ClickHouse` fragments shared by the query templates

use crate::{QueryParams, tokens::symbol_expr};

/// Contracts the Squid router sends from (token transfers) or calls into (GMP)
pub(crate) const SQUID_CONTRACTS: [&str; 5] = [
    "0xce16F69375520ab01377ce7B88f5BA8C48F8D666",
    "0x492751eC3c57141deb205eC2da8bFcb410738630",
    "0xDC3D8e1Abe590BCa428a8a2FC4CfDbD1AcF57Bd9",
    "0xdf4fFDa22270c12d0b5b3788F1669D709476111E",
    "0xe6B3949F9bBF168f4E3EFc82bc8FD849868CC6d8",
];

fn json_path(path: &[&str]) -> String {
    path.iter().map(|key| format!("'{key}'")).collect::<Vec<_>>().join(", ")
}

/// String at `path` inside the `data` JSON column, empty when absent
pub(crate) fn json_string(path: &[&str]) -> String {
    format!("JSONExtractString(data, {})", json_path(path))
}

/// Number at `path` inside the `data` JSON column.
///
/// Arrays, objects and unparsable values become `NULL`; quoted numbers are
/// accepted.
pub(crate) fn json_double(path: &[&str]) -> String {
    let path = json_path(path);
    format!(
        "if(JSONType(data, {path}) IN ('Array', 'Object'), NULL, \
         toFloat64OrNull(trim(BOTH '\"' FROM JSONExtractRaw(data, {path}))))"
    )
}

/// Force a float aggregate to `Nullable(Float64)`
pub(crate) fn nullable_f64(expr: &str) -> String {
    format!("CAST(({expr}) AS Nullable(Float64))")
}

/// Renders the date handling for one set of parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window<'a> {
    pub(crate) params: &'a QueryParams,
}

impl<'a> Window<'a> {
    pub(crate) const fn new(params: &'a QueryParams) -> Self {
        Self { params }
    }

    /// Bucket start date of `column`
    pub(crate) fn bucket(&self, column: &str) -> String {
        format!("toDate(date_trunc('{}', {column}))", self.params.granularity)
    }

    /// Inclusive calendar-day filter on `column`
    pub(crate) fn filter(&self, column: &str) -> String {
        format!(
            "toDate({column}) >= toDate('{}') AND toDate({column}) <= toDate('{}')",
            self.params.start_date, self.params.end_date
        )
    }

    /// Inclusive filter on an already bucketed date, keeping the partial
    /// bucket that contains the start date
    pub(crate) fn bucket_filter(&self, column: &str) -> String {
        format!(
            "{column} >= {} AND {column} <= toDate('{}')",
            self.bucket(&format!("toDate('{}')", self.params.start_date)),
            self.params.end_date
        )
    }

    /// Ordering clause that emits a zero row for every empty bucket
    pub(crate) fn order_filled(&self, column: &str) -> String {
        format!(
            "ORDER BY {column} ASC WITH FILL FROM {} TO toDate('{}') + 1 STEP INTERVAL 1 {}",
            self.bucket(&format!("toDate('{}')", self.params.start_date)),
            self.params.end_date,
            self.params.granularity.interval_unit()
        )
    }
}

fn ilike_any(column: &str) -> String {
    SQUID_CONTRACTS
        .iter()
        .map(|addr| format!("{column} ILIKE '%{addr}%'"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Executed Squid swaps from token transfers and GMP calls.
///
/// Columns: `created_at`, `source_chain`, `destination_chain`,
/// `user_address`, `amount`, `amount_usd`, `fee`, `id`, `service`,
/// `raw_asset`.
pub(crate) fn squid_service(db: &str) -> String {
    let transfer_amount = json_double(&["send", "amount"]);
    let transfer_price = json_double(&["link", "price"]);
    let gas_used = json_double(&["gas", "gas_used_amount"]);
    let gas_price = json_double(&["gas_price_rate", "source_token", "token_price", "usd"]);
    format!(
        "SELECT created_at, \
            lower({src}) AS source_chain, \
            lower({dst}) AS destination_chain, \
            recipient_address AS user_address, \
            {transfer_amount} AS amount, \
            ({transfer_amount}) * ({transfer_price}) AS amount_usd, \
            {fee} AS fee, \
            id, \
            'Token Transfers' AS service, \
            {asset} AS raw_asset \
         FROM {db}.axelscan_fact_transfers \
         WHERE status = 'executed' AND simplified_status = 'received' AND ({transfer_senders}) \
         UNION ALL \
         SELECT created_at, \
            lower({gmp_src}) AS source_chain, \
            lower({gmp_dst}) AS destination_chain, \
            {gmp_user} AS user_address, \
            {gmp_amount} AS amount, \
            {gmp_value} AS amount_usd, \
            coalesce(({gas_used}) * ({gas_price}), {express_fee}) AS fee, \
            id, \
            'GMP' AS service, \
            {gmp_symbol} AS raw_asset \
         FROM {db}.axelscan_fact_gmp \
         WHERE status = 'executed' AND simplified_status = 'received' AND ({gmp_contracts})",
        src = json_string(&["send", "original_source_chain"]),
        dst = json_string(&["send", "original_destination_chain"]),
        fee = json_double(&["send", "fee_value"]),
        asset = json_string(&["link", "asset"]),
        transfer_senders = ilike_any("sender_address"),
        gmp_src = json_string(&["call", "chain"]),
        gmp_dst = json_string(&["call", "returnValues", "destinationChain"]),
        gmp_user = json_string(&["call", "transaction", "from"]),
        gmp_amount = json_double(&["amount"]),
        gmp_value = json_double(&["value"]),
        express_fee = json_double(&["fees", "express_fee_usd"]),
        gmp_symbol = json_string(&["symbol"]),
        gmp_contracts =
            ilike_any(&json_string(&["approved", "returnValues", "contractAddress"])),
    )
}

/// Squid swaps in the window with their normalized token symbol
pub(crate) fn squid_with_symbol(db: &str, window: &Window<'_>) -> String {
    format!(
        "SELECT id, source_chain, user_address, amount_usd, {symbol} AS symbol \
         FROM ({service}) AS squid \
         WHERE {filter}",
        symbol = symbol_expr("raw_asset"),
        service = squid_service(db),
        filter = window.filter("created_at"),
    )
}

/// Satellite bridge events in the window joined with the USD amount of the
/// matching transfer.
///
/// Columns: `date`, `tx_hash`, `source_chain`, `destination_chain`,
/// `sender`, `token_symbol`, `amount_usd`.
pub(crate) fn satellite_overview(db: &str, window: &Window<'_>) -> String {
    format!(
        "SELECT s.date AS date, s.tx_hash AS tx_hash, s.source_chain AS source_chain, \
            s.destination_chain AS destination_chain, s.sender AS sender, \
            s.token_symbol AS token_symbol, t.amount_usd AS amount_usd \
         FROM ( \
            SELECT toDate(block_timestamp) AS date, tx_hash, source_chain, destination_chain, \
                sender, token_symbol \
            FROM {db}.ez_bridge_satellite \
            WHERE {event_filter} \
         ) AS s \
         LEFT JOIN ( \
            SELECT splitByChar('_', id)[1] AS tx_hash, ({amount}) * ({price}) AS amount_usd \
            FROM {db}.axelscan_fact_transfers \
            WHERE status = 'executed' AND simplified_status = 'received' AND {transfer_filter} \
         ) AS t ON s.tx_hash = t.tx_hash",
        event_filter = window.filter("block_timestamp"),
        transfer_filter = window.filter("created_at"),
        amount = json_double(&["send", "amount"]),
        price = json_double(&["link", "price"]),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Granularity;

    fn params(granularity: Granularity) -> QueryParams {
        QueryParams::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            granularity,
        )
        .unwrap()
    }

    #[test]
    fn json_double_rejects_containers() {
        assert_eq!(
            json_double(&["send", "amount"]),
            "if(JSONType(data, 'send', 'amount') IN ('Array', 'Object'), NULL, \
             toFloat64OrNull(trim(BOTH '\"' FROM JSONExtractRaw(data, 'send', 'amount'))))"
        );
    }

    #[test]
    fn window_filter_is_inclusive() {
        let p = params(Granularity::Day);
        assert_eq!(
            Window::new(&p).filter("created_at"),
            "toDate(created_at) >= toDate('2024-01-15') AND toDate(created_at) <= toDate('2024-03-31')"
        );
    }

    #[test]
    fn fill_starts_at_the_first_bucket() {
        let p = params(Granularity::Month);
        let fill = Window::new(&p).order_filled("date");
        assert!(fill.contains("FROM toDate(date_trunc('month', toDate('2024-01-15')))"));
        assert!(fill.ends_with("TO toDate('2024-03-31') + 1 STEP INTERVAL 1 MONTH"));
    }

    #[test]
    fn squid_service_filters_every_router_contract() {
        let sql = squid_service("axelar");
        for addr in SQUID_CONTRACTS {
            assert_eq!(sql.matches(addr).count(), 2, "{addr}");
        }
        assert!(sql.contains("FROM axelar.axelscan_fact_transfers"));
        assert!(sql.contains("FROM axelar.axelscan_fact_gmp"));
    }
}
