//! Typed rows returned by the query templates.
//!
//! Field order must match the select order of the corresponding query.
//! `ClickHouse` `Date` values arrive as days since the Unix epoch.

use clickhouse::Row;
use serde::{Deserialize, Serialize};

use crate::tabular::{
    Column,
    ColumnType::{Date, Float, Integer, String as Text},
    TabularRow, Value, date_from_days,
};

/// First-seen users per time bucket
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct NewUsersRow {
    /// Bucket start date
    pub date: u16,
    /// Users whose first successful transaction falls in the bucket
    pub new_users: u64,
}

impl TabularRow for NewUsersRow {
    const COLUMNS: &'static [Column] =
        &[Column::new("Date", Date), Column::new("New Users", Integer)];

    fn into_values(self) -> Vec<Value> {
        vec![date_from_days(self.date).into(), self.new_users.into()]
    }
}

/// Users active again after their first transaction
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct RetainedUsersRow {
    /// Bucket start date
    pub date: u16,
    /// Returning users in the bucket
    pub retained_users: u64,
}

impl TabularRow for RetainedUsersRow {
    const COLUMNS: &'static [Column] =
        &[Column::new("Date", Date), Column::new("Retained Users", Integer)];

    fn into_values(self) -> Vec<Value> {
        vec![date_from_days(self.date).into(), self.retained_users.into()]
    }
}

/// Successful transaction count and fees per bucket
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct TransactionFeesRow {
    /// Bucket start date
    pub date: u16,
    /// Distinct successful transactions
    pub transactions: u64,
    /// Fees paid, in whole AXL
    pub fees: f64,
}

impl TabularRow for TransactionFeesRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Date", Date),
        Column::new("Number of Transactions", Integer),
        Column::new("Transaction Fees", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![date_from_days(self.date).into(), self.transactions.into(), self.fees.into()]
    }
}

/// Failed transactions per bucket
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct FailedTransactionsRow {
    /// Bucket start date
    pub date: u16,
    /// Distinct failed transactions
    pub failed: u64,
}

impl TabularRow for FailedTransactionsRow {
    const COLUMNS: &'static [Column] =
        &[Column::new("Date", Date), Column::new("Failed Transactions", Integer)];

    fn into_values(self) -> Vec<Value> {
        vec![date_from_days(self.date).into(), self.failed.into()]
    }
}

/// A user sending more than one transaction on the same day
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct RepeatUserRow {
    /// Sender address
    pub sender: String,
    /// Day of activity
    pub txn_date: u16,
    /// Distinct transactions sent that day
    pub txns: u64,
}

impl TabularRow for RepeatUserRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("User", Text),
        Column::new("Txn Date", Date),
        Column::new("Txns Count", Integer),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![self.sender.into(), date_from_days(self.txn_date).into(), self.txns.into()]
    }
}

/// Headline figures for Squid routed swaps
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SquidKpiRow {
    /// Distinct swaps
    pub transfers: u64,
    /// Distinct swappers
    pub users: u64,
    /// Total swap volume in USD
    pub volume: Option<f64>,
    /// Average seconds between swaps
    pub avg_swap_time: Option<f64>,
    /// Average swaps per swapper
    pub avg_swaps_per_user: Option<f64>,
    /// Average USD volume per swapper
    pub avg_volume_per_user: Option<f64>,
}

impl TabularRow for SquidKpiRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Number of Transfers", Integer),
        Column::new("Number of Users", Integer),
        Column::new("Volume of Transfers", Float),
        Column::new("Avg Swap Time", Float),
        Column::new("Avg Swap Count per User", Float),
        Column::new("Avg Swap Volume per User", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.transfers.into(),
            self.users.into(),
            self.volume.into(),
            self.avg_swap_time.into(),
            self.avg_swaps_per_user.into(),
            self.avg_volume_per_user.into(),
        ]
    }
}

/// Squid swaps per time bucket
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SquidActivityRow {
    /// Bucket start date
    pub date: u16,
    pub swap_count: u64,
    pub swapper_count: u64,
    pub swap_volume: Option<f64>,
    pub volume_per_swapper: Option<f64>,
}

impl TabularRow for SquidActivityRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Date", Date),
        Column::new("Swap Count", Integer),
        Column::new("Swapper Count", Integer),
        Column::new("Swap Volume", Float),
        Column::new("Swap Volume per Swapper", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            date_from_days(self.date).into(),
            self.swap_count.into(),
            self.swapper_count.into(),
            self.swap_volume.into(),
            self.volume_per_swapper.into(),
        ]
    }
}

/// Squid swaps grouped by source chain
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SourceChainRow {
    pub source_chain: String,
    pub swap_count: u64,
    pub swapper_count: u64,
    pub swap_volume: Option<f64>,
}

impl TabularRow for SourceChainRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Source Chain", Text),
        Column::new("Swap Count", Integer),
        Column::new("Swapper Count", Integer),
        Column::new("Swap Volume", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.source_chain.into(),
            self.swap_count.into(),
            self.swapper_count.into(),
            self.swap_volume.into(),
        ]
    }
}

/// Squid swaps grouped by destination chain
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct DestinationChainRow {
    pub destination_chain: String,
    pub swap_count: u64,
    pub swapper_count: u64,
    pub swap_volume: Option<f64>,
}

impl TabularRow for DestinationChainRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Destination Chain", Text),
        Column::new("Swap Count", Integer),
        Column::new("Swapper Count", Integer),
        Column::new("Swap Volume", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.destination_chain.into(),
            self.swap_count.into(),
            self.swapper_count.into(),
            self.swap_volume.into(),
        ]
    }
}

/// Squid swaps grouped by normalized token symbol
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SymbolRow {
    pub symbol: String,
    pub swap_count: u64,
    pub swap_volume: Option<f64>,
}

impl TabularRow for SymbolRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Symbol", Text),
        Column::new("Swap Count", Integer),
        Column::new("Swap Volume", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![self.symbol.into(), self.swap_count.into(), self.swap_volume.into()]
    }
}

/// Squid swaps grouped by source chain and token symbol
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SymbolSourceChainRow {
    pub source_chain: String,
    pub symbol: String,
    pub volume: Option<f64>,
    pub transfers: u64,
}

impl TabularRow for SymbolSourceChainRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Source Chain", Text),
        Column::new("Symbol", Text),
        Column::new("Volume of Transfers (USD)", Float),
        Column::new("Number of Transfers", Integer),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.source_chain.into(),
            self.symbol.into(),
            self.volume.into(),
            self.transfers.into(),
        ]
    }
}

/// Headline figures for Satellite bridge transfers
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SatelliteKpiRow {
    pub transfers: u64,
    pub users: u64,
    pub volume_usd: Option<f64>,
    pub avg_daily_users: Option<f64>,
    pub avg_daily_txns: Option<f64>,
    pub avg_daily_volume: Option<f64>,
}

impl TabularRow for SatelliteKpiRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Transfers", Integer),
        Column::new("Users", Integer),
        Column::new("Volume USD", Float),
        Column::new("Avg Daily Users", Float),
        Column::new("Avg Daily Txns", Float),
        Column::new("Avg Daily Volume", Float),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.transfers.into(),
            self.users.into(),
            self.volume_usd.into(),
            self.avg_daily_users.into(),
            self.avg_daily_txns.into(),
            self.avg_daily_volume.into(),
        ]
    }
}

/// New, returning and total Satellite users per bucket
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SatelliteUsersRow {
    /// Bucket start date
    pub date: u16,
    pub new_users: u64,
    pub returning_users: u64,
    pub total_users: u64,
}

impl TabularRow for SatelliteUsersRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Date", Date),
        Column::new("New Users", Integer),
        Column::new("Returning Users", Integer),
        Column::new("Total Users", Integer),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            date_from_days(self.date).into(),
            self.new_users.into(),
            self.returning_users.into(),
            self.total_users.into(),
        ]
    }
}

/// Activity profile of one Satellite sender
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq)]
pub struct SatelliteUserActivityRow {
    /// Sender address
    pub address: String,
    pub transfers: u64,
    pub volume: Option<f64>,
    /// Distinct token symbols bridged
    pub tokens: u64,
    /// Distinct source → destination chain pairs used
    pub paths: u64,
    /// Distinct days with at least one transfer
    pub activity_days: u64,
}

impl TabularRow for SatelliteUserActivityRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("Address", Text),
        Column::new("Number of Transfers", Integer),
        Column::new("Volume of Transfers (USD)", Float),
        Column::new("Number of Transferred Tokens", Integer),
        Column::new("Number of Unique Paths", Integer),
        Column::new("Activity Days", Integer),
    ];

    fn into_values(self) -> Vec<Value> {
        vec![
            self.address.into(),
            self.transfers.into(),
            self.volume.into(),
            self.tokens.into(),
            self.paths.into(),
            self.activity_days.into(),
        ]
    }
}
