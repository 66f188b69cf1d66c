//! Page layouts: which templates feed which views, and the default window of
//! every page.

use std::{fmt, str::FromStr};

use catalog::{Granularity, QueryParams, TemplateId};
use chrono::NaiveDate;
use presentation::{
    ChartSpec, MetricFormat, MetricSpec, SeriesBinding, TableSpec, Transform, ViewSpec,
};

const SWAPS: &str = "orange";
const VOLUME: &str = "blue";
const SATELLITE: &str = "#717aff";

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

const FIRST_DAY: NaiveDate = date(2022, 1, 1);
const SQUID_FIRST_DAY: NaiveDate = date(2023, 1, 1);
const LAST_DAY: NaiveDate = date(2025, 8, 31);

/// A dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    /// Acquisition, retention and transaction activity on Axelar
    UserBehaviour,
    /// Swaps routed through Squid
    Squid,
    /// Transfers over the Satellite bridge
    Satellite,
}

/// No page is registered under the requested identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page '{0}'")]
pub struct UnknownPage(pub String);

impl PageId {
    /// Every page, in navigation order
    pub const ALL: [Self; 3] = [Self::UserBehaviour, Self::Squid, Self::Satellite];

    /// Identifier used in URLs
    pub const fn slug(self) -> &'static str {
        match self {
            Self::UserBehaviour => "user-behaviour",
            Self::Squid => "squid",
            Self::Satellite => "satellite",
        }
    }

    /// Page heading
    pub const fn title(self) -> &'static str {
        match self {
            Self::UserBehaviour => "User Behaviour",
            Self::Squid => "Squid",
            Self::Satellite => "Satellite",
        }
    }

    /// Window and granularity used when the request omits them
    pub const fn defaults(self) -> QueryParams {
        match self {
            Self::UserBehaviour => QueryParams {
                start_date: FIRST_DAY,
                end_date: LAST_DAY,
                granularity: Granularity::Day,
            },
            Self::Squid => QueryParams {
                start_date: SQUID_FIRST_DAY,
                end_date: LAST_DAY,
                granularity: Granularity::Month,
            },
            Self::Satellite => QueryParams {
                start_date: FIRST_DAY,
                end_date: LAST_DAY,
                granularity: Granularity::Month,
            },
        }
    }

    /// Regions of the page in layout order
    pub fn regions(self) -> Vec<Region> {
        match self {
            Self::UserBehaviour => user_behaviour(),
            Self::Squid => squid(),
            Self::Satellite => satellite(),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageId {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.slug() == s).ok_or_else(|| UnknownPage(s.to_owned()))
    }
}

/// One view on a page and the template that feeds it
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Identifier, unique within the page
    pub id: &'static str,
    /// Query template producing the data
    pub template: TemplateId,
    /// How the data is shown
    pub view: ViewSpec,
}

impl Region {
    fn chart(id: &'static str, template: TemplateId, chart: ChartSpec) -> Self {
        Self { id, template, view: ViewSpec::Chart(chart) }
    }

    const fn metric(id: &'static str, template: TemplateId, metric: MetricSpec) -> Self {
        Self { id, template, view: ViewSpec::Metric(metric) }
    }

    fn table(id: &'static str, template: TemplateId, table: TableSpec) -> Self {
        Self { id, template, view: ViewSpec::Table(table) }
    }
}

fn user_behaviour() -> Vec<Region> {
    use TemplateId::{FailedTransactions, NewUsers, RepeatUsers, TransactionsFees, UserRetention};

    vec![
        Region::chart(
            "new-users",
            NewUsers,
            ChartSpec::bar("User Acquisition Over Time", "Date", SeriesBinding::new("New Users")),
        ),
        Region::chart(
            "retained-users",
            UserRetention,
            ChartSpec::line(
                "User Retention Over Time",
                "Date",
                SeriesBinding::new("Retained Users"),
            ),
        ),
        Region::chart(
            "transactions",
            TransactionsFees,
            ChartSpec::bar(
                "Number of Transactions Over Time",
                "Date",
                SeriesBinding::new("Number of Transactions"),
            ),
        ),
        Region::chart(
            "fees",
            TransactionsFees,
            ChartSpec::bar(
                "Transaction Fees Over Time (AXL)",
                "Date",
                SeriesBinding::new("Transaction Fees"),
            ),
        ),
        Region::chart(
            "failed-transactions",
            FailedTransactions,
            ChartSpec::line(
                "Failed Transactions Over Time",
                "Date",
                SeriesBinding::new("Failed Transactions"),
            ),
        ),
        Region::table(
            "repeat-users",
            RepeatUsers,
            TableSpec::new("Repeat Users (Top 100)")
                .ranked("Txns Count", vec!["User", "Txn Date"])
                .limit(catalog::TOP_USERS_LIMIT as usize),
        ),
    ]
}

fn squid() -> Vec<Region> {
    use TemplateId::{
        SquidActivity, SquidDestinationChains, SquidKpis, SquidSourceChains, SquidSymbolSourceChains,
        SquidSymbols,
    };

    vec![
        Region::metric(
            "total-swap-volume",
            SquidKpis,
            MetricSpec::new(
                "Total Swap Volume",
                "Volume of Transfers",
                MetricFormat::grouped("$", ""),
            ),
        ),
        Region::metric(
            "total-swap-count",
            SquidKpis,
            MetricSpec::new(
                "Total Swap Count",
                "Number of Transfers",
                MetricFormat::grouped("", " Txns"),
            ),
        ),
        Region::metric(
            "unique-swappers",
            SquidKpis,
            MetricSpec::new(
                "Unique Swapper Count",
                "Number of Users",
                MetricFormat::grouped("", " Addresses"),
            ),
        ),
        Region::metric(
            "avg-swap-time",
            SquidKpis,
            MetricSpec::new("Avg Swap Time", "Avg Swap Time", MetricFormat::grouped("", " Sec")),
        ),
        Region::metric(
            "avg-swaps-per-user",
            SquidKpis,
            MetricSpec::new(
                "Avg Swap Count per User",
                "Avg Swap Count per User",
                MetricFormat::grouped("", " Txns"),
            ),
        ),
        Region::metric(
            "avg-volume-per-user",
            SquidKpis,
            MetricSpec::new(
                "Avg Swap Volume per User",
                "Avg Swap Volume per User",
                MetricFormat::grouped("$", ""),
            ),
        ),
        Region::chart(
            "swaps-over-time",
            SquidActivity,
            ChartSpec::dual_axis(
                "Swaps Over Time",
                "Date",
                SeriesBinding::new("Swap Count").color(SWAPS),
                SeriesBinding::new("Swap Volume").color(VOLUME),
            )
            .axis_titles("Txns count", Some("$USD")),
        ),
        Region::chart(
            "swappers-over-time",
            SquidActivity,
            ChartSpec::dual_axis(
                "Swappers Over Time",
                "Date",
                SeriesBinding::new("Swapper Count").color(SWAPS),
                SeriesBinding::new("Swap Volume per Swapper").color(VOLUME),
            )
            .axis_titles("Wallet count", Some("$USD")),
        ),
        Region::chart(
            "source-chain-volume",
            SquidSourceChains,
            ChartSpec::pie("Swap Volume by Source Chain", "Source Chain", "Swap Volume"),
        ),
        Region::chart(
            "source-chain-count",
            SquidSourceChains,
            ChartSpec::pie("Swap Count by Source Chain", "Source Chain", "Swap Count"),
        ),
        Region::chart(
            "destination-chain-volume",
            SquidDestinationChains,
            ChartSpec::pie(
                "Swap Volume by Destination Chain",
                "Destination Chain",
                "Swap Volume",
            ),
        ),
        Region::chart(
            "destination-chain-count",
            SquidDestinationChains,
            ChartSpec::pie("Swap Count by Destination Chain", "Destination Chain", "Swap Count"),
        ),
        Region::chart(
            "token-volume",
            SquidSymbols,
            ChartSpec::pie("Swap Volume by Token", "Symbol", "Swap Volume"),
        ),
        Region::chart(
            "token-count",
            SquidSymbols,
            ChartSpec::pie("Swap Count by Token", "Symbol", "Swap Count"),
        ),
        Region::chart(
            "token-share-by-count",
            SquidSymbolSourceChains,
            ChartSpec::stacked_bar(
                "Share of Each Token in Source Chain Transfers (Count)",
                "Source Chain",
                "Symbol",
                SeriesBinding::new("Number of Transfers"),
            )
            .transform(Transform::PercentOfGroup),
        ),
        Region::chart(
            "token-share-by-volume",
            SquidSymbolSourceChains,
            ChartSpec::stacked_bar(
                "Share of Each Token in Source Chain Transfers (Volume)",
                "Source Chain",
                "Symbol",
                SeriesBinding::new("Volume of Transfers (USD)"),
            )
            .transform(Transform::PercentOfGroup),
        ),
    ]
}

fn satellite() -> Vec<Region> {
    use TemplateId::{SatelliteKpis, SatelliteTopUsers, SatelliteUsers};

    vec![
        Region::metric(
            "total-users",
            SatelliteKpis,
            MetricSpec::new("Total Users", "Users", MetricFormat::scaled("", 1e3, 1, "K Wallets")),
        ),
        Region::metric(
            "total-transfers",
            SatelliteKpis,
            MetricSpec::new(
                "Total Transfers",
                "Transfers",
                MetricFormat::scaled("", 1e3, 1, "K Txns"),
            ),
        ),
        Region::metric(
            "total-volume",
            SatelliteKpis,
            MetricSpec::new(
                "Total Volume ($USD)",
                "Volume USD",
                MetricFormat::scaled("$", 1e6, 1, "M"),
            ),
        ),
        Region::metric(
            "avg-daily-users",
            SatelliteKpis,
            MetricSpec::new(
                "Average Daily Users",
                "Avg Daily Users",
                MetricFormat::scaled("", 1.0, 1, " Wallets"),
            ),
        ),
        Region::metric(
            "avg-daily-transfers",
            SatelliteKpis,
            MetricSpec::new(
                "Average Daily Transfers",
                "Avg Daily Txns",
                MetricFormat::scaled("", 1.0, 1, " Txns"),
            ),
        ),
        Region::metric(
            "avg-daily-volume",
            SatelliteKpis,
            MetricSpec::new(
                "Average Daily Volume ($USD)",
                "Avg Daily Volume",
                MetricFormat::scaled("$", 1e3, 1, "K"),
            ),
        ),
        Region::chart(
            "new-users",
            SatelliteUsers,
            ChartSpec::bar(
                "Number of New Users",
                "Date",
                SeriesBinding::new("New Users").color(SATELLITE),
            ),
        ),
        Region::chart(
            "returning-users",
            SatelliteUsers,
            ChartSpec::bar(
                "Number of Returning Users",
                "Date",
                SeriesBinding::new("Returning Users").color(SATELLITE),
            ),
        ),
        Region::chart(
            "total-users-over-time",
            SatelliteUsers,
            ChartSpec::bar(
                "Number of Total Users",
                "Date",
                SeriesBinding::new("Total Users").color(SATELLITE),
            ),
        ),
        Region::table(
            "top-users",
            SatelliteTopUsers,
            TableSpec::new("Top Users by Activity Level")
                .ranked("Number of Transfers", vec!["Address"])
                .limit(catalog::TOP_USERS_LIMIT as usize),
        ),
    ]
}
