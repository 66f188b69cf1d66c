use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use warehouse::{
    Column, DestinationChainRow, FailedTransactionsRow, NewUsersRow, RepeatUserRow,
    RetainedUsersRow, SatelliteKpiRow, SatelliteUserActivityRow, SatelliteUsersRow,
    SourceChainRow, SquidActivityRow, SquidKpiRow, SymbolRow, SymbolSourceChainRow, TabularRow,
    TransactionFeesRow,
};

/// Identifier of a query template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    /// First-seen users per bucket
    NewUsers,
    /// Returning users per bucket
    UserRetention,
    /// Transaction count and fees per bucket
    TransactionsFees,
    /// Failed transactions per bucket
    FailedTransactions,
    /// Top users by same-day transaction count
    RepeatUsers,
    /// Squid headline figures
    SquidKpis,
    /// Squid swaps per bucket
    SquidActivity,
    /// Squid swaps per source chain
    SquidSourceChains,
    /// Squid swaps per destination chain
    SquidDestinationChains,
    /// Squid swaps per token symbol
    SquidSymbols,
    /// Squid swaps per source chain and token symbol
    SquidSymbolSourceChains,
    /// Satellite headline figures
    SatelliteKpis,
    /// Satellite new and returning users per bucket
    SatelliteUsers,
    /// Most active Satellite senders
    SatelliteTopUsers,
}

impl TemplateId {
    /// Every template, in catalog order
    pub const ALL: [Self; 14] = [
        Self::NewUsers,
        Self::UserRetention,
        Self::TransactionsFees,
        Self::FailedTransactions,
        Self::RepeatUsers,
        Self::SquidKpis,
        Self::SquidActivity,
        Self::SquidSourceChains,
        Self::SquidDestinationChains,
        Self::SquidSymbols,
        Self::SquidSymbolSourceChains,
        Self::SatelliteKpis,
        Self::SatelliteUsers,
        Self::SatelliteTopUsers,
    ];

    /// Stable identifier used in URLs, logs and cache keys
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::NewUsers => "new-users",
            Self::UserRetention => "user-retention",
            Self::TransactionsFees => "transactions-fees",
            Self::FailedTransactions => "failed-transactions",
            Self::RepeatUsers => "repeat-users",
            Self::SquidKpis => "squid-kpis",
            Self::SquidActivity => "squid-activity",
            Self::SquidSourceChains => "squid-source-chains",
            Self::SquidDestinationChains => "squid-destination-chains",
            Self::SquidSymbols => "squid-symbols",
            Self::SquidSymbolSourceChains => "squid-symbol-source-chains",
            Self::SatelliteKpis => "satellite-kpis",
            Self::SatelliteUsers => "satellite-users",
            Self::SatelliteTopUsers => "satellite-top-users",
        }
    }

    /// Columns every result of this template carries
    pub const fn columns(&self) -> &'static [Column] {
        match self {
            Self::NewUsers => NewUsersRow::COLUMNS,
            Self::UserRetention => RetainedUsersRow::COLUMNS,
            Self::TransactionsFees => TransactionFeesRow::COLUMNS,
            Self::FailedTransactions => FailedTransactionsRow::COLUMNS,
            Self::RepeatUsers => RepeatUserRow::COLUMNS,
            Self::SquidKpis => SquidKpiRow::COLUMNS,
            Self::SquidActivity => SquidActivityRow::COLUMNS,
            Self::SquidSourceChains => SourceChainRow::COLUMNS,
            Self::SquidDestinationChains => DestinationChainRow::COLUMNS,
            Self::SquidSymbols => SymbolRow::COLUMNS,
            Self::SquidSymbolSourceChains => SymbolSourceChainRow::COLUMNS,
            Self::SatelliteKpis => SatelliteKpiRow::COLUMNS,
            Self::SatelliteUsers => SatelliteUsersRow::COLUMNS,
            Self::SatelliteTopUsers => SatelliteUserActivityRow::COLUMNS,
        }
    }

    /// Whether results are bucketed by granularity
    pub const fn is_time_series(&self) -> bool {
        matches!(
            self,
            Self::NewUsers |
                Self::UserRetention |
                Self::TransactionsFees |
                Self::FailedTransactions |
                Self::SquidActivity |
                Self::SatelliteUsers
        )
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Unknown template identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown query template '{0}'")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.slug() == s).ok_or_else(|| UnknownTemplate(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_parse_back() {
        for template in TemplateId::ALL {
            assert_eq!(template.slug().parse::<TemplateId>().unwrap(), template);
        }
        assert!("nope".parse::<TemplateId>().is_err());
    }

    #[test]
    fn slugs_match_serde_names() {
        for template in TemplateId::ALL {
            let json = serde_json::to_value(template).unwrap();
            assert_eq!(json, template.slug());
        }
    }

    #[test]
    fn every_template_declares_columns() {
        for template in TemplateId::ALL {
            assert!(!template.columns().is_empty(), "{template} has no columns");
        }
        assert_eq!(TemplateId::RepeatUsers.columns()[0].name, "User");
    }
}
