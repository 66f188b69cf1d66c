//! Mapping from raw Axelar asset denominations to display symbols

/// How a raw asset is matched
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Exact, case-sensitive match
    Exact(&'static str),
    /// Case-insensitive prefix match
    Prefix(&'static str),
}

/// Ordered symbol rules; the first match wins.
const SYMBOLS: &[(Rule, &str)] = &[
    (Rule::Exact("arb-wei"), "ARB"),
    (Rule::Exact("avalanche-uusdc"), "Avalanche USDC"),
    (Rule::Exact("avax-wei"), "AVAX"),
    (Rule::Exact("bnb-wei"), "BNB"),
    (Rule::Exact("busd-wei"), "BUSD"),
    (Rule::Exact("cbeth-wei"), "cbETH"),
    (Rule::Exact("cusd-wei"), "cUSD"),
    (Rule::Exact("dai-wei"), "DAI"),
    (Rule::Exact("dot-planck"), "DOT"),
    (Rule::Exact("eeur"), "EURC"),
    (Rule::Exact("ern-wei"), "ERN"),
    (Rule::Exact("eth-wei"), "ETH"),
    (Rule::Prefix("factory/sei10hub"), "SEILOR"),
    (Rule::Exact("fil-wei"), "FIL"),
    (Rule::Exact("frax-wei"), "FRAX"),
    (Rule::Exact("ftm-wei"), "FTM"),
    (Rule::Exact("glmr-wei"), "GLMR"),
    (Rule::Exact("hzn-wei"), "HZN"),
    (Rule::Exact("link-wei"), "LINK"),
    (Rule::Exact("matic-wei"), "MATIC"),
    (Rule::Exact("mkr-wei"), "MKR"),
    (Rule::Exact("mpx-wei"), "MPX"),
    (Rule::Exact("oath-wei"), "OATH"),
    (Rule::Exact("op-wei"), "OP"),
    (Rule::Exact("orbs-wei"), "ORBS"),
    (
        Rule::Exact("factory/sei10hud5e5er4aul2l7sp2u9qp2lag5u4xf8mvyx38cnjvqhlgsrcls5qn5ke/seilor"),
        "SEILOR",
    ),
    (Rule::Exact("pepe-wei"), "PEPE"),
    (Rule::Exact("polygon-uusdc"), "Polygon USDC"),
    (Rule::Exact("reth-wei"), "rETH"),
    (Rule::Exact("ring-wei"), "RING"),
    (Rule::Exact("shib-wei"), "SHIB"),
    (Rule::Exact("sonne-wei"), "SONNE"),
    (Rule::Exact("stuatom"), "stATOM"),
    (Rule::Exact("uatom"), "ATOM"),
    (Rule::Exact("uaxl"), "AXL"),
    (Rule::Exact("ukuji"), "KUJI"),
    (Rule::Exact("ulava"), "LAVA"),
    (Rule::Exact("uluna"), "LUNA"),
    (Rule::Exact("ungm"), "NGM"),
    (Rule::Exact("uni-wei"), "UNI"),
    (Rule::Exact("uosmo"), "OSMO"),
    (Rule::Exact("usomm"), "SOMM"),
    (Rule::Exact("ustrd"), "STRD"),
    (Rule::Exact("utia"), "TIA"),
    (Rule::Exact("uumee"), "UMEE"),
    (Rule::Exact("uusd"), "USTC"),
    (Rule::Exact("uusdc"), "USDC"),
    (Rule::Exact("uusdt"), "USDT"),
    (Rule::Exact("vela-wei"), "VELA"),
    (Rule::Exact("wavax-wei"), "WAVAX"),
    (Rule::Exact("wbnb-wei"), "WBNB"),
    (Rule::Exact("wbtc-satoshi"), "WBTC"),
    (Rule::Exact("weth-wei"), "WETH"),
    (Rule::Exact("wfil-wei"), "WFIL"),
    (Rule::Exact("wftm-wei"), "WFTM"),
    (Rule::Exact("wglmr-wei"), "WGLMR"),
    (Rule::Exact("wmai-wei"), "WMAI"),
    (Rule::Exact("wmatic-wei"), "WMATIC"),
    (Rule::Exact("wsteth-wei"), "wstETH"),
    (Rule::Exact("yield-eth-wei"), "yieldETH"),
];

/// Display symbol for a raw asset denomination.
///
/// Unknown assets are returned unchanged.
pub fn normalize_symbol(raw_asset: &str) -> &str {
    SYMBOLS
        .iter()
        .find(|(rule, _)| match rule {
            Rule::Exact(asset) => raw_asset == *asset,
            Rule::Prefix(prefix) => raw_asset
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
        })
        .map_or(raw_asset, |(_, symbol)| symbol)
}

/// `ClickHouse` expression applying [`normalize_symbol`] to `column`
pub(crate) fn symbol_expr(column: &str) -> String {
    let mut arms = String::new();
    for (rule, symbol) in SYMBOLS {
        let cond = match rule {
            Rule::Exact(asset) => format!("{column} = '{asset}'"),
            Rule::Prefix(prefix) => format!("{column} ILIKE '{prefix}%'"),
        };
        arms.push_str(&format!("{cond}, '{symbol}', "));
    }
    format!("multiIf({arms}{column})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_assets_map_to_symbols() {
        assert_eq!(normalize_symbol("uusdc"), "USDC");
        assert_eq!(normalize_symbol("wsteth-wei"), "wstETH");
        assert_eq!(normalize_symbol("yield-eth-wei"), "yieldETH");
        assert_eq!(
            normalize_symbol(
                "factory/sei10hud5e5er4aul2l7sp2u9qp2lag5u4xf8mvyx38cnjvqhlgsrcls5qn5ke/seilor"
            ),
            "SEILOR"
        );
    }

    #[test]
    fn prefix_rule_ignores_case() {
        assert_eq!(normalize_symbol("FACTORY/SEI10HUBabc/token"), "SEILOR");
        assert_eq!(normalize_symbol("factory/sei10hu"), "factory/sei10hu");
    }

    #[test]
    fn unknown_assets_pass_through() {
        assert_eq!(normalize_symbol("axlUSDC"), "axlUSDC");
        assert_eq!(normalize_symbol(""), "");
        assert_eq!(normalize_symbol("UUSDC"), "UUSDC");
    }

    #[test]
    fn sql_expression_covers_every_rule() {
        let sql = symbol_expr("raw_asset");
        assert!(sql.starts_with("multiIf(raw_asset = 'arb-wei', 'ARB', "));
        assert!(sql.ends_with("'yieldETH', raw_asset)"));
        assert!(sql.contains("raw_asset ILIKE 'factory/sei10hub%', 'SEILOR'"));
        assert_eq!(sql.matches(", '").count(), SYMBOLS.len());
    }
}
