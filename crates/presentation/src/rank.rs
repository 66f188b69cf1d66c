//! Row ordering and grouping helpers

use warehouse::{TabularResult, Value};

use crate::PresentationError;

fn index_of(result: &TabularResult, column: &str) -> Result<usize, PresentationError> {
    result.column_index(column).ok_or_else(|| PresentationError::MissingColumn(column.to_owned()))
}

/// Sort rows by `by` then ascending by each `tie_break` column, keeping at
/// most `limit` rows.
///
/// The sort is stable and total, so ranking an already ranked result
/// returns it unchanged.
pub fn rank_top_n(
    result: &TabularResult,
    by: &str,
    descending: bool,
    tie_break: &[&str],
    limit: Option<usize>,
) -> Result<TabularResult, PresentationError> {
    let key = index_of(result, by)?;
    let ties = tie_break.iter().map(|c| index_of(result, c)).collect::<Result<Vec<_>, _>>()?;
    let rows = result.rows();

    let mut order = (0..rows.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let primary = rows[a][key].total_cmp(&rows[b][key]);
        let primary = if descending { primary.reverse() } else { primary };
        ties.iter().fold(primary, |acc, &t| acc.then_with(|| rows[a][t].total_cmp(&rows[b][t])))
    });
    if let Some(limit) = limit {
        order.truncate(limit);
    }

    Ok(result.select_rows(&order))
}

/// Each row's `value` as a percentage of the total of its `group`.
///
/// Nulls stay null. When a group sums to zero every value in it maps to zero.
pub fn percent_of_group(
    result: &TabularResult,
    group: &str,
    value: &str,
) -> Result<Vec<Value>, PresentationError> {
    let g = index_of(result, group)?;
    let v = index_of(result, value)?;

    let mut totals: Vec<(&Value, f64)> = Vec::new();
    for (row_idx, row) in result.rows().iter().enumerate() {
        let amount = numeric(&row[v], value, row_idx)?.unwrap_or(0.0);
        match totals.iter_mut().find(|(k, _)| *k == &row[g]) {
            Some((_, total)) => *total += amount,
            None => totals.push((&row[g], amount)),
        }
    }

    result
        .rows()
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let Some(amount) = numeric(&row[v], value, row_idx)? else {
                return Ok(Value::Null);
            };
            let total =
                totals.iter().find(|(k, _)| *k == &row[g]).map_or(0.0, |(_, total)| *total);
            Ok(Value::Float(if total == 0.0 { 0.0 } else { amount / total * 100.0 }))
        })
        .collect()
}

/// Numeric view of a plotted cell; nulls are `None`, text and dates are errors.
pub(crate) fn numeric(
    value: &Value,
    column: &str,
    row: usize,
) -> Result<Option<f64>, PresentationError> {
    match value {
        Value::Null => Ok(None),
        other => other
            .as_f64()
            .map(Some)
            .ok_or_else(|| PresentationError::NonNumeric { column: column.to_owned(), row }),
    }
}

/// Distinct values in order of first appearance
pub(crate) fn distinct_in_order<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut seen: Vec<&Value> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use warehouse::{Column, ColumnType};

    use super::*;

    fn users() -> TabularResult {
        TabularResult::try_new(
            vec![
                Column::new("Address", ColumnType::String),
                Column::new("Transfers", ColumnType::Integer),
            ],
            vec![
                vec!["0xc".into(), Value::Integer(5)],
                vec!["0xa".into(), Value::Integer(9)],
                vec!["0xb".into(), Value::Integer(5)],
                vec!["0xd".into(), Value::Integer(1)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn ties_break_on_ascending_identifier() {
        let ranked = rank_top_n(&users(), "Transfers", true, &["Address"], None).unwrap();
        let order = ranked.column_values("Address").unwrap();
        let expected = ["0xa", "0xb", "0xc", "0xd"].map(Value::from);
        assert_eq!(order, expected.iter().collect::<Vec<_>>());
    }

    #[test]
    fn ranking_is_idempotent() {
        let once = rank_top_n(&users(), "Transfers", true, &["Address"], Some(3)).unwrap();
        let twice = rank_top_n(&once, "Transfers", true, &["Address"], Some(3)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn ranking_unknown_column_fails() {
        assert_eq!(
            rank_top_n(&users(), "Volume", true, &[], None).unwrap_err(),
            PresentationError::MissingColumn("Volume".to_owned())
        );
    }

    #[test]
    fn percentages_are_per_group() {
        let table = TabularResult::try_new(
            vec![
                Column::new("Source Chain", ColumnType::String),
                Column::new("Symbol", ColumnType::String),
                Column::new("Number of Transfers", ColumnType::Integer),
            ],
            vec![
                vec!["ethereum".into(), "USDC".into(), Value::Integer(3)],
                vec!["ethereum".into(), "ETH".into(), Value::Integer(1)],
                vec!["osmosis".into(), "OSMO".into(), Value::Integer(0)],
                vec!["base".into(), "USDC".into(), Value::Null],
            ],
        )
        .unwrap();

        let shares = percent_of_group(&table, "Source Chain", "Number of Transfers").unwrap();
        assert_eq!(
            shares,
            vec![Value::Float(75.0), Value::Float(25.0), Value::Float(0.0), Value::Null]
        );
    }

    #[test]
    fn distinct_keeps_first_appearance() {
        let values = [Value::from("b"), Value::from("a"), Value::from("b")];
        assert_eq!(distinct_in_order(values.iter()), vec![&Value::from("b"), &Value::from("a")]);
    }
}
