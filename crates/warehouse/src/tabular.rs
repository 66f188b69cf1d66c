//! Column-and-row results independent of the database client.

use std::{cmp::Ordering, fmt};

use chrono::{Days, NaiveDate};
use clickhouse::Row;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Semantic type declared for a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Float,
    /// Calendar date
    Date,
}

/// A named, typed result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct Column {
    /// Display name of the column
    #[schema(value_type = String)]
    pub name: &'static str,
    /// Declared type of every value in the column
    pub kind: ColumnType,
}

impl Column {
    /// Declare a new column
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

/// A single cell of a [`TabularResult`]
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Value {
    /// Missing value (SQL `NULL`)
    Null,
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Calendar date, serialized as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Free text
    String(String),
}

impl Value {
    /// Numeric view of the value, if it is a number.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this is a SQL `NULL`
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Integer(_) | Self::Float(_) => 1,
            Self::Date(_) => 2,
            Self::String(_) => 3,
        }
    }

    /// Total order used for deterministic sorting.
    ///
    /// Nulls sort first, numbers compare numerically regardless of width,
    /// then dates, then strings.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Convert a `ClickHouse` `Date` (days since the Unix epoch) into a calendar date
pub fn date_from_days(days: u16) -> NaiveDate {
    NaiveDate::default().checked_add_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MAX)
}

/// A row did not have one value per column
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row {row} has {found} values, expected {expected}")]
pub struct ShapeError {
    /// Index of the offending row
    pub row: usize,
    /// Number of columns
    pub expected: usize,
    /// Number of values in the row
    pub found: usize,
}

/// Ordered columns plus rows aligned to them. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TabularResult {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl TabularResult {
    /// Build a result, checking that every row matches the column count.
    pub fn try_new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self, ShapeError> {
        let expected = columns.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ShapeError { row, expected, found: values.len() });
        }
        Ok(Self { columns, rows })
    }

    /// Build a result from typed warehouse rows
    pub fn from_rows<R: TabularRow>(rows: Vec<R>) -> Self {
        let rows = rows.into_iter().map(TabularRow::into_values).collect::<Vec<_>>();
        debug_assert!(rows.iter().all(|r| r.len() == R::COLUMNS.len()));
        Self { columns: R::COLUMNS.to_vec(), rows }
    }

    /// Result columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Result rows in order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the query produced no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column declaration called `name`
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All values of the column called `name`, in row order
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Value at `row` in the column called `name`
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// New result with the same columns and the rows at `indices`, in that
    /// order. Out of range indices are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let rows = indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect();
        Self { columns: self.columns.clone(), rows }
    }
}

/// A warehouse row type with a fixed, declared column schema.
pub trait TabularRow: Row + for<'de> Deserialize<'de> {
    /// Columns produced by this row type, in select order
    const COLUMNS: &'static [Column];

    /// Convert the row into values aligned with [`Self::COLUMNS`]
    fn into_values(self) -> Vec<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TabularResult {
        TabularResult::try_new(
            vec![Column::new("Date", ColumnType::Date), Column::new("New Users", ColumnType::Integer)],
            vec![
                vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().into(), Value::Integer(5)],
                vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().into(), Value::Integer(0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_misaligned_rows() {
        let err = TabularResult::try_new(
            vec![Column::new("a", ColumnType::Integer)],
            vec![vec![Value::Integer(1)], vec![Value::Integer(1), Value::Null]],
        )
        .unwrap_err();
        assert_eq!(err, ShapeError { row: 1, expected: 1, found: 2 });
    }

    #[test]
    fn column_access_by_name() {
        let table = sample();
        assert_eq!(table.column_index("New Users"), Some(1));
        assert_eq!(table.value(1, "New Users"), Some(&Value::Integer(0)));
        assert!(table.column("Missing").is_none());
        assert_eq!(table.column_values("New Users").unwrap().len(), 2);
    }

    #[test]
    fn select_rows_reorders_and_skips_missing() {
        let table = sample();
        let picked = table.select_rows(&[1, 7, 0]);
        assert_eq!(picked.columns(), table.columns());
        assert_eq!(picked.rows(), &[table.rows()[1].clone(), table.rows()[0].clone()]);
    }

    #[test]
    fn days_since_epoch_convert_to_dates() {
        assert_eq!(date_from_days(0), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(date_from_days(19723), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn values_serialize_plainly() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["rows"][0][0], "2024-01-01");
        assert_eq!(json["rows"][1][1], 0);
        assert_eq!(json["columns"][1]["kind"], "integer");
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn total_order_mixes_numeric_widths() {
        assert_eq!(Value::Integer(2).total_cmp(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::Null.total_cmp(&Value::Integer(0)), Ordering::Less);
        assert_eq!(Value::from("a").total_cmp(&Value::from("b")), Ordering::Less);
    }

    #[test]
    fn display_is_plain_text() {
        assert_eq!(Value::from("osmosis").to_string(), "osmosis");
        assert_eq!(Value::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).to_string(), "2024-03-09");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn large_counts_saturate() {
        assert_eq!(Value::from(u64::MAX), Value::Integer(i64::MAX));
        assert_eq!(Value::from(None::<f64>), Value::Null);
    }
}
