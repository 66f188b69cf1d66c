//! Read-only access to the analytics warehouse.
//!
//! Queries are executed through [`WarehouseReader`]; every row type declares
//! its column schema up front via [`TabularRow`] so results can be handed to
//! the rest of the system as a uniform [`TabularResult`].

mod error;
pub mod models;
mod reader;
mod tabular;

pub use error::QueryExecutionError;
pub use models::*;
pub use reader::WarehouseReader;
pub use tabular::{Column, ColumnType, ShapeError, TabularResult, TabularRow, Value, date_from_days};
