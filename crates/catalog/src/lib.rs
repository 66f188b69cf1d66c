//! Named, parameterized analytics queries over the Axelar warehouse tables.
//!
//! Every template renders to `ClickHouse` SQL from a [`QueryParams`] window
//! and maps to a typed row declaring its result columns.

mod catalog;
mod params;
mod sql;
mod template;
mod tokens;

pub use catalog::{QueryCatalog, QueryError, QueryText, TOP_USERS_LIMIT};
pub use params::{Granularity, QueryParams, QueryRequest, ValidationError, parse_date};
pub use template::{TemplateId, UnknownTemplate};
pub use tokens::normalize_symbol;
