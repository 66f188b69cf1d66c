//! Validation of page query parameters

use api_types::ErrorResponse;
use axum::http::StatusCode;
use catalog::{Granularity, QueryParams, ValidationError, parse_date};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by every page.
///
/// Omitted or empty values fall back to the page defaults.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// First day of the window, inclusive (`YYYY-MM-DD`)
    pub start_date: Option<String>,
    /// Last day of the window, inclusive (`YYYY-MM-DD`)
    pub end_date: Option<String>,
    /// Time bucket: `day`, `week` or `month`
    pub granularity: Option<String>,
}

fn provided(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn merge(query: &PageQuery, defaults: QueryParams) -> Result<QueryParams, ValidationError> {
    let start_date = provided(query.start_date.as_ref())
        .map(|v| parse_date("start_date", v))
        .transpose()?
        .unwrap_or(defaults.start_date);
    let end_date = provided(query.end_date.as_ref())
        .map(|v| parse_date("end_date", v))
        .transpose()?
        .unwrap_or(defaults.end_date);
    let granularity = provided(query.granularity.as_ref())
        .map(str::parse::<Granularity>)
        .transpose()?
        .unwrap_or(defaults.granularity);

    QueryParams::new(start_date, end_date, granularity)
}

/// Build the 400 response for rejected parameters.
pub fn invalid_params(error: &ValidationError) -> ErrorResponse {
    ErrorResponse::new("invalid-params", "Bad Request", StatusCode::BAD_REQUEST, error.to_string())
}

/// Resolve the request parameters against `defaults` and validate the result.
pub fn resolve_params(
    query: &PageQuery,
    defaults: QueryParams,
) -> Result<QueryParams, ErrorResponse> {
    merge(query, defaults).map_err(|e| invalid_params(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn defaults() -> QueryParams {
        QueryParams::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            Granularity::Month,
        )
        .unwrap()
    }

    fn query(start: Option<&str>, end: Option<&str>, granularity: Option<&str>) -> PageQuery {
        PageQuery {
            start_date: start.map(ToOwned::to_owned),
            end_date: end.map(ToOwned::to_owned),
            granularity: granularity.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let params = resolve_params(&PageQuery::default(), defaults()).unwrap();
        assert_eq!(params, defaults());

        let params = resolve_params(&query(Some(""), None, Some(" ")), defaults()).unwrap();
        assert_eq!(params, defaults());
    }

    #[test]
    fn provided_values_override_defaults() {
        let params =
            resolve_params(&query(Some("2024-01-01"), Some("2024-03-31"), Some("week")), defaults())
                .unwrap();
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(params.granularity, Granularity::Week);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = resolve_params(&query(Some("2024-06-01"), Some("2024-05-01"), None), defaults())
            .unwrap_err();
        assert_eq!(err.r#type, "invalid-params");
        assert_eq!(err.status, 400);
        assert!(err.detail.contains("2024-06-01"));
    }

    #[test]
    fn start_after_default_end_is_rejected() {
        let err = resolve_params(&query(Some("2026-01-01"), None, None), defaults()).unwrap_err();
        assert_eq!(err.r#type, "invalid-params");
    }

    #[test]
    fn unknown_granularity_is_rejected() {
        let err = resolve_params(&query(None, None, Some("hour")), defaults()).unwrap_err();
        assert_eq!(err.r#type, "invalid-params");
        assert!(err.detail.contains("hour"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = resolve_params(&query(Some("01/02/2024"), None, None), defaults()).unwrap_err();
        assert!(err.detail.contains("start_date"));
    }
}
