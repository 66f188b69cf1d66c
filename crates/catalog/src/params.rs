//! Page parameters shared by every query template

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::TemplateId;

/// Parameters were rejected before any query ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The start of the window lies after its end
    #[error("start_date {start} is after end_date {end}")]
    InvertedRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },
    /// Granularity outside `day`, `week`, `month`
    #[error("unknown granularity '{0}', expected one of day, week, month")]
    UnknownGranularity(String),
    /// A date parameter is not formatted as `YYYY-MM-DD`
    #[error("{field} '{value}' is not a valid YYYY-MM-DD date")]
    InvalidDate {
        /// Parameter name
        field: &'static str,
        /// Raw value supplied
        value: String,
    },
}

/// Size of the time buckets used by time series templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day
    Day,
    /// One bucket per ISO week, starting Monday
    Week,
    /// One bucket per calendar month
    Month,
}

impl Granularity {
    /// Lowercase name, also the `date_trunc` unit
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Interval unit used when stepping between buckets
    pub(crate) const fn interval_unit(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(ValidationError::UnknownGranularity(other.to_owned())),
        }
    }
}

/// Parse a `YYYY-MM-DD` date parameter
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate { field, value: value.to_owned() })
}

/// Inclusive date window plus bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct QueryParams {
    /// First day of the window, inclusive
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive
    pub end_date: NaiveDate,
    /// Bucket size for time series
    pub granularity: Granularity,
}

impl QueryParams {
    /// Build validated parameters.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        granularity: Granularity,
    ) -> Result<Self, ValidationError> {
        let params = Self { start_date, end_date, granularity };
        params.validate()?;
        Ok(params)
    }

    /// Check the window is not inverted. Equal dates are a one-day window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_date > self.end_date {
            return Err(ValidationError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// One invocation of a template: the cache key for its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryRequest {
    /// Template to run
    pub template: TemplateId,
    /// Parameters to run it with
    pub params: QueryParams,
}

impl QueryRequest {
    /// Pair a template with its parameters
    pub const fn new(template: TemplateId, params: QueryParams) -> Self {
        Self { template, params }
    }
}

impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}?start_date={}&end_date={}&granularity={}",
            self.template, self.params.start_date, self.params.end_date, self.params.granularity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = QueryParams::new(date(2024, 6, 1), date(2024, 5, 1), Granularity::Day)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvertedRange { start: date(2024, 6, 1), end: date(2024, 5, 1) }
        );
    }

    #[test]
    fn single_day_window_is_accepted() {
        assert!(QueryParams::new(date(2024, 6, 1), date(2024, 6, 1), Granularity::Week).is_ok());
    }

    #[test]
    fn granularity_parses_only_known_units() {
        assert_eq!("month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!(
            "hour".parse::<Granularity>().unwrap_err(),
            ValidationError::UnknownGranularity("hour".to_owned())
        );
        assert!("Day".parse::<Granularity>().is_err());
    }

    #[test]
    fn dates_parse_strictly() {
        assert_eq!(parse_date("start_date", "2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(
            parse_date("end_date", "2023-02-29"),
            Err(ValidationError::InvalidDate { field: "end_date", .. })
        ));
    }

    #[test]
    fn request_has_canonical_form() {
        let params = QueryParams::new(date(2023, 1, 1), date(2025, 8, 31), Granularity::Month)
            .unwrap();
        let request = QueryRequest::new(TemplateId::SquidActivity, params);
        assert_eq!(
            request.to_string(),
            "squid-activity?start_date=2023-01-01&end_date=2025-08-31&granularity=month"
        );
    }

    #[test]
    fn requests_differ_by_every_field() {
        let base = QueryParams::new(date(2024, 1, 1), date(2024, 1, 31), Granularity::Day).unwrap();
        let a = QueryRequest::new(TemplateId::NewUsers, base);
        assert_eq!(a, QueryRequest::new(TemplateId::NewUsers, base));
        assert_ne!(a, QueryRequest::new(TemplateId::UserRetention, base));
        assert_ne!(
            a,
            QueryRequest::new(TemplateId::NewUsers, QueryParams { granularity: Granularity::Week, ..base })
        );
        assert_ne!(
            a,
            QueryRequest::new(TemplateId::NewUsers, QueryParams { end_date: date(2024, 2, 1), ..base })
        );
    }
}
