//! Data types for the Axelscope API.
//!
//! These structs define the JSON documents returned by the API server. They
//! live in a separate crate so that consumers such as the dashboard front end
//! can depend on them without pulling in the warehouse client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::{QueryParams, TemplateId};
use presentation::RenderedView;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of the `/health` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving
    pub status: String,
}

/// Problem document returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short machine readable error kind, e.g. `invalid-params`
    #[serde(rename = "type")]
    pub r#type: String,
    /// Human readable summary of the status
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Details about this particular failure
    pub detail: String,
}

impl ErrorResponse {
    /// Build a new problem document.
    pub fn new(
        r#type: impl Into<String>,
        title: impl Into<String>,
        status: StatusCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    /// Status code carried by the document, falling back to 500 when invalid.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Entry in the page list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageSummary {
    /// Identifier used in `/pages/{page}`
    pub id: String,
    /// Page heading
    pub title: String,
    /// Parameters applied when the request omits them
    pub defaults: QueryParams,
}

/// Body of the `/pages` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PagesResponse {
    /// Every page served by the dashboard, in navigation order
    pub pages: Vec<PageSummary>,
}

/// Outcome of a single page region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    /// The view was rendered
    Ok,
    /// The query or the rendering failed; see `error`
    Error,
}

/// One chart, metric or table on a page
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegionResponse {
    /// Stable identifier of the region within its page
    pub id: String,
    /// Query template feeding the region
    pub template: TemplateId,
    /// Whether the region could be rendered
    pub status: RegionStatus,
    /// Rendered view, present when `status` is `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<RenderedView>,
    /// Diagnostic, present when `status` is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegionResponse {
    /// A successfully rendered region
    pub fn ok(id: impl Into<String>, template: TemplateId, view: RenderedView) -> Self {
        Self {
            id: id.into(),
            template,
            status: RegionStatus::Ok,
            view: Some(view),
            error: None,
        }
    }

    /// A region that failed with the given diagnostic
    pub fn error(id: impl Into<String>, template: TemplateId, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template,
            status: RegionStatus::Error,
            view: None,
            error: Some(error.into()),
        }
    }
}

/// Body of the `/pages/{page}` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PageResponse {
    /// Page identifier
    pub page: String,
    /// Page heading
    pub title: String,
    /// Parameters the page was evaluated with, after defaults were applied
    pub params: QueryParams,
    /// Regions in layout order
    pub regions: Vec<RegionResponse>,
}
