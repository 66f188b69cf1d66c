//! HTTP API serving the Axelar analytics dashboard pages.
//!
//! Each page is a fixed layout of regions. A request resolves the page
//! parameters, runs every query template the page needs through the shared
//! result cache and returns the rendered views as one JSON document.

mod controller;
pub mod pages;
pub mod routes;
mod state;
pub mod validation;

use api_types::{
    ErrorResponse, HealthResponse, PageResponse, PageSummary, PagesResponse, RegionResponse,
    RegionStatus,
};
use utoipa::OpenApi;

pub use controller::load_page;
pub use pages::{PageId, Region, UnknownPage};
pub use routes::router;
pub use state::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};

/// `OpenAPI` documentation structure
#[derive(Debug, OpenApi)]
#[openapi(
    paths(routes::pages::list_pages, routes::pages::get_page),
    components(
        schemas(
            validation::PageQuery,
            catalog::QueryParams,
            catalog::Granularity,
            catalog::TemplateId,
            presentation::RenderedView,
            HealthResponse,
            ErrorResponse,
            PagesResponse,
            PageSummary,
            PageResponse,
            RegionResponse,
            RegionStatus
        )
    ),
    tags(
        (name = "axelscope", description = "Axelar bridging analytics pages")
    ),
    info(
        title = "Axelscope API",
        description = "Charts, metrics and tables describing cross-chain activity on Axelar",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
