//! Page endpoints

use api_types::{ErrorResponse, PageResponse, PageSummary, PagesResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    controller::load_page,
    pages::PageId,
    state::ApiState,
    validation::{PageQuery, resolve_params},
};

#[utoipa::path(
    get,
    path = "/pages",
    responses(
        (status = 200, description = "Available dashboard pages", body = PagesResponse)
    ),
    tag = "axelscope"
)]
/// List the dashboard pages with their default parameters
pub async fn list_pages() -> Json<PagesResponse> {
    let pages = PageId::ALL
        .into_iter()
        .map(|page| PageSummary {
            id: page.slug().to_owned(),
            title: page.title().to_owned(),
            defaults: page.defaults(),
        })
        .collect();
    Json(PagesResponse { pages })
}

#[utoipa::path(
    get,
    path = "/pages/{page}",
    params(
        ("page" = String, Path, description = "Page identifier, e.g. `squid`"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Rendered page", body = PageResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 404, description = "Unknown page", body = ErrorResponse)
    ),
    tag = "axelscope"
)]
/// Evaluate a dashboard page for the requested window.
///
/// Parameters are validated before any query runs. Regions whose query
/// failed are returned with `status = "error"` next to the ones that
/// rendered.
pub async fn get_page(
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
    State(state): State<ApiState>,
) -> Result<Json<PageResponse>, ErrorResponse> {
    let page = page.parse::<PageId>().map_err(|e| {
        ErrorResponse::new("not-found", "Not Found", StatusCode::NOT_FOUND, e.to_string())
    })?;
    let params = resolve_params(&query, page.defaults())?;
    Ok(Json(load_page(&state, page, params).await))
}
