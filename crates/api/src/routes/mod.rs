//! API route definitions

pub mod pages;

use crate::{ApiDoc, state::ApiState};
use axum::{Router, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pages::*;

/// Build the router with all API endpoints.
pub fn router(state: ApiState) -> Router {
    let api_routes =
        Router::new().route("/pages", get(list_pages)).route("/pages/:page", get(get_page));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests;
